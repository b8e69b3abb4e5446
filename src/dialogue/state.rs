//! Dialogue state machine — which phase a sender's conversation is in.

use serde::{Deserialize, Serialize};

/// Named phase of a sender's dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    LanguageSelection,
    MainMenu,
    RoomServiceMenu,
    RoomService,
    Housekeeping,
    Complaint,
    Registering,
    UnsupportedLanguage,
}

impl std::fmt::Display for DialogueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::LanguageSelection => "language_selection",
            Self::MainMenu => "main_menu",
            Self::RoomServiceMenu => "room_service_menu",
            Self::RoomService => "room_service",
            Self::Housekeeping => "housekeeping",
            Self::Complaint => "complaint",
            Self::Registering => "registering",
            Self::UnsupportedLanguage => "unsupported_language",
        };
        write!(f, "{s}")
    }
}

/// Sub-phase of [`DialogueState::Registering`].
///
/// Progresses linearly: Name → Checkin → Checkout → GuestCount → IdPhoto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStep {
    Name,
    Checkin,
    Checkout,
    #[serde(rename = "guestcount")]
    GuestCount,
    #[serde(rename = "idphoto")]
    IdPhoto,
}

impl RegistrationStep {
    /// First step of every registration.
    pub const FIRST: RegistrationStep = RegistrationStep::Name;

    /// Next step in the linear progression, `None` after the ID photo.
    pub fn next(&self) -> Option<RegistrationStep> {
        use RegistrationStep::*;
        match self {
            Name => Some(Checkin),
            Checkin => Some(Checkout),
            Checkout => Some(GuestCount),
            GuestCount => Some(IdPhoto),
            IdPhoto => None,
        }
    }
}

impl std::fmt::Display for RegistrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Checkin => "checkin",
            Self::Checkout => "checkout",
            Self::GuestCount => "guestcount",
            Self::IdPhoto => "idphoto",
        };
        write!(f, "{s}")
    }
}
