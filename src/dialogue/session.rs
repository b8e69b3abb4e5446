//! Per-sender session record.

use serde::{Deserialize, Serialize};

use super::state::{DialogueState, RegistrationStep};

/// One sender's conversation: current state plus the answers collected so far.
///
/// Accumulator fields are write-once. A session is only ever cleared by
/// deleting it from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub state: DialogueState,
    /// Only meaningful while `state` is [`DialogueState::Registering`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<RegistrationStep>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub request: Option<String>,
    #[serde(default)]
    pub complaint: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub checkin: Option<String>,
    #[serde(default)]
    pub checkout: Option<String>,
    #[serde(default)]
    pub guest_count: Option<String>,
    /// Attachment URL of the guest's identity document.
    #[serde(default)]
    pub id_document: Option<String>,
}

impl Session {
    /// A fresh session starting in `state`.
    pub fn new(state: DialogueState) -> Self {
        Self {
            state,
            step: None,
            room_number: None,
            request: None,
            complaint: None,
            name: None,
            checkin: None,
            checkout: None,
            guest_count: None,
            id_document: None,
        }
    }

    /// Move to `state`, keeping the collected answers.
    pub fn with_state(mut self, state: DialogueState) -> Self {
        self.state = state;
        self
    }

    /// Enter the registration sub-flow at its first step.
    pub fn start_registration(mut self) -> Self {
        self.state = DialogueState::Registering;
        self.step = Some(RegistrationStep::FIRST);
        self
    }

    /// Store the answer for `step` in its field.
    pub fn record_step(&mut self, step: RegistrationStep, value: &str) {
        let field = match step {
            RegistrationStep::Name => &mut self.name,
            RegistrationStep::Checkin => &mut self.checkin,
            RegistrationStep::Checkout => &mut self.checkout,
            RegistrationStep::GuestCount => &mut self.guest_count,
            RegistrationStep::IdPhoto => &mut self.id_document,
        };
        set_once(field, value);
    }

    pub fn set_room_number(&mut self, value: &str) {
        set_once(&mut self.room_number, value);
    }

    pub fn set_request(&mut self, value: &str) {
        set_once(&mut self.request, value);
    }

    pub fn set_complaint(&mut self, value: &str) {
        set_once(&mut self.complaint, value);
    }
}

/// Fill an accumulator only if it is still empty. Blank input never fills it.
fn set_once(field: &mut Option<String>, value: &str) {
    if is_blank(field) && !value.trim().is_empty() {
        *field = Some(value.to_string());
    }
}

/// An accumulator holding nothing but whitespace counts as unset.
pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

/// Render an accumulator for a summary message.
pub(crate) fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}
