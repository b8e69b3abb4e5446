//! Dialogue engine — pure transition function over a sender's session.
//!
//! `step` never performs I/O. It returns the next session (or a deletion),
//! the reply for the sender, and the side effects the caller must dispatch.

use chrono::{DateTime, Utc};

use crate::config::DialogueProfile;
use crate::store::ledger::GuestRecord;

use super::prompts;
use super::session::{Session, is_blank};
use super::state::{DialogueState, RegistrationStep};

/// Keyword that resets any conversation back to the welcome prompt.
pub const RESET_KEYWORD: &str = "menu";

/// Free text with at least this many commas is treated as a reservation.
pub const RESERVATION_MIN_COMMAS: usize = 3;

/// A message received from the provider webhook.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Sender address, e.g. `whatsapp:+919800000000`.
    pub from: String,
    pub body: String,
    /// First attachment URL, if the message carried media.
    pub media_url: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    pub fn text(from: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            body: body.into(),
            media_url: None,
            received_at: Utc::now(),
        }
    }

    pub fn with_media(mut self, url: impl Into<String>) -> Self {
        self.media_url = Some(url.into());
        self
    }

    /// The attachment URL, ignoring blank values.
    fn attachment(&self) -> Option<&str> {
        self.media_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// What the store should do with the sender's session after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    Keep(Session),
    Delete,
}

/// A side effect requested by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// WhatsApp alert to the venue manager.
    ManagerAlert(String),
    /// Notification email to the configured manager address(es).
    Email { subject: String, body: String },
    /// Append a completed registration to the guest ledger.
    RecordGuest(GuestRecord),
}

/// Result of feeding one inbound message through the engine.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub update: SessionUpdate,
    pub reply: String,
    pub effects: Vec<Effect>,
}

impl Outcome {
    fn keep(session: Session, reply: impl Into<String>) -> Self {
        Self {
            update: SessionUpdate::Keep(session),
            reply: reply.into(),
            effects: Vec::new(),
        }
    }

    fn finish(reply: impl Into<String>) -> Self {
        Self {
            update: SessionUpdate::Delete,
            reply: reply.into(),
            effects: Vec::new(),
        }
    }

    fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Whether this outcome ends the sender's session.
    pub fn completes_session(&self) -> bool {
        matches!(self.update, SessionUpdate::Delete)
    }
}

/// The menu dialogue, parameterised by profile.
#[derive(Debug, Clone, Copy)]
pub struct DialogueEngine {
    profile: DialogueProfile,
}

impl DialogueEngine {
    pub fn new(profile: DialogueProfile) -> Self {
        Self { profile }
    }

    /// Entry state of a fresh session.
    pub fn initial_state(&self) -> DialogueState {
        match self.profile {
            DialogueProfile::Hotel => DialogueState::LanguageSelection,
            DialogueProfile::Restaurant => DialogueState::MainMenu,
        }
    }

    pub fn new_session(&self) -> Session {
        Session::new(self.initial_state())
    }

    /// Compute the next session, reply and side effects for `msg`.
    pub fn step(&self, session: &Session, msg: &InboundMessage) -> Outcome {
        let body = msg.body.trim();

        if body.eq_ignore_ascii_case(RESET_KEYWORD) {
            return Outcome::keep(self.new_session(), prompts::welcome(self.profile));
        }

        match self.profile {
            DialogueProfile::Hotel => self.hotel_step(session, body, msg),
            DialogueProfile::Restaurant => self.restaurant_step(session, body, msg),
        }
    }

    fn hotel_step(&self, session: &Session, body: &str, msg: &InboundMessage) -> Outcome {
        use DialogueState::*;

        match session.state {
            LanguageSelection => match body {
                "1" => Outcome::keep(
                    session.clone().with_state(UnsupportedLanguage),
                    prompts::HINDI_UNAVAILABLE,
                ),
                "2" => Outcome::keep(session.clone().with_state(MainMenu), prompts::MAIN_MENU),
                _ if looks_like_reservation(body) => reservation(session, msg),
                _ => Outcome::keep(session.clone(), prompts::LANGUAGE_REPROMPT),
            },

            MainMenu => match body {
                "1" => Outcome::keep(
                    session.clone().start_registration(),
                    prompts::registration_prompt(RegistrationStep::FIRST),
                ),
                "2" => Outcome::keep(
                    session.clone().with_state(RoomServiceMenu),
                    prompts::ROOM_SERVICE_MENU,
                ),
                _ => Outcome::keep(session.clone(), prompts::MAIN_MENU_REPROMPT),
            },

            RoomServiceMenu => match body {
                "1" => Outcome::keep(
                    session.clone().with_state(RoomService),
                    prompts::ASK_ROOM_NUMBER,
                ),
                "2" => Outcome::keep(
                    session.clone().with_state(Housekeeping),
                    prompts::ASK_HOUSEKEEPING_ROOM,
                ),
                "3" => Outcome::keep(session.clone().with_state(Complaint), prompts::ASK_COMPLAINT),
                _ => Outcome::keep(session.clone(), prompts::ROOM_SERVICE_REPROMPT),
            },

            RoomService => {
                let mut next = session.clone();
                if is_blank(&next.room_number) {
                    if body.is_empty() {
                        return Outcome::keep(next, prompts::ASK_ROOM_NUMBER);
                    }
                    next.set_room_number(body);
                    return Outcome::keep(next, prompts::ASK_ORDER);
                }
                next.set_request(body);
                Outcome::finish(prompts::ROOM_SERVICE_SENT)
                    .with_effect(Effect::ManagerAlert(prompts::room_service_alert(&next)))
            }

            Housekeeping => {
                let mut next = session.clone();
                next.set_room_number(body);
                Outcome::finish(prompts::HOUSEKEEPING_SENT)
                    .with_effect(Effect::ManagerAlert(prompts::housekeeping_alert(&next)))
            }

            Complaint => {
                let mut next = session.clone();
                next.set_complaint(body);
                let alert = prompts::complaint_alert(&next);
                Outcome::finish(prompts::COMPLAINT_SENT)
                    .with_effect(Effect::ManagerAlert(alert.clone()))
                    .with_effect(Effect::Email {
                        subject: "Guest Complaint".into(),
                        body: alert,
                    })
            }

            Registering => self.registration_step(session, body, msg),

            UnsupportedLanguage => Outcome::keep(self.new_session(), prompts::SESSION_RESTART),
        }
    }

    fn registration_step(&self, session: &Session, body: &str, msg: &InboundMessage) -> Outcome {
        let Some(step) = session.step else {
            return Outcome::keep(self.new_session(), prompts::SESSION_RESTART);
        };

        match step.next() {
            Some(next_step) => {
                let mut next = session.clone();
                next.record_step(step, body);
                next.step = Some(next_step);
                Outcome::keep(next, prompts::registration_prompt(next_step))
            }
            None => {
                let Some(url) = msg.attachment() else {
                    return Outcome::keep(session.clone(), prompts::ID_PHOTO_MISSING);
                };
                let mut done = session.clone();
                done.record_step(step, url);

                Outcome::finish(prompts::REGISTRATION_DONE)
                    .with_effect(Effect::RecordGuest(GuestRecord::from_session(
                        &done,
                        msg.received_at,
                    )))
                    .with_effect(Effect::Email {
                        subject: "Guest Registration".into(),
                        body: prompts::registration_summary(&done),
                    })
            }
        }
    }

    fn restaurant_step(&self, session: &Session, body: &str, msg: &InboundMessage) -> Outcome {
        if session.state != DialogueState::MainMenu {
            return Outcome::keep(self.new_session(), prompts::RESTAURANT_WELCOME);
        }

        let reply = match body {
            "1" => prompts::RESTAURANT_MENU_LINK,
            "2" => prompts::RESERVATION_FORMAT,
            "3" => prompts::PROMOTION,
            _ if body.eq_ignore_ascii_case("reservation") => prompts::RESERVATION_FORMAT,
            _ if body.eq_ignore_ascii_case("promotion") => prompts::PROMOTION,
            _ if looks_like_reservation(body) => return reservation(session, msg),
            _ => prompts::RESTAURANT_WELCOME,
        };
        Outcome::keep(session.clone(), reply)
    }
}

/// Free-text reservation heuristic: enough commas to look like
/// `Name, Date, Time, Guests`.
pub fn looks_like_reservation(body: &str) -> bool {
    body.matches(',').count() >= RESERVATION_MIN_COMMAS
}

/// Forward a free-text reservation to the manager by email.
fn reservation(session: &Session, msg: &InboundMessage) -> Outcome {
    Outcome::keep(session.clone(), prompts::RESERVATION_RECEIVED).with_effect(Effect::Email {
        subject: "New Reservation Request".into(),
        body: prompts::reservation_email(&msg.from, msg.body.trim()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FROM: &str = "whatsapp:+15550001";

    fn hotel() -> DialogueEngine {
        DialogueEngine::new(DialogueProfile::Hotel)
    }

    fn restaurant() -> DialogueEngine {
        DialogueEngine::new(DialogueProfile::Restaurant)
    }

    fn kept(outcome: &Outcome) -> &Session {
        match &outcome.update {
            SessionUpdate::Keep(s) => s,
            SessionUpdate::Delete => panic!("expected session to be kept"),
        }
    }

    /// Feed a sequence of texts, returning the last outcome and session.
    fn drive(engine: &DialogueEngine, inputs: &[&str]) -> (Outcome, Option<Session>) {
        let mut session = Some(engine.new_session());
        let mut last = None;
        for input in inputs {
            let current = session.take().unwrap_or_else(|| engine.new_session());
            let outcome = engine.step(&current, &InboundMessage::text(FROM, *input));
            session = match &outcome.update {
                SessionUpdate::Keep(s) => Some(s.clone()),
                SessionUpdate::Delete => None,
            };
            last = Some(outcome);
        }
        (last.expect("at least one input"), session)
    }

    #[test]
    fn menu_resets_from_any_state_and_clears_fields() {
        let engine = hotel();
        let mut session = Session::new(DialogueState::RoomService);
        session.set_room_number("305");

        for keyword in ["menu", "MENU", "  Menu "] {
            let outcome = engine.step(&session, &InboundMessage::text(FROM, keyword));
            let next = kept(&outcome);
            assert_eq!(next, &engine.new_session());
            assert_eq!(outcome.reply, prompts::HOTEL_WELCOME);
            assert!(outcome.effects.is_empty());
        }
    }

    #[test]
    fn language_selection_branches() {
        let engine = hotel();
        let start = engine.new_session();

        let hindi = engine.step(&start, &InboundMessage::text(FROM, "1"));
        assert_eq!(kept(&hindi).state, DialogueState::UnsupportedLanguage);
        assert_eq!(hindi.reply, prompts::HINDI_UNAVAILABLE);

        let english = engine.step(&start, &InboundMessage::text(FROM, "2"));
        assert_eq!(kept(&english).state, DialogueState::MainMenu);
        assert_eq!(english.reply, prompts::MAIN_MENU);

        let other = engine.step(&start, &InboundMessage::text(FROM, "hello"));
        assert_eq!(kept(&other), &start);
        assert_eq!(other.reply, prompts::LANGUAGE_REPROMPT);
    }

    #[test]
    fn unsupported_language_self_heals() {
        let engine = hotel();
        let (outcome, session) = drive(&engine, &["1", "anything"]);
        assert_eq!(outcome.reply, prompts::SESSION_RESTART);
        assert_eq!(session.unwrap().state, DialogueState::LanguageSelection);
    }

    #[test]
    fn numeric_choices_match_literally() {
        let engine = hotel();
        let (outcome, session) = drive(&engine, &["2", "01"]);
        assert_eq!(outcome.reply, prompts::MAIN_MENU_REPROMPT);
        assert_eq!(session.unwrap().state, DialogueState::MainMenu);
    }

    #[test]
    fn room_service_two_turn_capture() {
        let engine = hotel();
        let (outcome, session) = drive(&engine, &["2", "2", "1", "305", "Pizza"]);

        assert!(session.is_none());
        assert!(outcome.completes_session());
        assert_eq!(outcome.reply, prompts::ROOM_SERVICE_SENT);
        match outcome.effects.as_slice() {
            [Effect::ManagerAlert(alert)] => {
                assert!(alert.contains("Room: 305"));
                assert!(alert.contains("Order: Pizza"));
            }
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn room_service_first_turn_asks_for_order() {
        let engine = hotel();
        let (outcome, session) = drive(&engine, &["2", "2", "1", "305"]);
        assert_eq!(outcome.reply, prompts::ASK_ORDER);
        let session = session.unwrap();
        assert_eq!(session.state, DialogueState::RoomService);
        assert_eq!(session.room_number.as_deref(), Some("305"));
        assert!(outcome.effects.is_empty());
    }

    #[test]
    fn room_service_blank_turn_asks_for_room_again() {
        let engine = hotel();
        let (outcome, session) = drive(&engine, &["2", "2", "1"]);
        assert_eq!(outcome.reply, prompts::ASK_ROOM_NUMBER);
        let session = session.unwrap();

        let image_only = InboundMessage::text(FROM, "").with_media("https://media.example/a.jpg");
        let outcome = engine.step(&session, &image_only);
        assert_eq!(outcome.reply, prompts::ASK_ROOM_NUMBER);
        assert!(outcome.effects.is_empty());
        let SessionUpdate::Keep(session) = outcome.update else {
            panic!("room service should stay open");
        };
        assert!(session.room_number.is_none());

        let outcome = engine.step(&session, &InboundMessage::text(FROM, "305"));
        assert_eq!(outcome.reply, prompts::ASK_ORDER);
        let SessionUpdate::Keep(session) = outcome.update else {
            panic!("room service should wait for the order");
        };

        let outcome = engine.step(&session, &InboundMessage::text(FROM, "Pizza"));
        assert_eq!(
            outcome.effects,
            vec![Effect::ManagerAlert(
                "Room Service Request:\nRoom: 305\nOrder: Pizza".into()
            )]
        );
    }

    #[test]
    fn housekeeping_is_single_turn() {
        let engine = hotel();
        let (outcome, session) = drive(&engine, &["2", "2", "2", "412"]);
        assert!(session.is_none());
        assert_eq!(outcome.reply, prompts::HOUSEKEEPING_SENT);
        assert_eq!(
            outcome.effects,
            vec![Effect::ManagerAlert("Housekeeping Request:\nRoom: 412".into())]
        );
    }

    #[test]
    fn complaint_alerts_and_emails() {
        let engine = hotel();
        let (outcome, session) = drive(&engine, &["2", "2", "3", "AC is not cooling"]);
        assert!(session.is_none());
        assert_eq!(outcome.reply, prompts::COMPLAINT_SENT);
        assert_eq!(outcome.effects.len(), 2);
        assert!(matches!(&outcome.effects[0], Effect::ManagerAlert(a) if a.contains("AC is not cooling")));
        assert!(matches!(
            &outcome.effects[1],
            Effect::Email { subject, body } if subject == "Guest Complaint" && body.contains("AC is not cooling")
        ));
    }

    #[test]
    fn room_service_menu_reprompts_on_unknown_choice() {
        let engine = hotel();
        let (outcome, session) = drive(&engine, &["2", "2", "4"]);
        assert_eq!(outcome.reply, prompts::ROOM_SERVICE_REPROMPT);
        assert_eq!(session.unwrap().state, DialogueState::RoomServiceMenu);
    }

    #[test]
    fn registration_advances_one_step_at_a_time() {
        let engine = hotel();
        let (outcome, session) = drive(&engine, &["2", "1"]);
        assert_eq!(outcome.reply, prompts::REGISTRATION_INTRO);
        let mut session = session.unwrap();
        assert_eq!(session.step, Some(RegistrationStep::Name));

        let answers = ["Asha Rao", "2024-01-01", "2024-01-05", "2"];
        let expected_steps = [
            RegistrationStep::Checkin,
            RegistrationStep::Checkout,
            RegistrationStep::GuestCount,
            RegistrationStep::IdPhoto,
        ];
        for (answer, expected) in answers.iter().zip(expected_steps) {
            let outcome = engine.step(&session, &InboundMessage::text(FROM, *answer));
            session = kept(&outcome).clone();
            assert_eq!(session.state, DialogueState::Registering);
            assert_eq!(session.step, Some(expected));
            assert_eq!(outcome.reply, prompts::registration_prompt(expected));
        }

        assert_eq!(session.name.as_deref(), Some("Asha Rao"));
        assert_eq!(session.checkin.as_deref(), Some("2024-01-01"));
        assert_eq!(session.checkout.as_deref(), Some("2024-01-05"));
        assert_eq!(session.guest_count.as_deref(), Some("2"));
    }

    #[test]
    fn id_photo_without_attachment_is_idempotent() {
        let engine = hotel();
        let (_, session) = drive(&engine, &["2", "1", "Asha", "2024-01-01", "2024-01-05", "2"]);
        let session = session.unwrap();

        for _ in 0..2 {
            let msg = InboundMessage::text(FROM, "here you go").with_media("   ");
            let outcome = engine.step(&session, &msg);
            assert_eq!(kept(&outcome), &session);
            assert_eq!(outcome.reply, prompts::ID_PHOTO_MISSING);
            assert!(outcome.effects.is_empty());
        }
    }

    #[test]
    fn id_photo_with_attachment_completes_registration() {
        let engine = hotel();
        let (_, session) = drive(&engine, &["2", "1", "Asha", "2024-01-01", "2024-01-05", "2"]);
        let session = session.unwrap();

        let msg = InboundMessage::text(FROM, "").with_media("https://media.example/id.jpg");
        let outcome = engine.step(&session, &msg);

        assert!(outcome.completes_session());
        assert_eq!(outcome.reply, prompts::REGISTRATION_DONE);
        match outcome.effects.as_slice() {
            [Effect::RecordGuest(record), Effect::Email { subject, body }] => {
                assert_eq!(record.name, "Asha");
                assert_eq!(record.checkin, "2024-01-01");
                assert_eq!(record.checkout, "2024-01-05");
                assert_eq!(record.guest_count, "2");
                assert_eq!(subject, "Guest Registration");
                assert!(body.contains("ID: https://media.example/id.jpg"));
            }
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn registering_without_step_restarts() {
        let engine = hotel();
        let corrupted = Session::new(DialogueState::Registering);
        let outcome = engine.step(&corrupted, &InboundMessage::text(FROM, "Asha"));
        assert_eq!(kept(&outcome), &engine.new_session());
        assert_eq!(outcome.reply, prompts::SESSION_RESTART);
    }

    #[test]
    fn comma_heavy_text_from_initial_state_is_a_reservation() {
        let engine = hotel();
        let start = engine.new_session();
        let outcome = engine.step(&start, &InboundMessage::text(FROM, "John,2024-01-01,2024-01-05,2"));

        assert_eq!(kept(&outcome), &start);
        assert_eq!(outcome.reply, prompts::RESERVATION_RECEIVED);
        assert_eq!(
            outcome.effects,
            vec![Effect::Email {
                subject: "New Reservation Request".into(),
                body: format!("Customer: {FROM}\nDetails: John,2024-01-01,2024-01-05,2"),
            }]
        );
    }

    #[test]
    fn two_commas_is_not_a_reservation() {
        assert!(!looks_like_reservation("a, b, c"));
        assert!(looks_like_reservation("a, b, c, d"));
    }

    #[test]
    fn free_text_inside_a_flow_is_not_a_reservation() {
        let engine = hotel();
        let (outcome, _) = drive(&engine, &["2", "2", "3", "Noisy, dirty, cold, late"]);
        assert_eq!(outcome.reply, prompts::COMPLAINT_SENT);
    }

    #[test]
    fn restaurant_options_and_aliases() {
        let engine = restaurant();
        let start = engine.new_session();
        assert_eq!(start.state, DialogueState::MainMenu);

        let cases = [
            ("1", prompts::RESTAURANT_MENU_LINK),
            ("2", prompts::RESERVATION_FORMAT),
            ("Reservation", prompts::RESERVATION_FORMAT),
            ("3", prompts::PROMOTION),
            ("PROMOTION", prompts::PROMOTION),
            ("hi", prompts::RESTAURANT_WELCOME),
            ("menu", prompts::RESTAURANT_WELCOME),
        ];
        for (input, expected) in cases {
            let outcome = engine.step(&start, &InboundMessage::text(FROM, input));
            assert_eq!(outcome.reply, expected, "input {input:?}");
            assert_eq!(kept(&outcome).state, DialogueState::MainMenu);
            assert!(outcome.effects.is_empty());
        }
    }

    #[test]
    fn restaurant_reservation_by_free_text() {
        let engine = restaurant();
        let outcome = engine.step(
            &engine.new_session(),
            &InboundMessage::text(FROM, "Ravi, 12 Jan, 8pm, 4"),
        );
        assert_eq!(outcome.reply, prompts::RESERVATION_RECEIVED);
        assert!(matches!(&outcome.effects[..], [Effect::Email { subject, .. }] if subject == "New Reservation Request"));
    }

    #[test]
    fn restaurant_heals_foreign_state() {
        let engine = restaurant();
        let outcome = engine.step(
            &Session::new(DialogueState::Complaint),
            &InboundMessage::text(FROM, "1"),
        );
        assert_eq!(kept(&outcome), &engine.new_session());
        assert_eq!(outcome.reply, prompts::RESTAURANT_WELCOME);
    }
}
