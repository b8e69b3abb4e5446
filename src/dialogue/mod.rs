//! Menu dialogue — per-sender states, prompts and the transition engine.
//!
//! The engine is a pure function of (session, inbound message). Callers own
//! storage and perform the side effects it requests.

pub mod engine;
pub mod prompts;
pub mod session;
pub mod state;

pub use engine::{DialogueEngine, Effect, InboundMessage, Outcome, SessionUpdate};
pub use session::Session;
pub use state::{DialogueState, RegistrationStep};
