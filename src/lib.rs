//! Concierge — WhatsApp guest-services dialogue.

pub mod channels;
pub mod concierge;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod routes;
pub mod store;
