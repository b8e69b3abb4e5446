//! Outbound notifier — messaging-provider and mail-relay ports.

pub mod email;
pub mod whatsapp;

use async_trait::async_trait;

use crate::error::ChannelError;

pub use email::SmtpMailer;
pub use whatsapp::TwilioWhatsApp;

/// Delivers a text message to a chat address.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send `body` to `to`. Returns the provider's message ID.
    async fn send_message(&self, to: &str, body: &str) -> Result<String, ChannelError>;
}

/// Delivers a notification email to the venue's manager address(es).
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_email(&self, subject: &str, body: &str) -> Result<(), ChannelError>;
}
