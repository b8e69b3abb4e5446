//! Notification email over an SMTP relay via lettre.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;

use crate::channels::Mailer;
use crate::config::MailConfig;
use crate::error::ChannelError;

const CHANNEL_NAME: &str = "email";

fn send_failed(reason: String) -> ChannelError {
    ChannelError::SendFailed {
        name: CHANNEL_NAME.into(),
        reason,
    }
}

/// SMTP mailer addressed to the configured manager recipients.
pub struct SmtpMailer {
    config: MailConfig,
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Build the outgoing message to every recipient.
    fn build_message(&self, subject: &str, body: &str) -> Result<Message, ChannelError> {
        if self.config.recipients.is_empty() {
            return Err(ChannelError::NotConfigured {
                name: CHANNEL_NAME.into(),
                reason: "MANAGER_EMAIL is not set".into(),
            });
        }

        let from: Mailbox = self
            .config
            .from_address
            .parse()
            .map_err(|e| send_failed(format!("Invalid from address: {e}")))?;

        let mut builder = Message::builder().from(from).subject(subject);
        for recipient in &self.config.recipients {
            let to: Mailbox = recipient
                .parse()
                .map_err(|e| send_failed(format!("Invalid to address {recipient}: {e}")))?;
            builder = builder.to(to);
        }

        builder
            .body(body.to_string())
            .map_err(|e| send_failed(format!("Failed to build email: {e}")))
    }

    /// Send via SMTP (blocking — run in spawn_blocking).
    fn send_blocking(config: &MailConfig, email: &Message) -> Result<(), ChannelError> {
        let creds = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let transport = SmtpTransport::starttls_relay(&config.smtp_host)
            .map_err(|e| send_failed(format!("SMTP relay error: {e}")))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        transport
            .send(email)
            .map_err(|e| send_failed(format!("SMTP send failed: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_email(&self, subject: &str, body: &str) -> Result<(), ChannelError> {
        let email = self.build_message(subject, body)?;
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || Self::send_blocking(&config, &email))
            .await
            .map_err(|e| send_failed(format!("SMTP task panicked: {e}")))??;

        tracing::info!(
            subject,
            recipients = self.config.recipients.len(),
            "Notification email sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config(recipients: &[&str]) -> MailConfig {
        MailConfig {
            smtp_host: "smtp.example.com".into(),
            smtp_port: 587,
            username: "desk@example.com".into(),
            password: SecretString::from("secret".to_string()),
            from_address: "desk@example.com".into(),
            recipients: recipients.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn builds_message_for_every_recipient() {
        let mailer = SmtpMailer::new(config(&["manager@example.com", "owner@example.com"]));
        let email = mailer.build_message("Guest Complaint", "AC broken").unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("Subject: Guest Complaint"));
        assert!(raw.contains("manager@example.com"));
        assert!(raw.contains("owner@example.com"));
        assert!(raw.contains("AC broken"));
    }

    #[test]
    fn missing_recipients_is_not_configured() {
        let mailer = SmtpMailer::new(config(&[]));
        let err = mailer.build_message("s", "b").unwrap_err();
        assert!(matches!(err, ChannelError::NotConfigured { .. }));
    }

    #[test]
    fn invalid_recipient_is_reported() {
        let mailer = SmtpMailer::new(config(&["not an address"]));
        let err = mailer.build_message("s", "b").unwrap_err();
        assert!(err.to_string().contains("Invalid to address"));
    }
}
