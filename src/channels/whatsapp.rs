//! WhatsApp over the Twilio Messages REST API.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, info};

use crate::channels::MessageSender;
use crate::config::ProviderConfig;
use crate::error::ChannelError;

const CHANNEL_NAME: &str = "whatsapp";

/// Response fields we care about from `POST .../Messages.json`.
#[derive(Debug, Deserialize)]
struct CreatedMessage {
    sid: String,
}

/// Twilio WhatsApp client.
pub struct TwilioWhatsApp {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl TwilioWhatsApp {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl MessageSender for TwilioWhatsApp {
    async fn send_message(&self, to: &str, body: &str) -> Result<String, ChannelError> {
        if self.config.account_sid.is_empty() || self.config.from_number.is_empty() {
            return Err(ChannelError::NotConfigured {
                name: CHANNEL_NAME.into(),
                reason: "TWILIO_ACCOUNT_SID and TWILIO_WHATSAPP_NUMBER must be set".into(),
            });
        }

        let to = whatsapp_address(to);
        let from = whatsapp_address(&self.config.from_number);
        debug!(to = %to, len = body.len(), "Sending WhatsApp message");

        let resp = self
            .client
            .post(self.messages_url())
            .basic_auth(
                &self.config.account_sid,
                Some(self.config.auth_token.expose_secret()),
            )
            .form(&[("To", to.as_str()), ("From", from.as_str()), ("Body", body)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChannelError::Rejected {
                name: CHANNEL_NAME.into(),
                status: status.as_u16(),
                body,
            });
        }

        let created: CreatedMessage = resp.json().await?;
        info!(sid = %created.sid, to = %to, "WhatsApp message sent");
        Ok(created.sid)
    }
}

/// Prefix a bare phone number with `whatsapp:`.
pub fn whatsapp_address(number: &str) -> String {
    let number = number.trim();
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else {
        format!("whatsapp:{number}")
    }
}
