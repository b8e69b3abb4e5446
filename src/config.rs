//! Configuration types, built from environment variables.
//!
//! Nothing here is fatal when missing: an empty provider or relay credential
//! surfaces later as a logged delivery failure.

use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Which dialogue the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogueProfile {
    /// Hotel guest services: language selection, registration, room service.
    #[default]
    Hotel,
    /// Restaurant front desk: menu link, reservations, promotions.
    Restaurant,
}

impl FromStr for DialogueProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hotel" => Ok(Self::Hotel),
            "restaurant" => Ok(Self::Restaurant),
            other => Err(ConfigError::InvalidValue {
                key: "CONCIERGE_PROFILE".into(),
                message: format!("expected `hotel` or `restaurant`, got `{other}`"),
            }),
        }
    }
}

impl std::fmt::Display for DialogueProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hotel => write!(f, "hotel"),
            Self::Restaurant => write!(f, "restaurant"),
        }
    }
}

/// Twilio messaging-provider settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub account_sid: String,
    pub auth_token: SecretString,
    /// Sender address, e.g. `whatsapp:+14155238886`.
    pub from_number: String,
    pub api_base: String,
    /// Destination for manager alerts. Alerts are only logged when unset.
    pub manager_number: Option<String>,
}

impl ProviderConfig {
    pub fn from_env() -> Self {
        Self {
            account_sid: std::env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            auth_token: SecretString::from(
                std::env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            ),
            from_number: std::env::var("TWILIO_WHATSAPP_NUMBER").unwrap_or_default(),
            api_base: std::env::var("TWILIO_API_BASE")
                .unwrap_or_else(|_| "https://api.twilio.com".to_string()),
            manager_number: std::env::var("MANAGER_WHATSAPP_NUMBER")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

/// SMTP relay settings for notification email.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: SecretString,
    pub from_address: String,
    pub recipients: Vec<String>,
}

impl MailConfig {
    pub fn from_env() -> Self {
        let username = std::env::var("EMAIL_USERNAME").unwrap_or_default();
        let from_address =
            std::env::var("EMAIL_FROM_ADDRESS").unwrap_or_else(|_| username.clone());

        Self {
            smtp_host: std::env::var("EMAIL_SMTP_HOST")
                .unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port: std::env::var("EMAIL_SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(587),
            username,
            password: SecretString::from(std::env::var("EMAIL_PASSWORD").unwrap_or_default()),
            from_address,
            recipients: split_list(&std::env::var("MANAGER_EMAIL").unwrap_or_default()),
        }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub profile: DialogueProfile,
    pub port: u16,
    pub users_path: PathBuf,
    pub ledger_path: PathBuf,
    pub provider: ProviderConfig,
    pub mail: MailConfig,
}

impl Config {
    /// Build config from environment variables.
    ///
    /// Only an unrecognised `CONCIERGE_PROFILE` is rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        let profile = match std::env::var("CONCIERGE_PROFILE") {
            Ok(raw) => raw.parse()?,
            Err(_) => DialogueProfile::default(),
        };

        let port: u16 = std::env::var("CONCIERGE_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        Ok(Self {
            profile,
            port,
            users_path: std::env::var("CONCIERGE_USERS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("users.json")),
            ledger_path: std::env::var("CONCIERGE_LEDGER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("guests.csv")),
            provider: ProviderConfig::from_env(),
            mail: MailConfig::from_env(),
        })
    }
}

/// Split a comma-separated list, dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
