//! Concierge — runs inbound messages through the dialogue and dispatches
//! the resulting notifications.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::channels::{Mailer, MessageSender, SmtpMailer, TwilioWhatsApp};
use crate::config::Config;
use crate::dialogue::engine::{DialogueEngine, Effect, InboundMessage, Outcome};
use crate::store::ledger::{CsvLedger, GuestLedger};
use crate::store::registry::{JsonFileSnapshot, KnownSenders, SnapshotStore};
use crate::store::sessions::SessionStore;

/// External collaborators the concierge calls into.
pub struct ConciergeDeps {
    pub messenger: Arc<dyn MessageSender>,
    pub mailer: Arc<dyn Mailer>,
    pub ledger: Arc<dyn GuestLedger>,
    pub snapshot: Arc<dyn SnapshotStore>,
    /// Destination for manager alerts; alerts are only logged when `None`.
    pub manager_number: Option<String>,
}

impl ConciergeDeps {
    /// Production collaborators: Twilio, SMTP, CSV ledger and JSON snapshot.
    pub fn from_config(config: &Config) -> Self {
        Self {
            messenger: Arc::new(TwilioWhatsApp::new(config.provider.clone())),
            mailer: Arc::new(SmtpMailer::new(config.mail.clone())),
            ledger: Arc::new(CsvLedger::new(&config.ledger_path)),
            snapshot: Arc::new(JsonFileSnapshot::new(&config.users_path)),
            manager_number: config.provider.manager_number.clone(),
        }
    }
}

/// Outcome of a promotional broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub attempted: usize,
    pub failed: usize,
}

/// Shared service behind the webhook and broadcast endpoints.
pub struct Concierge {
    engine: DialogueEngine,
    sessions: SessionStore,
    senders: KnownSenders,
    messenger: Arc<dyn MessageSender>,
    mailer: Arc<dyn Mailer>,
    ledger: Arc<dyn GuestLedger>,
    manager_number: Option<String>,
}

impl Concierge {
    /// Build the service, loading known senders from the snapshot.
    pub async fn new(engine: DialogueEngine, deps: ConciergeDeps) -> Self {
        let senders = KnownSenders::load(deps.snapshot).await;
        Self {
            engine,
            sessions: SessionStore::new(engine.initial_state()),
            senders,
            messenger: deps.messenger,
            mailer: deps.mailer,
            ledger: deps.ledger,
            manager_number: deps.manager_number,
        }
    }

    pub fn engine(&self) -> &DialogueEngine {
        &self.engine
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn senders(&self) -> &KnownSenders {
        &self.senders
    }

    /// Handle one inbound message and return the reply for the sender.
    ///
    /// Side-effect failures are logged and never affect the reply.
    pub async fn handle_inbound(&self, msg: InboundMessage) -> String {
        info!(from = %msg.from, body = %msg.body, media = msg.media_url.is_some(), "Incoming message");

        if let Err(e) = self.senders.mark_seen(&msg.from).await {
            warn!(from = %msg.from, "Failed to persist known senders: {}", e);
        }

        let engine = self.engine;
        let (reply, effects) = self
            .sessions
            .transition(&msg.from, |session| {
                let outcome = engine.step(session, &msg);
                debug!(
                    from = %msg.from,
                    state = %session.state,
                    completed = outcome.completes_session(),
                    effects = outcome.effects.len(),
                    "Dialogue step"
                );
                let Outcome {
                    update,
                    reply,
                    effects,
                } = outcome;
                (update, (reply, effects))
            })
            .await;

        for effect in effects {
            self.dispatch(&msg.from, effect).await;
        }

        reply
    }

    async fn dispatch(&self, from: &str, effect: Effect) {
        match effect {
            Effect::ManagerAlert(text) => self.alert_manager(&text).await,
            Effect::Email { subject, body } => {
                if let Err(e) = self.mailer.send_email(&subject, &body).await {
                    warn!(from, subject = %subject, "Failed to send notification email: {}", e);
                }
            }
            Effect::RecordGuest(record) => {
                if let Err(e) = self.ledger.append(&record).await {
                    warn!(from, guest = %record.name, "Failed to record guest registration: {}", e);
                }
            }
        }
    }

    async fn alert_manager(&self, text: &str) {
        let Some(manager) = self.manager_number.as_deref() else {
            info!(alert = %text, "Manager alert (no manager number configured)");
            return;
        };
        if let Err(e) = self.messenger.send_message(manager, text).await {
            warn!(manager, "Failed to send manager alert: {}", e);
        }
    }

    /// Send `message` to every known sender, continuing past failures.
    pub async fn broadcast(&self, message: &str) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        for address in self.senders.addresses().await {
            report.attempted += 1;
            if let Err(e) = self.messenger.send_message(&address, message).await {
                report.failed += 1;
                warn!(to = %address, "Error broadcasting: {}", e);
            }
        }
        info!(
            attempted = report.attempted,
            failed = report.failed,
            "Broadcast finished"
        );
        report
    }
}
