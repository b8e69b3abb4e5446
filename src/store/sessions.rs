//! In-memory session store — one `Session` per sender address.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::debug;

use crate::dialogue::engine::SessionUpdate;
use crate::dialogue::session::Session;
use crate::dialogue::state::DialogueState;

/// Maps sender addresses to their current session.
///
/// Every operation takes the single map lock, so a lookup-or-create followed
/// by a replace never interleaves with another message from the same sender
/// when done through [`SessionStore::transition`].
pub struct SessionStore {
    initial: DialogueState,
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    /// Create an empty store whose new sessions start in `initial`.
    pub fn new(initial: DialogueState) -> Self {
        Self {
            initial,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Return the sender's session, creating a fresh one if absent.
    pub async fn get_or_create(&self, address: &str) -> Session {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(address.to_string())
            .or_insert_with(|| Session::new(self.initial))
            .clone()
    }

    /// Overwrite the sender's session.
    pub async fn replace(&self, address: &str, session: Session) {
        self.sessions
            .lock()
            .await
            .insert(address.to_string(), session);
    }

    /// Delete the sender's session. A missing address is a no-op.
    pub async fn reset(&self, address: &str) {
        if self.sessions.lock().await.remove(address).is_some() {
            debug!(address, "Session removed");
        }
    }

    /// Atomic read-modify-write of one sender's session.
    ///
    /// `decide` sees the current (or freshly created) session and returns the
    /// update to apply plus a value handed back to the caller. It runs with the
    /// map lock held and must not block.
    pub async fn transition<T, F>(&self, address: &str, decide: F) -> T
    where
        F: FnOnce(&Session) -> (SessionUpdate, T),
    {
        let mut sessions = self.sessions.lock().await;
        let current = sessions
            .entry(address.to_string())
            .or_insert_with(|| Session::new(self.initial));

        let (update, value) = decide(current);
        match update {
            SessionUpdate::Keep(next) => *current = next,
            SessionUpdate::Delete => {
                sessions.remove(address);
            }
        }
        value
    }

    pub async fn contains(&self, address: &str) -> bool {
        self.sessions.lock().await.contains_key(address)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}
