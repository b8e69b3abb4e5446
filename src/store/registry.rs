//! Known-sender registry — every address that has ever messaged in.
//!
//! Used as the fan-out list for promotional broadcasts. The full set is
//! rewritten to a JSON snapshot after every insertion.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::StorageError;

/// Durable storage for the registry snapshot.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the last saved set. A snapshot that does not exist yet is empty.
    async fn load(&self) -> Result<BTreeSet<String>, StorageError>;

    /// Replace the saved set with `addresses`.
    async fn save(&self, addresses: &BTreeSet<String>) -> Result<(), StorageError>;
}

/// Snapshot stored as a JSON object of `address: true` entries.
pub struct JsonFileSnapshot {
    path: PathBuf,
}

impl JsonFileSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl SnapshotStore for JsonFileSnapshot {
    async fn load(&self) -> Result<BTreeSet<String>, StorageError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        let entries: BTreeMap<String, bool> = serde_json::from_slice(&raw)?;
        Ok(entries
            .into_iter()
            .filter_map(|(address, present)| present.then_some(address))
            .collect())
    }

    async fn save(&self, addresses: &BTreeSet<String>) -> Result<(), StorageError> {
        let entries: BTreeMap<&str, bool> =
            addresses.iter().map(|a| (a.as_str(), true)).collect();
        let json = serde_json::to_vec_pretty(&entries)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| self.io_error(e))
    }
}

/// In-memory snapshot, for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemorySnapshot {
    saved: Mutex<BTreeSet<String>>,
    saves: Mutex<usize>,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the snapshot has been written.
    pub async fn save_count(&self) -> usize {
        *self.saves.lock().await
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshot {
    async fn load(&self) -> Result<BTreeSet<String>, StorageError> {
        Ok(self.saved.lock().await.clone())
    }

    async fn save(&self, addresses: &BTreeSet<String>) -> Result<(), StorageError> {
        *self.saved.lock().await = addresses.clone();
        *self.saves.lock().await += 1;
        Ok(())
    }
}

/// Process-wide set of known sender addresses.
pub struct KnownSenders {
    addresses: Mutex<BTreeSet<String>>,
    snapshot: Arc<dyn SnapshotStore>,
}

impl KnownSenders {
    /// Load the registry from `snapshot`. An unreadable snapshot starts empty.
    pub async fn load(snapshot: Arc<dyn SnapshotStore>) -> Self {
        let addresses = match snapshot.load().await {
            Ok(set) => {
                info!(count = set.len(), "Loaded known senders");
                set
            }
            Err(e) => {
                warn!("Failed to load known-sender snapshot, starting empty: {}", e);
                BTreeSet::new()
            }
        };
        Self {
            addresses: Mutex::new(addresses),
            snapshot,
        }
    }

    /// Record `address` and persist the full set.
    ///
    /// Insertion and snapshot write happen under one lock. Returns whether
    /// the address was new. On a failed write the in-memory set keeps the
    /// address; the next successful save catches the file up.
    pub async fn mark_seen(&self, address: &str) -> Result<bool, StorageError> {
        let mut addresses = self.addresses.lock().await;
        let inserted = addresses.insert(address.to_string());
        if inserted {
            debug!(address, "New sender registered");
        }
        self.snapshot.save(&addresses).await?;
        Ok(inserted)
    }

    /// Sorted copy of all known addresses.
    pub async fn addresses(&self) -> Vec<String> {
        self.addresses.lock().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.addresses.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.addresses.lock().await.is_empty()
    }
}
