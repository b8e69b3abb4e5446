//! Guest ledger — spreadsheet-compatible log of completed registrations.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use tokio::sync::Mutex;
use tracing::info;

use crate::dialogue::session::{Session, field};
use crate::error::StorageError;

/// Column header written once when the ledger is created.
pub const HEADER: [&str; 5] = ["Name", "Check-in", "Check-out", "Guests", "Time"];

/// One completed registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestRecord {
    pub name: String,
    pub checkin: String,
    pub checkout: String,
    pub guest_count: String,
    pub completed_at: DateTime<Local>,
}

impl GuestRecord {
    /// Build a record from a finished registration session.
    pub fn from_session(session: &Session, completed_at: DateTime<Utc>) -> Self {
        Self {
            name: field(&session.name).to_string(),
            checkin: field(&session.checkin).to_string(),
            checkout: field(&session.checkout).to_string(),
            guest_count: field(&session.guest_count).to_string(),
            completed_at: completed_at.with_timezone(&Local),
        }
    }

    /// The record as a ledger row, in [`HEADER`] order.
    pub fn row(&self) -> [String; 5] {
        [
            self.name.clone(),
            self.checkin.clone(),
            self.checkout.clone(),
            self.guest_count.clone(),
            self.completed_at.format("%Y-%m-%d %H:%M").to_string(),
        ]
    }
}

/// Append-only registration storage.
#[async_trait]
pub trait GuestLedger: Send + Sync {
    /// Append `record`, creating the ledger with its header if needed.
    ///
    /// Returns the 1-based row number written (the header is row 1).
    async fn append(&self, record: &GuestRecord) -> Result<usize, StorageError>;
}

/// CSV file ledger. Appends are serialized by an internal lock.
pub struct CsvLedger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl GuestLedger for CsvLedger {
    async fn append(&self, record: &GuestRecord) -> Result<usize, StorageError> {
        let _guard = self.lock.lock().await;

        let path = self.path.clone();
        let row = record.row();
        let written = tokio::task::spawn_blocking(move || append_row(&path, &row))
            .await
            .map_err(|e| StorageError::Task(e.to_string()))??;

        info!(path = %self.path.display(), row = written, "Guest registration recorded");
        Ok(written)
    }
}

/// Count existing rows, then append one (plus the header on a new file).
fn append_row(path: &Path, row: &[String; 5]) -> Result<usize, StorageError> {
    let io_error = |source: std::io::Error| StorageError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut existing = 0;
    if path.exists() {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;
        for result in reader.records() {
            result?;
            existing += 1;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_error)?;
    let mut writer = csv::Writer::from_writer(file);

    if existing == 0 {
        writer.write_record(HEADER)?;
        existing = 1;
    }
    writer.write_record(row)?;
    writer.flush().map_err(io_error)?;

    Ok(existing + 1)
}

/// In-memory ledger, for tests.
#[derive(Default)]
pub struct MemoryLedger {
    rows: Mutex<Vec<Vec<String>>>,
}

impl MemoryLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// All rows, header included.
    pub async fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl GuestLedger for MemoryLedger {
    async fn append(&self, record: &GuestRecord) -> Result<usize, StorageError> {
        let mut rows = self.rows.lock().await;
        if rows.is_empty() {
            rows.push(HEADER.iter().map(|h| h.to_string()).collect());
        }
        rows.push(record.row().to_vec());
        Ok(rows.len())
    }
}
