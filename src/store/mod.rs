//! Session, known-sender and guest-ledger storage.

pub mod ledger;
pub mod registry;
pub mod sessions;

pub use ledger::{CsvLedger, GuestLedger, GuestRecord, MemoryLedger};
pub use registry::{JsonFileSnapshot, KnownSenders, MemorySnapshot, SnapshotStore};
pub use sessions::SessionStore;
