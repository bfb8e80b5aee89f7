//! Core domain logic for blogstore.
//! This crate is the single source of truth for record invariants.

pub mod logging;
pub mod model;
pub mod storage;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{Category, Record, RecordDraft, RecordId, RecordValidationError};
pub use storage::{MemoryStorage, SqliteStorage, StorageBackend, StorageError, StorageResult};
pub use store::{MutationOutcome, RecordStore, StoreError, SyncStatus};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
