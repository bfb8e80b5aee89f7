//! Persistence backends for the record mirror.
//!
//! # Responsibility
//! - Define the storage contract the record store mirrors into.
//! - Isolate SQLite details from store/business orchestration.
//!
//! # Invariants
//! - Backends treat the payload as opaque text; encoding belongs to the store.
//! - `restore` distinguishes "no prior data" (`Ok(None)`) from failure.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure raised by a storage backend itself.
///
/// The record store treats these as non-fatal to the in-memory mutation and
/// surfaces them as sync warnings, never as operation errors.
#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "mirror schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Durable mirror consumed by the record store.
///
/// `persist` replaces the whole stored snapshot; `restore` returns the last
/// persisted snapshot, or `None` when nothing was ever persisted.
pub trait StorageBackend {
    fn persist(&self, payload: &str) -> StorageResult<()>;
    fn restore(&self) -> StorageResult<Option<String>>;
}
