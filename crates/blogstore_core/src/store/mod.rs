//! Authoritative in-memory record collection with a persisted mirror.
//!
//! # Responsibility
//! - Own the ordered record list and expose add/update/delete/list.
//! - Mirror the full collection into a storage backend after every mutation.
//!
//! # Invariants
//! - List order is insertion order; update keeps a record's position.
//! - The mirror is written only after the in-memory change succeeds, so a
//!   persist failure never corrupts in-memory state.
//! - Every mutation triggers at most one full-collection persist.

use crate::model::record::{Category, Record, RecordDraft, RecordId, RecordValidationError};
use crate::storage::{StorageBackend, StorageError};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Operation error for record mutations.
///
/// Persist failures are deliberately absent here: the in-memory mutation has
/// already succeeded by the time the mirror is written, so they travel as
/// [`SyncStatus::Failed`] warnings instead.
#[derive(Debug)]
pub enum StoreError {
    Validation(RecordValidationError),
    NotFound(RecordId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Outcome of the mirror write that follows a successful mutation.
///
/// `Failed` means the collection changed in memory but the durable mirror may
/// be stale; callers surface it as a "changes may not be saved" warning.
#[derive(Debug)]
pub enum SyncStatus {
    Synced,
    Failed(StorageError),
}

impl SyncStatus {
    pub fn is_synced(&self) -> bool {
        matches!(self, Self::Synced)
    }
}

/// Result envelope for `add`/`update`: the affected record plus the mirror
/// sync outcome.
#[derive(Debug)]
pub struct MutationOutcome {
    pub record: Record,
    pub sync: SyncStatus,
}

/// Ordered record collection mirrored into a storage backend.
///
/// The store is the only writer of its collection; UI layers go through the
/// four operations and render from [`RecordStore::list`] snapshots.
pub struct RecordStore<S: StorageBackend> {
    records: Vec<Record>,
    storage: S,
}

impl<S: StorageBackend> RecordStore<S> {
    /// Opens a store over `storage`, seeding from the last persisted
    /// snapshot when one exists.
    ///
    /// Fails open: an absent payload, a storage read error, a decode error,
    /// or a snapshot violating record invariants all start the store empty
    /// with a logged warning. `open` never raises.
    pub fn open(storage: S) -> Self {
        let records = match storage.restore() {
            Ok(Some(payload)) => match decode_snapshot(&payload) {
                Ok(records) => {
                    info!(
                        "event=store_restore module=store status=ok records={}",
                        records.len()
                    );
                    records
                }
                Err(reason) => {
                    warn!(
                        "event=store_restore module=store status=error error_code=invalid_snapshot error={reason}"
                    );
                    Vec::new()
                }
            },
            Ok(None) => {
                info!("event=store_restore module=store status=ok records=0 source=empty");
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=store_restore module=store status=error error_code=restore_failed error={err}"
                );
                Vec::new()
            }
        };

        Self { records, storage }
    }

    /// Creates a record from `draft` and appends it to the collection.
    ///
    /// # Errors
    /// - `StoreError::Validation` when title or body is empty after trimming;
    ///   the collection is left untouched.
    pub fn add(&mut self, draft: &RecordDraft) -> Result<MutationOutcome, StoreError> {
        let (title, body) = draft.validated()?;
        let record = Record {
            id: Uuid::new_v4(),
            title,
            body,
            category: draft.category,
        };
        self.records.push(record.clone());

        let sync = self.sync_mirror();
        info!(
            "event=record_add module=store status=ok id={} records={}",
            record.id,
            self.records.len()
        );
        Ok(MutationOutcome { record, sync })
    }

    /// Replaces the title/body of the record with `id` in place.
    ///
    /// The record keeps its id and list position. Its category changes only
    /// when `draft.category` is `Some`; a draft without a category preserves
    /// the existing one.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when no record has `id`.
    /// - `StoreError::Validation` under the same emptiness rule as `add`.
    pub fn update(
        &mut self,
        id: RecordId,
        draft: &RecordDraft,
    ) -> Result<MutationOutcome, StoreError> {
        let (title, body) = draft.validated()?;
        let record = self
            .records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(StoreError::NotFound(id))?;

        record.title = title;
        record.body = body;
        if let Some(category) = draft.category {
            record.category = Some(category);
        }
        let record = record.clone();

        let sync = self.sync_mirror();
        info!("event=record_update module=store status=ok id={id}");
        Ok(MutationOutcome { record, sync })
    }

    /// Removes the record with `id`, preserving the order of the rest.
    ///
    /// Idempotent: an absent `id` is a no-op and does not touch the mirror
    /// (nothing changed, so the mirror is still consistent).
    pub fn delete(&mut self, id: RecordId) -> SyncStatus {
        let Some(position) = self.records.iter().position(|record| record.id == id) else {
            return SyncStatus::Synced;
        };
        self.records.remove(position);

        let sync = self.sync_mirror();
        info!(
            "event=record_delete module=store status=ok id={id} records={}",
            self.records.len()
        );
        sync
    }

    /// Returns a fresh snapshot of the collection in insertion order,
    /// optionally narrowed to one category.
    ///
    /// The snapshot is detached; mutating it never affects the store.
    pub fn list(&self, filter: Option<Category>) -> Vec<Record> {
        match filter {
            None => self.records.clone(),
            Some(category) => self
                .records
                .iter()
                .filter(|record| record.category == Some(category))
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn sync_mirror(&self) -> SyncStatus {
        let payload = encode_snapshot(&self.records);
        match self.storage.persist(&payload) {
            Ok(()) => SyncStatus::Synced,
            Err(err) => {
                warn!(
                    "event=mirror_sync module=store status=error records={} error={err}",
                    self.records.len()
                );
                SyncStatus::Failed(err)
            }
        }
    }
}

fn encode_snapshot(records: &[Record]) -> String {
    // Record is a plain struct of strings and unit enums; serialization
    // cannot fail for it.
    serde_json::to_string(records).expect("record snapshot serializes to JSON")
}

fn decode_snapshot(payload: &str) -> Result<Vec<Record>, String> {
    let records: Vec<Record> = serde_json::from_str(payload)
        .map_err(|err| format!("snapshot is not a record array: {err}"))?;

    let mut seen = HashSet::new();
    for record in &records {
        record
            .validate()
            .map_err(|err| format!("record {}: {err}", record.id))?;
        if !seen.insert(record.id) {
            return Err(format!("duplicate record id {}", record.id));
        }
    }

    Ok(records)
}
