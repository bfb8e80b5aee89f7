//! Ephemeral in-process storage backend.

use super::{StorageBackend, StorageResult};
use std::cell::RefCell;
use std::rc::Rc;

/// Volatile single-slot backend for tests and non-durable embedders.
///
/// Clones share the same slot, so a store can be dropped and reopened over
/// the "same" storage inside one process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn persist(&self, payload: &str) -> StorageResult<()> {
        *self.slot.borrow_mut() = Some(payload.to_string());
        Ok(())
    }

    fn restore(&self) -> StorageResult<Option<String>> {
        Ok(self.slot.borrow().clone())
    }
}
