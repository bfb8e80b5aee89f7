//! Domain model for blog-post records.
//!
//! # Responsibility
//! - Define canonical data structures used by the record store.
//! - Keep one record shape shared by in-memory state and the mirror payload.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - Text-field validity is enforced before a record ever enters a store.

pub mod record;
