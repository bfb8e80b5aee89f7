//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `blogstore_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use blogstore_core::{MemoryStorage, RecordDraft, RecordStore};

fn main() {
    println!("blogstore_core ping={}", blogstore_core::ping());
    println!("blogstore_core version={}", blogstore_core::core_version());

    // Exercise one full mutation cycle against the volatile backend; record
    // ids are random, so only counts are printed.
    let mut store = RecordStore::open(MemoryStorage::new());
    let outcome = store
        .add(&RecordDraft::new("smoke", "core wiring check"))
        .expect("smoke draft is valid");
    println!(
        "blogstore_core records={} synced={}",
        store.len(),
        outcome.sync.is_synced()
    );
}
