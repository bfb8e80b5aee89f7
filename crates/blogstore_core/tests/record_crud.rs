use blogstore_core::{
    Category, MemoryStorage, RecordDraft, RecordStore, SqliteStorage, StorageBackend,
    StorageError, StorageResult, StoreError, SyncStatus,
};
use std::collections::HashSet;
use uuid::Uuid;

#[test]
fn add_preserves_insertion_order_and_assigns_unique_ids() {
    let mut store = RecordStore::open(MemoryStorage::new());

    store.add(&RecordDraft::new("first", "b1")).unwrap();
    store.add(&RecordDraft::new("second", "b2")).unwrap();
    store.add(&RecordDraft::new("third", "b3")).unwrap();

    let records = store.list(None);
    let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["first", "second", "third"]);

    let ids: HashSet<_> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), 3);
}

#[test]
fn add_rejects_blank_fields_and_leaves_list_unchanged() {
    let mut store = RecordStore::open(MemoryStorage::new());

    let err = store.add(&RecordDraft::new("", "body")).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    let err = store.add(&RecordDraft::new("title", "   ")).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    assert!(store.is_empty());
    assert!(store.list(None).is_empty());
}

#[test]
fn add_stores_trimmed_fields() {
    let mut store = RecordStore::open(MemoryStorage::new());

    let outcome = store.add(&RecordDraft::new("  Hello  ", "\tworld\n")).unwrap();
    assert_eq!(outcome.record.title, "Hello");
    assert_eq!(outcome.record.body, "world");
}

#[test]
fn update_rewrites_fields_in_place_keeping_id_and_position() {
    let mut store = RecordStore::open(MemoryStorage::new());

    let first = store.add(&RecordDraft::new("A", "b1")).unwrap().record;
    store.add(&RecordDraft::new("B", "b2")).unwrap();

    let updated = store
        .update(first.id, &RecordDraft::new("A2", "b2"))
        .unwrap()
        .record;
    assert_eq!(updated.id, first.id);
    assert_eq!(updated.title, "A2");
    assert_eq!(updated.body, "b2");

    let records = store.list(None);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, first.id);
    assert_eq!(records[0].title, "A2");
    assert_eq!(records[1].title, "B");
}

#[test]
fn update_preserves_category_unless_draft_supplies_one() {
    let mut store = RecordStore::open(MemoryStorage::new());

    let record = store
        .add(&RecordDraft::new("A", "b1").with_category(Category::Technology))
        .unwrap()
        .record;

    let updated = store
        .update(record.id, &RecordDraft::new("A2", "b2"))
        .unwrap()
        .record;
    assert_eq!(updated.category, Some(Category::Technology));

    let updated = store
        .update(
            record.id,
            &RecordDraft::new("A3", "b3").with_category(Category::Health),
        )
        .unwrap()
        .record;
    assert_eq!(updated.category, Some(Category::Health));
}

#[test]
fn update_missing_id_returns_not_found_and_leaves_list_unchanged() {
    let mut store = RecordStore::open(MemoryStorage::new());
    store.add(&RecordDraft::new("A", "b1")).unwrap();

    let missing = Uuid::new_v4();
    let err = store
        .update(missing, &RecordDraft::new("A2", "b2"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));

    let records = store.list(None);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "A");
}

#[test]
fn update_validation_failure_leaves_record_unchanged() {
    let mut store = RecordStore::open(MemoryStorage::new());
    let record = store.add(&RecordDraft::new("A", "b1")).unwrap().record;

    let err = store
        .update(record.id, &RecordDraft::new(" ", "b2"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    let records = store.list(None);
    assert_eq!(records[0].title, "A");
    assert_eq!(records[0].body, "b1");
}

#[test]
fn delete_removes_one_record_and_preserves_relative_order() {
    let mut store = RecordStore::open(MemoryStorage::new());

    let a = store.add(&RecordDraft::new("A", "b1")).unwrap().record;
    let b = store.add(&RecordDraft::new("B", "b2")).unwrap().record;
    let c = store.add(&RecordDraft::new("C", "b3")).unwrap().record;

    assert!(store.delete(b.id).is_synced());

    let ids: Vec<_> = store.list(None).iter().map(|r| r.id).collect();
    assert_eq!(ids, [a.id, c.id]);
}

#[test]
fn delete_is_idempotent_for_missing_and_repeated_ids() {
    let mut store = RecordStore::open(MemoryStorage::new());
    let record = store.add(&RecordDraft::new("A", "b1")).unwrap().record;

    // Unknown id is a silent no-op.
    assert!(store.delete(Uuid::new_v4()).is_synced());
    assert_eq!(store.len(), 1);

    // Deleting twice ends in the same state as deleting once.
    assert!(store.delete(record.id).is_synced());
    assert!(store.delete(record.id).is_synced());
    assert!(store.is_empty());
}

#[test]
fn list_filters_by_category() {
    let mut store = RecordStore::open(MemoryStorage::new());

    let a = store
        .add(&RecordDraft::new("A", "b1").with_category(Category::Technology))
        .unwrap()
        .record;
    store
        .add(&RecordDraft::new("B", "b2").with_category(Category::Health))
        .unwrap();
    store.add(&RecordDraft::new("C", "b3")).unwrap();

    let tech = store.list(Some(Category::Technology));
    assert_eq!(tech.len(), 1);
    assert_eq!(tech[0].id, a.id);

    // Uncategorized records never match a category filter.
    assert!(store.list(Some(Category::Travel)).is_empty());
}

#[test]
fn list_returns_detached_snapshot() {
    let mut store = RecordStore::open(MemoryStorage::new());
    store.add(&RecordDraft::new("A", "b1")).unwrap();

    let mut snapshot = store.list(None);
    snapshot[0].title = "mutated".to_string();
    snapshot.clear();

    assert_eq!(store.list(None)[0].title, "A");
}

#[test]
fn store_reopens_from_persisted_mirror() {
    let storage = MemoryStorage::new();

    let mut store = RecordStore::open(storage.clone());
    let a = store
        .add(&RecordDraft::new("A", "b1").with_category(Category::Food))
        .unwrap()
        .record;
    let b = store.add(&RecordDraft::new("B", "b2")).unwrap().record;
    drop(store);

    let reopened = RecordStore::open(storage);
    let records = reopened.list(None);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], a);
    assert_eq!(records[1], b);
}

#[test]
fn store_reopens_from_sqlite_mirror_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blogstore.db");

    let mut store = RecordStore::open(SqliteStorage::open(&path).unwrap());
    let record = store
        .add(&RecordDraft::new("Durable", "survives reopen").with_category(Category::Travel))
        .unwrap()
        .record;
    store.add(&RecordDraft::new("Gone", "deleted before reopen")).unwrap();
    let victim = store.list(None)[1].id;
    assert!(store.delete(victim).is_synced());
    drop(store);

    let reopened = RecordStore::open(SqliteStorage::open(&path).unwrap());
    let records = reopened.list(None);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0], record);
}

#[test]
fn restore_fails_open_on_corrupt_or_invalid_snapshot() {
    let storage = MemoryStorage::new();
    storage.persist("definitely not json").unwrap();
    assert!(RecordStore::open(storage).is_empty());

    let storage = MemoryStorage::new();
    let id = Uuid::new_v4();
    let duplicate_ids = format!(
        "[{{\"id\":\"{id}\",\"title\":\"a\",\"body\":\"b\",\"category\":null}},\
          {{\"id\":\"{id}\",\"title\":\"c\",\"body\":\"d\",\"category\":null}}]"
    );
    storage.persist(&duplicate_ids).unwrap();
    assert!(RecordStore::open(storage).is_empty());
}

struct FailingStorage;

impl StorageBackend for FailingStorage {
    fn persist(&self, _payload: &str) -> StorageResult<()> {
        Err(StorageError::Sqlite(rusqlite::Error::InvalidQuery))
    }

    fn restore(&self) -> StorageResult<Option<String>> {
        Ok(None)
    }
}

#[test]
fn persist_failure_is_a_warning_and_keeps_the_mutation() {
    let mut store = RecordStore::open(FailingStorage);

    let outcome = store.add(&RecordDraft::new("A", "b1")).unwrap();
    assert!(matches!(outcome.sync, SyncStatus::Failed(_)));
    assert_eq!(store.len(), 1);

    let sync = store.delete(outcome.record.id);
    assert!(matches!(sync, SyncStatus::Failed(_)));
    assert!(store.is_empty());
}
