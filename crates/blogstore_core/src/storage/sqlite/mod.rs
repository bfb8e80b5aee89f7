//! SQLite-backed mirror storage.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the mirror database.
//! - Apply schema migrations in deterministic order.
//! - Persist/restore the snapshot payload in a single key/value slot.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - The mirror holds at most one row per slot; `persist` replaces it.

use super::{StorageBackend, StorageError, StorageResult};
use log::{error, info};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

const MIRROR_SLOT: &str = "records";

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Opens a mirror database file and applies all pending migrations.
///
/// # Side effects
/// - Performs connection bootstrap and migration checks.
/// - Emits `mirror_open` logging events with duration and status.
pub fn open_mirror_db(path: impl AsRef<Path>) -> StorageResult<Connection> {
    let started_at = Instant::now();
    info!("event=mirror_open module=storage status=start mode=file");

    let result = Connection::open(path)
        .map_err(StorageError::from)
        .and_then(|mut conn| {
            bootstrap_connection(&mut conn)?;
            Ok(conn)
        });

    match &result {
        Ok(_) => info!(
            "event=mirror_open module=storage status=ok mode=file duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=mirror_open module=storage status=error mode=file duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }

    result
}

/// Opens an in-memory mirror database and applies all pending migrations.
pub fn open_mirror_db_in_memory() -> StorageResult<Connection> {
    let started_at = Instant::now();
    info!("event=mirror_open module=storage status=start mode=memory");

    let result = Connection::open_in_memory()
        .map_err(StorageError::from)
        .and_then(|mut conn| {
            bootstrap_connection(&mut conn)?;
            Ok(conn)
        });

    match &result {
        Ok(_) => info!(
            "event=mirror_open module=storage status=ok mode=memory duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=mirror_open module=storage status=error mode=memory duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }

    result
}

fn bootstrap_connection(conn: &mut Connection) -> StorageResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}

fn apply_migrations(conn: &mut Connection) -> StorageResult<()> {
    let current_version: u32 =
        conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();

    if current_version > latest {
        return Err(StorageError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(())
}

/// Durable mirror backend over a single SQLite key/value slot.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Wraps an already-bootstrapped connection (from [`open_mirror_db`] or
    /// [`open_mirror_db_in_memory`]).
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens a file-backed mirror at `path`.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self::new(open_mirror_db(path)?))
    }

    /// Opens an in-memory mirror, mostly useful for tests.
    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self::new(open_mirror_db_in_memory()?))
    }
}

impl StorageBackend for SqliteStorage {
    fn persist(&self, payload: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO mirror (slot, payload) VALUES (?1, ?2)
             ON CONFLICT(slot) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            [MIRROR_SLOT, payload],
        )?;
        Ok(())
    }

    fn restore(&self) -> StorageResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM mirror WHERE slot = ?1;",
                [MIRROR_SLOT],
                |row| row.get(0),
            )
            .optional()?;
        Ok(payload)
    }
}
