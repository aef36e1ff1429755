// crates/jobboard-store-sqlite/src/engine.rs
// ============================================================================
// Module: SQLite Storage Engine
// Description: Durable partitioned StorageEngine backed by SQLite WAL.
// Purpose: Persist tenant partitions, entries, and sequence counters.
// Dependencies: jobboard-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements the durable [`StorageEngine`] using `SQLite`. One
//! database file holds every tenant partition: partition rows carry the
//! per-partition sequence counter, entry rows carry the byte keys and values.
//! Writes go through a single mutex-guarded connection, so at most one write
//! transaction is in flight process-wide; reads round-robin over a pool of
//! additional connections and never block each other under WAL.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use jobboard_core::PartitionName;
use jobboard_core::StorageEngine;
use jobboard_core::StoreError;
use jobboard_core::StoredEntry;
use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Default read connection pool size.
const DEFAULT_READ_POOL_SIZE: usize = 4;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteEngineMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteEngineMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` storage engine.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
/// - `read_pool_size` must be greater than zero.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteEngineConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteEngineMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Number of read-only connections used for read path isolation.
    #[serde(default = "default_read_pool_size")]
    pub read_pool_size: usize,
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Returns the default read connection pool size.
const fn default_read_pool_size() -> usize {
    DEFAULT_READ_POOL_SIZE
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` engine construction and schema errors.
///
/// # Invariants
/// - Error messages avoid embedding stored record payloads.
#[derive(Debug, Error, Clone)]
pub enum SqliteEngineError {
    /// Engine I/O error.
    #[error("sqlite engine io error: {0}")]
    Io(String),
    /// `SQLite` database error.
    #[error("sqlite engine db error: {0}")]
    Db(String),
    /// Invalid engine configuration or data.
    #[error("sqlite engine invalid data: {0}")]
    Invalid(String),
    /// Store schema version mismatch.
    #[error("sqlite engine version mismatch: {0}")]
    VersionMismatch(String),
}

impl From<SqliteEngineError> for StoreError {
    fn from(error: SqliteEngineError) -> Self {
        match error {
            SqliteEngineError::Io(message) => Self::Io(message),
            SqliteEngineError::Db(message) | SqliteEngineError::VersionMismatch(message) => {
                Self::Backend(message)
            }
            SqliteEngineError::Invalid(message) => Self::Invalid(message),
        }
    }
}

/// Maps a `rusqlite` error to a backend storage error.
fn db_err(err: &rusqlite::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// `SQLite`-backed partitioned storage engine.
///
/// # Invariants
/// - Write access is serialized through a mutex-guarded connection.
/// - Scans return entries in ascending BLOB key order (memcmp order).
#[derive(Clone, Debug)]
pub struct SqliteStorageEngine {
    /// Shared writer connection guarded by a mutex.
    write_connection: Arc<Mutex<Connection>>,
    /// Read connection pool used for read path isolation under WAL.
    read_connections: Arc<Vec<Mutex<Connection>>>,
    /// Round-robin cursor for read connection selection.
    read_cursor: Arc<AtomicUsize>,
}

impl SqliteStorageEngine {
    /// Opens an `SQLite`-backed storage engine.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteEngineError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: &SqliteEngineConfig) -> Result<Self, SqliteEngineError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        if config.read_pool_size == 0 {
            return Err(SqliteEngineError::Invalid(
                "read_pool_size must be greater than zero".to_string(),
            ));
        }
        let mut write_connection = open_connection(config)?;
        initialize_schema(&mut write_connection)?;
        let mut read_connections = Vec::with_capacity(config.read_pool_size);
        for _ in 0 .. config.read_pool_size {
            read_connections.push(Mutex::new(open_connection(config)?));
        }
        Ok(Self {
            write_connection: Arc::new(Mutex::new(write_connection)),
            read_connections: Arc::new(read_connections),
            read_cursor: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Returns the next read connection using round-robin selection.
    fn read_connection(&self) -> &Mutex<Connection> {
        let len = self.read_connections.len();
        let index = self.read_cursor.fetch_add(1, Ordering::Relaxed) % len;
        &self.read_connections[index]
    }

    /// Runs `op` inside a committed write transaction.
    fn write_tx<T>(
        &self,
        op: impl FnOnce(&rusqlite::Transaction<'_>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self
            .write_connection
            .lock()
            .map_err(|_| StoreError::Backend("sqlite write mutex poisoned".to_string()))?;
        let tx = guard.transaction().map_err(|err| db_err(&err))?;
        let value = op(&tx)?;
        tx.commit().map_err(|err| db_err(&err))?;
        Ok(value)
    }

    /// Runs `op` inside a committed read transaction on a pooled connection.
    fn read_tx<T>(
        &self,
        op: impl FnOnce(&rusqlite::Transaction<'_>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let connection = self.read_connection();
        let mut guard = connection
            .lock()
            .map_err(|_| StoreError::Backend("sqlite read mutex poisoned".to_string()))?;
        let tx = guard.transaction().map_err(|err| db_err(&err))?;
        let value = op(&tx)?;
        tx.commit().map_err(|err| db_err(&err))?;
        Ok(value)
    }
}

/// Fails with [`StoreError::PartitionNotFound`] when the partition is absent.
fn ensure_partition(
    tx: &rusqlite::Transaction<'_>,
    partition: &PartitionName,
) -> Result<(), StoreError> {
    let found: Option<i64> = tx
        .query_row(
            "SELECT 1 FROM partitions WHERE name = ?1",
            params![partition.as_str()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|err| db_err(&err))?;
    match found {
        Some(_) => Ok(()),
        None => Err(StoreError::PartitionNotFound(partition.to_string())),
    }
}

impl StorageEngine for SqliteStorageEngine {
    fn create_partition(&self, partition: &PartitionName) -> Result<(), StoreError> {
        self.write_tx(|tx| {
            let result = tx.execute(
                "INSERT INTO partitions (name, sequence) VALUES (?1, 0)",
                params![partition.as_str()],
            );
            match result {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    Err(StoreError::PartitionExists(partition.to_string()))
                }
                Err(err) => Err(db_err(&err)),
            }
        })
    }

    fn drop_partition(&self, partition: &PartitionName) -> Result<(), StoreError> {
        self.write_tx(|tx| {
            tx.execute("DELETE FROM entries WHERE partition = ?1", params![partition.as_str()])
                .map_err(|err| db_err(&err))?;
            let dropped = tx
                .execute("DELETE FROM partitions WHERE name = ?1", params![partition.as_str()])
                .map_err(|err| db_err(&err))?;
            if dropped == 0 {
                return Err(StoreError::PartitionNotFound(partition.to_string()));
            }
            Ok(())
        })
    }

    fn get(&self, partition: &PartitionName, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.read_tx(|tx| {
            ensure_partition(tx, partition)?;
            tx.query_row(
                "SELECT value FROM entries WHERE partition = ?1 AND key = ?2",
                params![partition.as_str(), key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| db_err(&err))
        })
    }

    fn put(&self, partition: &PartitionName, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.write_tx(|tx| {
            ensure_partition(tx, partition)?;
            tx.execute(
                "INSERT INTO entries (partition, key, value) VALUES (?1, ?2, ?3) ON \
                 CONFLICT(partition, key) DO UPDATE SET value = excluded.value",
                params![partition.as_str(), key, value],
            )
            .map_err(|err| db_err(&err))?;
            Ok(())
        })
    }

    fn delete(&self, partition: &PartitionName, key: &[u8]) -> Result<(), StoreError> {
        self.write_tx(|tx| {
            ensure_partition(tx, partition)?;
            tx.execute(
                "DELETE FROM entries WHERE partition = ?1 AND key = ?2",
                params![partition.as_str(), key],
            )
            .map_err(|err| db_err(&err))?;
            Ok(())
        })
    }

    fn scan(&self, partition: &PartitionName) -> Result<Vec<StoredEntry>, StoreError> {
        self.read_tx(|tx| {
            ensure_partition(tx, partition)?;
            let mut stmt = tx
                .prepare_cached(
                    "SELECT key, value FROM entries WHERE partition = ?1 ORDER BY key ASC",
                )
                .map_err(|err| db_err(&err))?;
            let rows = stmt
                .query_map(params![partition.as_str()], |row| {
                    let key: Vec<u8> = row.get(0)?;
                    let value: Vec<u8> = row.get(1)?;
                    Ok(StoredEntry {
                        key,
                        value,
                    })
                })
                .map_err(|err| db_err(&err))?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row.map_err(|err| db_err(&err))?);
            }
            Ok(entries)
        })
    }

    fn put_sequenced(
        &self,
        partition: &PartitionName,
        encode: &mut dyn FnMut(u64) -> Result<StoredEntry, StoreError>,
    ) -> Result<u64, StoreError> {
        self.write_tx(|tx| {
            let updated = tx
                .execute(
                    "UPDATE partitions SET sequence = sequence + 1 WHERE name = ?1",
                    params![partition.as_str()],
                )
                .map_err(|err| db_err(&err))?;
            if updated == 0 {
                return Err(StoreError::PartitionNotFound(partition.to_string()));
            }
            let sequence: i64 = tx
                .query_row(
                    "SELECT sequence FROM partitions WHERE name = ?1",
                    params![partition.as_str()],
                    |row| row.get(0),
                )
                .map_err(|err| db_err(&err))?;
            let sequence = u64::try_from(sequence).map_err(|_| {
                StoreError::Invalid(format!("negative sequence for partition {partition}"))
            })?;
            // A failed encode aborts the transaction, rolling the counter back.
            let entry = encode(sequence)?;
            tx.execute(
                "INSERT INTO entries (partition, key, value) VALUES (?1, ?2, ?3) ON \
                 CONFLICT(partition, key) DO UPDATE SET value = excluded.value",
                params![partition.as_str(), entry.key, entry.value],
            )
            .map_err(|err| db_err(&err))?;
            Ok(sequence)
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteEngineError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteEngineError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteEngineError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteEngineError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteEngineError::Invalid("store path must not be empty".to_string()));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteEngineError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteEngineError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteEngineError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with the configured pragmas.
fn open_connection(config: &SqliteEngineConfig) -> Result<Connection, SqliteEngineError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteEngineError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteEngineError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteEngineError::Db(err.to_string()))?;
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteEngineError::Db(err.to_string()))?;
    Ok(connection)
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteEngineError> {
    let tx = connection.transaction().map_err(|err| SqliteEngineError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteEngineError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteEngineError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteEngineError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS partitions (
                    name TEXT NOT NULL,
                    sequence INTEGER NOT NULL,
                    PRIMARY KEY (name)
                );
                CREATE TABLE IF NOT EXISTS entries (
                    partition TEXT NOT NULL,
                    key BLOB NOT NULL,
                    value BLOB NOT NULL,
                    PRIMARY KEY (partition, key)
                );",
            )
            .map_err(|err| SqliteEngineError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteEngineError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteEngineError::Db(err.to_string()))?;
    Ok(())
}
