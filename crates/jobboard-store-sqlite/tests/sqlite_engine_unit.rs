// crates/jobboard-store-sqlite/tests/sqlite_engine_unit.rs
// ============================================================================
// Module: SQLite Engine Unit Tests
// Description: Targeted tests for the SQLite storage engine.
// Purpose: Validate partition lifecycle, key ordering, sequence durability,
//          path safety, and transactional rollback of failed writes.
// ============================================================================

//! ## Overview
//! Unit-level tests for the `SQLite` storage engine invariants:
//! - Partition lifecycle (duplicate create, drop missing, cascade delete)
//! - Scan ordering over big-endian keys
//! - Sequence monotonicity across deletions and process restarts
//! - Path safety checks (directory rejection)
//! - Rollback of the sequence counter when encoding fails mid-transaction
//! - Concurrency safety for sequenced writes

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::path::PathBuf;
use std::thread;

use jobboard_core::Job;
use jobboard_core::JobId;
use jobboard_core::JobRepository;
use jobboard_core::SharedStorageEngine;
use jobboard_core::StorageEngine;
use jobboard_core::StoreError;
use jobboard_core::StoredEntry;
use jobboard_core::TenantCode;
use jobboard_core::TenantRegistry;
use jobboard_store_sqlite::SqliteEngineConfig;
use jobboard_store_sqlite::SqliteEngineError;
use jobboard_store_sqlite::SqliteEngineMode;
use jobboard_store_sqlite::SqliteStorageEngine;
use jobboard_store_sqlite::SqliteSyncMode;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const fn config_for_path(path: PathBuf) -> SqliteEngineConfig {
    SqliteEngineConfig {
        path,
        busy_timeout_ms: 1_000,
        journal_mode: SqliteEngineMode::Wal,
        sync_mode: SqliteSyncMode::Full,
        read_pool_size: 2,
    }
}

fn open_engine(dir: &TempDir) -> SqliteStorageEngine {
    let config = config_for_path(dir.path().join("jobboard.db"));
    SqliteStorageEngine::new(&config).expect("open engine")
}

fn entry_for(sequence: u64) -> StoredEntry {
    StoredEntry {
        key: JobId::new(sequence).encode_key().to_vec(),
        value: format!("record-{sequence}").into_bytes(),
    }
}

// ============================================================================
// SECTION: Partition Lifecycle
// ============================================================================

#[test]
fn duplicate_partition_creation_is_a_conflict() {
    let dir = TempDir::new().expect("tempdir");
    let engine = open_engine(&dir);
    let partition = TenantCode::new("acme").jobs_partition();
    engine.create_partition(&partition).expect("create partition");
    let err = engine.create_partition(&partition).expect_err("duplicate create");
    assert!(matches!(err, StoreError::PartitionExists(_)));
}

#[test]
fn dropping_a_missing_partition_is_not_found() {
    let dir = TempDir::new().expect("tempdir");
    let engine = open_engine(&dir);
    let partition = TenantCode::new("ghost").jobs_partition();
    let err = engine.drop_partition(&partition).expect_err("drop missing");
    assert!(matches!(err, StoreError::PartitionNotFound(_)));
}

#[test]
fn dropping_a_partition_deletes_its_entries() {
    let dir = TempDir::new().expect("tempdir");
    let engine = open_engine(&dir);
    let tenant = TenantCode::new("acme");
    let partition = tenant.jobs_partition();
    engine.create_partition(&partition).expect("create partition");
    engine
        .put(&partition, &JobId::new(1).encode_key(), b"payload")
        .expect("put entry");
    engine.drop_partition(&partition).expect("drop partition");
    engine.create_partition(&partition).expect("recreate partition");
    assert!(engine.scan(&partition).expect("scan recreated").is_empty());
}

#[test]
fn operations_on_a_missing_partition_fail() {
    let dir = TempDir::new().expect("tempdir");
    let engine = open_engine(&dir);
    let partition = TenantCode::new("ghost").jobs_partition();
    let key = JobId::new(1).encode_key();
    assert!(matches!(
        engine.put(&partition, &key, b"payload").expect_err("put"),
        StoreError::PartitionNotFound(_)
    ));
    assert!(matches!(
        engine.delete(&partition, &key).expect_err("delete"),
        StoreError::PartitionNotFound(_)
    ));
    assert!(matches!(
        engine.get(&partition, &key).expect_err("get"),
        StoreError::PartitionNotFound(_)
    ));
    assert!(matches!(
        engine.scan(&partition).expect_err("scan"),
        StoreError::PartitionNotFound(_)
    ));
}

// ============================================================================
// SECTION: Ordering And Sequences
// ============================================================================

#[test]
fn scan_returns_entries_in_ascending_key_order() {
    let dir = TempDir::new().expect("tempdir");
    let engine = open_engine(&dir);
    let partition = TenantCode::new("acme").jobs_partition();
    engine.create_partition(&partition).expect("create partition");
    for id in [300_u64, 2, 1_000, 7] {
        engine
            .put(&partition, &JobId::new(id).encode_key(), format!("record-{id}").as_bytes())
            .expect("put entry");
    }
    let entries = engine.scan(&partition).expect("scan");
    let ids: Vec<u64> = entries
        .iter()
        .map(|entry| JobId::decode_key(&entry.key).expect("decode key").get())
        .collect();
    assert_eq!(ids, vec![2, 7, 300, 1_000]);
}

#[test]
fn sequence_is_monotonic_across_deletions() {
    let dir = TempDir::new().expect("tempdir");
    let engine = open_engine(&dir);
    let partition = TenantCode::new("acme").jobs_partition();
    engine.create_partition(&partition).expect("create partition");
    let first = engine.put_sequenced(&partition, &mut |seq| Ok(entry_for(seq))).expect("first");
    engine.delete(&partition, &JobId::new(first).encode_key()).expect("delete first");
    let second = engine.put_sequenced(&partition, &mut |seq| Ok(entry_for(seq))).expect("second");
    assert_eq!(first, 1);
    assert_eq!(second, 2);
}

#[test]
fn sequence_survives_engine_reopen() {
    let dir = TempDir::new().expect("tempdir");
    let partition = TenantCode::new("acme").jobs_partition();
    {
        let engine = open_engine(&dir);
        engine.create_partition(&partition).expect("create partition");
        let first =
            engine.put_sequenced(&partition, &mut |seq| Ok(entry_for(seq))).expect("first");
        assert_eq!(first, 1);
    }
    let reopened = open_engine(&dir);
    let second =
        reopened.put_sequenced(&partition, &mut |seq| Ok(entry_for(seq))).expect("second");
    assert_eq!(second, 2);
}

#[test]
fn failed_encode_rolls_the_sequence_back() {
    let dir = TempDir::new().expect("tempdir");
    let engine = open_engine(&dir);
    let partition = TenantCode::new("acme").jobs_partition();
    engine.create_partition(&partition).expect("create partition");
    let err = engine
        .put_sequenced(&partition, &mut |_| Err(StoreError::Invalid("bad record".to_string())))
        .expect_err("encode failure");
    assert!(matches!(err, StoreError::Invalid(_)));
    let next = engine.put_sequenced(&partition, &mut |seq| Ok(entry_for(seq))).expect("next");
    assert_eq!(next, 1);
    assert_eq!(engine.scan(&partition).expect("scan").len(), 1);
}

#[test]
fn concurrent_sequenced_writes_allocate_unique_ids() {
    let dir = TempDir::new().expect("tempdir");
    let engine = open_engine(&dir);
    let partition = TenantCode::new("acme").jobs_partition();
    engine.create_partition(&partition).expect("create partition");
    let mut handles = Vec::new();
    for _ in 0 .. 4 {
        let engine = engine.clone();
        let partition = partition.clone();
        handles.push(thread::spawn(move || {
            for _ in 0 .. 10 {
                engine.put_sequenced(&partition, &mut |seq| Ok(entry_for(seq))).expect("put");
            }
        }));
    }
    for handle in handles {
        handle.join().expect("join writer thread");
    }
    let entries = engine.scan(&partition).expect("scan");
    let ids: Vec<u64> = entries
        .iter()
        .map(|entry| JobId::decode_key(&entry.key).expect("decode key").get())
        .collect();
    assert_eq!(ids, (1 ..= 40).collect::<Vec<u64>>());
}

// ============================================================================
// SECTION: Path Safety
// ============================================================================

#[test]
fn directory_paths_are_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_for_path(dir.path().to_path_buf());
    let err = SqliteStorageEngine::new(&config).expect_err("directory path");
    assert!(matches!(err, SqliteEngineError::Invalid(_)));
}

#[test]
fn zero_read_pool_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let mut config = config_for_path(dir.path().join("jobboard.db"));
    config.read_pool_size = 0;
    let err = SqliteStorageEngine::new(&config).expect_err("zero pool");
    assert!(matches!(err, SqliteEngineError::Invalid(_)));
}

// ============================================================================
// SECTION: Repository Over SQLite
// ============================================================================

#[test]
fn repository_round_trip_over_sqlite() {
    let dir = TempDir::new().expect("tempdir");
    let engine = SharedStorageEngine::from_engine(open_engine(&dir));
    let registry = TenantRegistry::new(engine.clone());
    let repository = JobRepository::new(engine);
    let tenant = TenantCode::new("acme");
    registry.create_tenant(&tenant).expect("create tenant");
    let stored = repository
        .put_job(
            &tenant,
            Job {
                id: JobId::UNASSIGNED,
                title: "Engineer".to_string(),
                description: "Build things".to_string(),
            },
        )
        .expect("store job");
    assert_eq!(stored.id, JobId::new(1));
    let list = repository.list_jobs(&tenant).expect("list jobs");
    assert_eq!(
        String::from_utf8(list).expect("utf8 list"),
        r#"[{"id":1,"title":"Engineer","description":"Build things"}]"#
    );
    registry.delete_tenant(&tenant).expect("delete tenant");
    assert_eq!(repository.list_jobs(&tenant).expect("list after delete"), b"[]".to_vec());
}
