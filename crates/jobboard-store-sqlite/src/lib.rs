// crates/jobboard-store-sqlite/src/lib.rs
// ============================================================================
// Module: Jobboard SQLite Store
// Description: Durable partitioned storage engine backed by SQLite.
// Purpose: Persist tenant partitions and job records in a single file.
// Dependencies: jobboard-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This crate implements [`jobboard_core::StorageEngine`] over a single
//! `SQLite` database file. Partitions are rows in a `partitions` table that
//! also carries each partition's sequence counter; entries live in a
//! composite-keyed `entries` table and scan in ascending BLOB order, which is
//! memcmp order and therefore preserves the big-endian key invariant.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod engine;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use engine::SqliteEngineConfig;
pub use engine::SqliteEngineError;
pub use engine::SqliteEngineMode;
pub use engine::SqliteStorageEngine;
pub use engine::SqliteSyncMode;
