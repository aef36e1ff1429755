// crates/jobboard-core/src/store.rs
// ============================================================================
// Module: Storage Engine Seam
// Description: Partitioned byte-keyed storage interface with sequences.
// Purpose: Define the transactional storage contract tenant isolation rests on.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The [`StorageEngine`] trait is the persistence seam of the service: an
//! ordered byte-keyed, byte-valued map divided into named partitions, one per
//! tenant. Implementations must provide snapshot-consistent reads, exclusive
//! writes, and a per-partition monotonic sequence counter allocated within the
//! same write transaction as the record it identifies. Engines store opaque
//! bytes only; serialization is owned by the repository layer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::identifiers::PartitionName;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Storage engine errors.
///
/// # Invariants
/// - Error messages avoid embedding stored record payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The partition already exists.
    #[error("partition already exists: {0}")]
    PartitionExists(String),
    /// The partition does not exist.
    #[error("partition not found: {0}")]
    PartitionNotFound(String),
    /// Underlying I/O failure.
    #[error("storage io error: {0}")]
    Io(String),
    /// Backend-specific failure.
    #[error("storage backend error: {0}")]
    Backend(String),
    /// Invalid data handed to or read from the engine.
    #[error("invalid storage data: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Entries
// ============================================================================

/// A key/value pair stored in a partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    /// Storage key bytes.
    pub key: Vec<u8>,
    /// Stored value bytes.
    pub value: Vec<u8>,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Partitioned ordered key-value storage with per-partition sequences.
///
/// # Invariants
/// - `scan` yields entries in ascending byte order of their keys.
/// - Sequence counters are monotonic per partition and never rewind, even
///   after record deletion; a rolled-back write leaves the counter unchanged
///   but never below any issued value.
pub trait StorageEngine: Send + Sync {
    /// Creates a partition.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PartitionExists`] when the partition exists.
    fn create_partition(&self, partition: &PartitionName) -> Result<(), StoreError>;

    /// Drops a partition and all entries it contains.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PartitionNotFound`] when the partition is absent.
    fn drop_partition(&self, partition: &PartitionName) -> Result<(), StoreError>;

    /// Reads the value stored under `key`, or `None` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PartitionNotFound`] when the partition is absent.
    fn get(&self, partition: &PartitionName, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stores `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PartitionNotFound`] when the partition is absent.
    fn put(&self, partition: &PartitionName, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Deletes the entry under `key`. Deleting an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PartitionNotFound`] when the partition is absent.
    fn delete(&self, partition: &PartitionName, key: &[u8]) -> Result<(), StoreError>;

    /// Returns all entries in the partition in ascending key order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PartitionNotFound`] when the partition is absent.
    fn scan(&self, partition: &PartitionName) -> Result<Vec<StoredEntry>, StoreError>;

    /// Allocates the next sequence value and stores the entry produced by
    /// `encode`, both within one write transaction.
    ///
    /// The callback receives the allocated sequence value and returns the
    /// key/value bytes to store. When the callback fails the transaction is
    /// rolled back and the counter is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PartitionNotFound`] when the partition is absent,
    /// or the callback's error unchanged.
    fn put_sequenced(
        &self,
        partition: &PartitionName,
        encode: &mut dyn FnMut(u64) -> Result<StoredEntry, StoreError>,
    ) -> Result<u64, StoreError>;
}

// ============================================================================
// SECTION: Shared Handle
// ============================================================================

/// Type-erased shared handle to a storage engine.
///
/// # Invariants
/// - Cloning shares the same underlying engine instance; the engine is
///   constructed once at startup and passed by handle into components.
#[derive(Clone)]
pub struct SharedStorageEngine {
    /// Shared engine instance.
    inner: Arc<dyn StorageEngine>,
}

impl SharedStorageEngine {
    /// Wraps a concrete engine in a shared handle.
    #[must_use]
    pub fn from_engine(engine: impl StorageEngine + 'static) -> Self {
        Self {
            inner: Arc::new(engine),
        }
    }
}

impl StorageEngine for SharedStorageEngine {
    fn create_partition(&self, partition: &PartitionName) -> Result<(), StoreError> {
        self.inner.create_partition(partition)
    }

    fn drop_partition(&self, partition: &PartitionName) -> Result<(), StoreError> {
        self.inner.drop_partition(partition)
    }

    fn get(&self, partition: &PartitionName, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(partition, key)
    }

    fn put(&self, partition: &PartitionName, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.inner.put(partition, key, value)
    }

    fn delete(&self, partition: &PartitionName, key: &[u8]) -> Result<(), StoreError> {
        self.inner.delete(partition, key)
    }

    fn scan(&self, partition: &PartitionName) -> Result<Vec<StoredEntry>, StoreError> {
        self.inner.scan(partition)
    }

    fn put_sequenced(
        &self,
        partition: &PartitionName,
        encode: &mut dyn FnMut(u64) -> Result<StoredEntry, StoreError>,
    ) -> Result<u64, StoreError> {
        self.inner.put_sequenced(partition, encode)
    }
}
