// crates/jobboard-core/src/memory.rs
// ============================================================================
// Module: In-Memory Storage Engine
// Description: Non-durable StorageEngine for tests and memory deployments.
// Purpose: Provide the reference engine semantics without file I/O.
// Dependencies: none beyond std
// ============================================================================

//! ## Overview
//! [`MemoryStorageEngine`] keeps partitions in a `RwLock`-guarded map of
//! ordered maps. Readers never block other readers; writers take the lock
//! exclusively, matching the one-writer-at-a-time model of the durable
//! engine. Sequence counters live beside their partition and survive record
//! deletion, but are dropped with the partition itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::identifiers::PartitionName;
use crate::store::StorageEngine;
use crate::store::StoreError;
use crate::store::StoredEntry;

// ============================================================================
// SECTION: Engine
// ============================================================================

/// One in-memory partition: its sequence counter and ordered entries.
#[derive(Debug, Default)]
struct MemoryPartition {
    /// Last-issued sequence value; zero when nothing was ever allocated.
    sequence: u64,
    /// Entries in ascending key order.
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

/// In-memory, non-durable storage engine.
///
/// # Invariants
/// - Partition contents are lost on drop; this engine backs tests and the
///   `memory` store type only.
#[derive(Debug, Default)]
pub struct MemoryStorageEngine {
    /// All partitions by name.
    partitions: RwLock<BTreeMap<String, MemoryPartition>>,
}

impl MemoryStorageEngine {
    /// Creates an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Maps a poisoned lock to a storage error.
fn lock_poisoned() -> StoreError {
    StoreError::Backend("memory engine lock poisoned".to_string())
}

impl StorageEngine for MemoryStorageEngine {
    fn create_partition(&self, partition: &PartitionName) -> Result<(), StoreError> {
        let mut partitions = self.partitions.write().map_err(|_| lock_poisoned())?;
        if partitions.contains_key(partition.as_str()) {
            return Err(StoreError::PartitionExists(partition.to_string()));
        }
        partitions.insert(partition.as_str().to_string(), MemoryPartition::default());
        Ok(())
    }

    fn drop_partition(&self, partition: &PartitionName) -> Result<(), StoreError> {
        let mut partitions = self.partitions.write().map_err(|_| lock_poisoned())?;
        match partitions.remove(partition.as_str()) {
            Some(_) => Ok(()),
            None => Err(StoreError::PartitionNotFound(partition.to_string())),
        }
    }

    fn get(&self, partition: &PartitionName, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let partitions = self.partitions.read().map_err(|_| lock_poisoned())?;
        let found = partitions
            .get(partition.as_str())
            .ok_or_else(|| StoreError::PartitionNotFound(partition.to_string()))?;
        Ok(found.entries.get(key).cloned())
    }

    fn put(&self, partition: &PartitionName, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut partitions = self.partitions.write().map_err(|_| lock_poisoned())?;
        let found = partitions
            .get_mut(partition.as_str())
            .ok_or_else(|| StoreError::PartitionNotFound(partition.to_string()))?;
        found.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, partition: &PartitionName, key: &[u8]) -> Result<(), StoreError> {
        let mut partitions = self.partitions.write().map_err(|_| lock_poisoned())?;
        let found = partitions
            .get_mut(partition.as_str())
            .ok_or_else(|| StoreError::PartitionNotFound(partition.to_string()))?;
        found.entries.remove(key);
        Ok(())
    }

    fn scan(&self, partition: &PartitionName) -> Result<Vec<StoredEntry>, StoreError> {
        let partitions = self.partitions.read().map_err(|_| lock_poisoned())?;
        let found = partitions
            .get(partition.as_str())
            .ok_or_else(|| StoreError::PartitionNotFound(partition.to_string()))?;
        Ok(found
            .entries
            .iter()
            .map(|(key, value)| StoredEntry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }

    fn put_sequenced(
        &self,
        partition: &PartitionName,
        encode: &mut dyn FnMut(u64) -> Result<StoredEntry, StoreError>,
    ) -> Result<u64, StoreError> {
        let mut partitions = self.partitions.write().map_err(|_| lock_poisoned())?;
        let found = partitions
            .get_mut(partition.as_str())
            .ok_or_else(|| StoreError::PartitionNotFound(partition.to_string()))?;
        let sequence = found
            .sequence
            .checked_add(1)
            .ok_or_else(|| StoreError::Invalid("partition sequence overflow".to_string()))?;
        // Encode before committing the counter so a failed encode rolls back.
        let entry = encode(sequence)?;
        found.sequence = sequence;
        found.entries.insert(entry.key, entry.value);
        Ok(sequence)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
