// crates/jobboard-core/src/repository.rs
// ============================================================================
// Module: Job Repository
// Description: Tenant-scoped job CRUD over the storage engine.
// Purpose: Own record serialization, id allocation, and JSON list views.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! The repository maps [`Job`] records onto a tenant's partition: keys are
//! 8-byte big-endian job ids, values are the literal JSON encoding of the
//! record. List views concatenate stored bytes without re-parsing, so the
//! wire form of a list is exactly the stored form of its members. New ids
//! come from the partition sequence counter, allocated in the same write
//! transaction as the record write; caller-supplied nonzero ids are upserts
//! with no prior-existence check.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::identifiers::JobId;
use crate::identifiers::TenantCode;
use crate::job::Job;
use crate::store::SharedStorageEngine;
use crate::store::StorageEngine;
use crate::store::StoreError;
use crate::store::StoredEntry;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Job repository errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The tenant's partition does not exist.
    #[error("tenant not found: {0}")]
    TenantNotFound(String),
    /// A record could not be serialized or deserialized.
    #[error("job record serialization failed: {0}")]
    Serialization(String),
    /// Underlying storage failure.
    #[error("job storage error: {0}")]
    Storage(String),
}

impl RepositoryError {
    /// Maps a storage error for the given tenant.
    fn from_store(tenant: &TenantCode, err: StoreError) -> Self {
        match err {
            StoreError::PartitionNotFound(_) => Self::TenantNotFound(tenant.to_string()),
            StoreError::Invalid(message) => Self::Serialization(message),
            other => Self::Storage(other.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Repository
// ============================================================================

/// Job repository over a shared storage engine.
///
/// # Invariants
/// - Every operation touches exactly one tenant partition; cross-tenant reads
///   are unrepresentable because partition names derive from [`TenantCode`].
#[derive(Clone)]
pub struct JobRepository {
    /// Shared storage engine handle.
    engine: SharedStorageEngine,
}

impl JobRepository {
    /// Creates a repository over the given engine.
    #[must_use]
    pub fn new(engine: SharedStorageEngine) -> Self {
        Self {
            engine,
        }
    }

    /// Returns the tenant's jobs as a JSON array of raw stored bytes.
    ///
    /// Entries are concatenated in ascending id order with comma separators.
    /// A missing or empty partition yields `[]`, never an error: a deleted
    /// tenant lists as empty.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] on engine failure.
    pub fn list_jobs(&self, tenant: &TenantCode) -> Result<Vec<u8>, RepositoryError> {
        let entries = match self.engine.scan(&tenant.jobs_partition()) {
            Ok(entries) => entries,
            Err(StoreError::PartitionNotFound(_)) => Vec::new(),
            Err(err) => return Err(RepositoryError::from_store(tenant, err)),
        };
        let mut buffer = Vec::with_capacity(2);
        buffer.push(b'[');
        for (index, entry) in entries.iter().enumerate() {
            if index > 0 {
                buffer.push(b',');
            }
            buffer.extend_from_slice(&entry.value);
        }
        buffer.push(b']');
        Ok(buffer)
    }

    /// Returns the tenant's jobs decoded into records, in ascending id order.
    ///
    /// A missing partition yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Serialization`] when a stored record fails
    /// to decode, or [`RepositoryError::Storage`] on engine failure.
    pub fn list_jobs_decoded(&self, tenant: &TenantCode) -> Result<Vec<Job>, RepositoryError> {
        let entries = match self.engine.scan(&tenant.jobs_partition()) {
            Ok(entries) => entries,
            Err(StoreError::PartitionNotFound(_)) => Vec::new(),
            Err(err) => return Err(RepositoryError::from_store(tenant, err)),
        };
        entries
            .iter()
            .map(|entry| {
                serde_json::from_slice(&entry.value)
                    .map_err(|err| RepositoryError::Serialization(err.to_string()))
            })
            .collect()
    }

    /// Returns the raw stored bytes for one job, or `None` when the job or
    /// the tenant partition is absent.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] on engine failure.
    pub fn get_job(
        &self,
        tenant: &TenantCode,
        id: JobId,
    ) -> Result<Option<Vec<u8>>, RepositoryError> {
        match self.engine.get(&tenant.jobs_partition(), &id.encode_key()) {
            Ok(value) => Ok(value),
            Err(StoreError::PartitionNotFound(_)) => Ok(None),
            Err(err) => Err(RepositoryError::from_store(tenant, err)),
        }
    }

    /// Stores a job and returns it with its id populated.
    ///
    /// An unassigned id (`0`) allocates the next partition sequence value in
    /// the same write transaction as the record write; this is the only id
    /// allocation path. A nonzero id overwrites whatever is stored under it,
    /// creating the record if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::TenantNotFound`] when the partition is
    /// absent, [`RepositoryError::Serialization`] on encode failure, or
    /// [`RepositoryError::Storage`] on engine failure.
    pub fn put_job(&self, tenant: &TenantCode, job: Job) -> Result<Job, RepositoryError> {
        let partition = tenant.jobs_partition();
        if job.id.is_unassigned() {
            let template = job;
            let sequence = self
                .engine
                .put_sequenced(&partition, &mut |sequence| {
                    let assigned = template.clone().with_id(JobId::new(sequence));
                    let value = serde_json::to_vec(&assigned)
                        .map_err(|err| StoreError::Invalid(err.to_string()))?;
                    Ok(StoredEntry {
                        key: assigned.id.encode_key().to_vec(),
                        value,
                    })
                })
                .map_err(|err| RepositoryError::from_store(tenant, err))?;
            Ok(template.with_id(JobId::new(sequence)))
        } else {
            let value = serde_json::to_vec(&job)
                .map_err(|err| RepositoryError::Serialization(err.to_string()))?;
            self.engine
                .put(&partition, &job.id.encode_key(), &value)
                .map_err(|err| RepositoryError::from_store(tenant, err))?;
            Ok(job)
        }
    }

    /// Deletes a job by id. Deleting an absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::TenantNotFound`] when the partition is
    /// absent, or [`RepositoryError::Storage`] on engine failure.
    pub fn delete_job(&self, tenant: &TenantCode, id: JobId) -> Result<(), RepositoryError> {
        self.engine
            .delete(&tenant.jobs_partition(), &id.encode_key())
            .map_err(|err| RepositoryError::from_store(tenant, err))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use super::JobRepository;
    use super::RepositoryError;
    use crate::identifiers::JobId;
    use crate::identifiers::TenantCode;
    use crate::job::Job;
    use crate::memory::MemoryStorageEngine;
    use crate::registry::TenantRegistry;
    use crate::store::SharedStorageEngine;

    fn fixture() -> (TenantRegistry, JobRepository) {
        let engine = SharedStorageEngine::from_engine(MemoryStorageEngine::new());
        (TenantRegistry::new(engine.clone()), JobRepository::new(engine))
    }

    fn draft(title: &str, description: &str) -> Job {
        Job {
            id: JobId::UNASSIGNED,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn first_job_in_a_fresh_tenant_gets_id_one() {
        let (registry, repository) = fixture();
        let tenant = TenantCode::new("acme");
        registry.create_tenant(&tenant).unwrap();
        let stored = repository.put_job(&tenant, draft("Engineer", "Build things")).unwrap();
        assert_eq!(stored.id, JobId::new(1));
        let list = repository.list_jobs(&tenant).unwrap();
        assert_eq!(
            String::from_utf8(list).unwrap(),
            r#"[{"id":1,"title":"Engineer","description":"Build things"}]"#
        );
    }

    #[test]
    fn ids_increase_and_are_never_reused_across_deletions() {
        let (registry, repository) = fixture();
        let tenant = TenantCode::new("acme");
        registry.create_tenant(&tenant).unwrap();
        let first = repository.put_job(&tenant, draft("a", "a")).unwrap();
        let second = repository.put_job(&tenant, draft("b", "b")).unwrap();
        repository.delete_job(&tenant, second.id).unwrap();
        let third = repository.put_job(&tenant, draft("c", "c")).unwrap();
        assert_eq!(first.id, JobId::new(1));
        assert_eq!(second.id, JobId::new(2));
        assert_eq!(third.id, JobId::new(3));
    }

    #[test]
    fn list_returns_ascending_id_order() {
        let (registry, repository) = fixture();
        let tenant = TenantCode::new("acme");
        registry.create_tenant(&tenant).unwrap();
        // Seed out of order via explicit upserts, then one allocated id.
        repository.put_job(&tenant, draft("late", "late").with_id(JobId::new(12))).unwrap();
        repository.put_job(&tenant, draft("early", "early").with_id(JobId::new(2))).unwrap();
        let jobs = repository.list_jobs_decoded(&tenant).unwrap();
        let ids: Vec<u64> = jobs.iter().map(|job| job.id.get()).collect();
        assert_eq!(ids, vec![2, 12]);
    }

    #[test]
    fn get_after_put_round_trips() {
        let (registry, repository) = fixture();
        let tenant = TenantCode::new("acme");
        registry.create_tenant(&tenant).unwrap();
        let stored = repository.put_job(&tenant, draft("Engineer", "Build things")).unwrap();
        let bytes = repository.get_job(&tenant, stored.id).unwrap().unwrap();
        let decoded: Job = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, stored);
    }

    #[test]
    fn delete_job_is_idempotent() {
        let (registry, repository) = fixture();
        let tenant = TenantCode::new("acme");
        registry.create_tenant(&tenant).unwrap();
        let stored = repository.put_job(&tenant, draft("a", "a")).unwrap();
        repository.delete_job(&tenant, stored.id).unwrap();
        repository.delete_job(&tenant, stored.id).unwrap();
        assert_eq!(repository.list_jobs(&tenant).unwrap(), b"[]".to_vec());
    }

    #[test]
    fn tenants_never_see_each_others_jobs() {
        let (registry, repository) = fixture();
        let acme = TenantCode::new("acme");
        let rival = TenantCode::new("rival");
        registry.create_tenant(&acme).unwrap();
        registry.create_tenant(&rival).unwrap();
        let stored = repository.put_job(&acme, draft("secret", "plans")).unwrap();
        assert_eq!(repository.list_jobs(&rival).unwrap(), b"[]".to_vec());
        assert_eq!(repository.get_job(&rival, stored.id).unwrap(), None);
    }

    #[test]
    fn deleted_tenant_lists_as_empty_not_as_error() {
        let (registry, repository) = fixture();
        let tenant = TenantCode::new("acme");
        registry.create_tenant(&tenant).unwrap();
        repository.put_job(&tenant, draft("a", "a")).unwrap();
        registry.delete_tenant(&tenant).unwrap();
        assert_eq!(repository.list_jobs(&tenant).unwrap(), b"[]".to_vec());
        assert!(repository.list_jobs_decoded(&tenant).unwrap().is_empty());
    }

    #[test]
    fn upsert_with_unknown_nonzero_id_creates_the_record() {
        let (registry, repository) = fixture();
        let tenant = TenantCode::new("acme");
        registry.create_tenant(&tenant).unwrap();
        let job = draft("Engineer", "Build things").with_id(JobId::new(1));
        let stored = repository.put_job(&tenant, job.clone()).unwrap();
        assert_eq!(stored, job);
        let bytes = repository.get_job(&tenant, JobId::new(1)).unwrap().unwrap();
        let decoded: Job = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, job);
    }

    #[test]
    fn upsert_overwrites_the_whole_record() {
        let (registry, repository) = fixture();
        let tenant = TenantCode::new("acme");
        registry.create_tenant(&tenant).unwrap();
        let stored = repository.put_job(&tenant, draft("old", "old")).unwrap();
        let updated = draft("new", "new").with_id(stored.id);
        repository.put_job(&tenant, updated.clone()).unwrap();
        let jobs = repository.list_jobs_decoded(&tenant).unwrap();
        assert_eq!(jobs, vec![updated]);
    }

    #[test]
    fn writes_against_an_unknown_tenant_fail() {
        let (_registry, repository) = fixture();
        let tenant = TenantCode::new("ghost");
        let err = repository.put_job(&tenant, draft("a", "a")).unwrap_err();
        assert_eq!(err, RepositoryError::TenantNotFound("ghost".to_string()));
        let err = repository.delete_job(&tenant, JobId::new(1)).unwrap_err();
        assert_eq!(err, RepositoryError::TenantNotFound("ghost".to_string()));
    }

    #[test]
    fn reads_against_an_unknown_tenant_are_empty() {
        let (_registry, repository) = fixture();
        let tenant = TenantCode::new("ghost");
        assert_eq!(repository.list_jobs(&tenant).unwrap(), b"[]".to_vec());
        assert_eq!(repository.get_job(&tenant, JobId::new(1)).unwrap(), None);
    }
}
