// crates/jobboard-core/src/lib.rs
// ============================================================================
// Module: Jobboard Core
// Description: Tenant-scoped persistence core for the job-posting service.
// Purpose: Define domain types, the storage-engine seam, and the repository.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Jobboard Core defines the domain model for the multi-tenant job-posting
//! service: strongly typed tenant and job identifiers, the partitioned
//! [`StorageEngine`] seam, the [`TenantRegistry`] that maps tenant lifecycle
//! onto partition lifecycle, and the [`JobRepository`] that owns record
//! serialization. Tenant isolation is enforced at the partition-name level:
//! persistence APIs accept a [`TenantCode`], never a raw string.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod identifiers;
pub mod job;
pub mod memory;
pub mod registry;
pub mod repository;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::JobId;
pub use identifiers::PartitionName;
pub use identifiers::TenantCode;
pub use job::Job;
pub use memory::MemoryStorageEngine;
pub use registry::RegistryError;
pub use registry::TenantRegistry;
pub use repository::JobRepository;
pub use repository::RepositoryError;
pub use store::SharedStorageEngine;
pub use store::StorageEngine;
pub use store::StoreError;
pub use store::StoredEntry;
