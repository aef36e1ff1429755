// crates/jobboard-core/src/registry.rs
// ============================================================================
// Module: Tenant Registry
// Description: Tenant lifecycle mapped onto partition lifecycle.
// Purpose: Create and destroy the partition that IS the tenant's existence.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The registry keeps no tenant metadata of its own: registering a tenant
//! creates its jobs partition, deleting a tenant drops the partition and every
//! job inside it. No validation is applied to the short code; callers decide
//! what codes mean.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::identifiers::TenantCode;
use crate::store::SharedStorageEngine;
use crate::store::StorageEngine;
use crate::store::StoreError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Tenant registry errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The tenant is already registered.
    #[error("tenant already exists: {0}")]
    AlreadyExists(String),
    /// The tenant is not registered.
    #[error("tenant not found: {0}")]
    NotFound(String),
    /// Underlying storage failure.
    #[error("tenant storage error: {0}")]
    Storage(String),
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Tenant registry over a shared storage engine.
///
/// # Invariants
/// - A tenant exists exactly when its jobs partition exists.
#[derive(Clone)]
pub struct TenantRegistry {
    /// Shared storage engine handle.
    engine: SharedStorageEngine,
}

impl TenantRegistry {
    /// Creates a registry over the given engine.
    #[must_use]
    pub fn new(engine: SharedStorageEngine) -> Self {
        Self {
            engine,
        }
    }

    /// Registers a tenant by creating its jobs partition.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyExists`] when the tenant is registered,
    /// or [`RegistryError::Storage`] on engine failure.
    pub fn create_tenant(&self, tenant: &TenantCode) -> Result<(), RegistryError> {
        match self.engine.create_partition(&tenant.jobs_partition()) {
            Ok(()) => Ok(()),
            Err(StoreError::PartitionExists(_)) => {
                Err(RegistryError::AlreadyExists(tenant.to_string()))
            }
            Err(err) => Err(RegistryError::Storage(err.to_string())),
        }
    }

    /// Deletes a tenant by dropping its jobs partition and all jobs in it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when the tenant is not registered,
    /// or [`RegistryError::Storage`] on engine failure.
    pub fn delete_tenant(&self, tenant: &TenantCode) -> Result<(), RegistryError> {
        match self.engine.drop_partition(&tenant.jobs_partition()) {
            Ok(()) => Ok(()),
            Err(StoreError::PartitionNotFound(_)) => {
                Err(RegistryError::NotFound(tenant.to_string()))
            }
            Err(err) => Err(RegistryError::Storage(err.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
