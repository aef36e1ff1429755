// crates/jobboard-core/src/identifiers.rs
// ============================================================================
// Module: Jobboard Identifiers
// Description: Canonical identifiers for tenants, partitions, and jobs.
// Purpose: Provide strongly typed identifiers with stable wire and key forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the identifiers used throughout Jobboard. Tenant codes
//! are opaque strings supplied by callers; no normalization or format
//! validation is applied, so the empty string is accepted and produces a
//! valid, if degenerate, partition name. Job identifiers encode to fixed-width
//! big-endian keys so ascending byte order equals ascending numeric order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Suffix appended to a tenant code to form its jobs partition name.
const JOBS_PARTITION_SUFFIX: &str = "-Jobs";

/// Width in bytes of an encoded job-id storage key.
pub const JOB_KEY_WIDTH: usize = 8;

// ============================================================================
// SECTION: Tenant Code
// ============================================================================

/// Tenant short code supplied by callers.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this
///   type. An empty code is accepted and yields a degenerate partition name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantCode(String);

impl TenantCode {
    /// Creates a new tenant code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name of the tenant's jobs partition.
    ///
    /// A partition's existence is the sole record of tenant membership, so
    /// this derivation is the only place partition names are minted.
    #[must_use]
    pub fn jobs_partition(&self) -> PartitionName {
        PartitionName(format!("{}{JOBS_PARTITION_SUFFIX}", self.0))
    }
}

impl fmt::Display for TenantCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TenantCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TenantCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Partition Name
// ============================================================================

/// Name of a storage partition, the unit of tenant isolation.
///
/// # Invariants
/// - Only minted via [`TenantCode::jobs_partition`], so every partition name
///   is scoped to exactly one tenant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionName(String);

impl PartitionName {
    /// Returns the partition name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartitionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Job Id
// ============================================================================

/// Job identifier scoped to one tenant partition.
///
/// # Invariants
/// - `0` signals "assign new id"; the repository replaces it with the next
///   partition sequence value before storing.
/// - Encoded keys are 8-byte big-endian, so lexicographic byte order equals
///   numeric order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct JobId(u64);

impl JobId {
    /// Sentinel value requesting allocation of a fresh id.
    pub const UNASSIGNED: Self = Self(0);

    /// Creates a job identifier from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns true when the identifier is the assign-new sentinel.
    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        self.0 == 0
    }

    /// Encodes the identifier as a fixed-width big-endian storage key.
    #[must_use]
    pub const fn encode_key(self) -> [u8; JOB_KEY_WIDTH] {
        self.0.to_be_bytes()
    }

    /// Decodes an identifier from a storage key.
    ///
    /// Returns `None` when the key is not exactly [`JOB_KEY_WIDTH`] bytes.
    #[must_use]
    pub fn decode_key(key: &[u8]) -> Option<Self> {
        let bytes: [u8; JOB_KEY_WIDTH] = key.try_into().ok()?;
        Some(Self(u64::from_be_bytes(bytes)))
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
