// crates/jobboard-core/src/job.rs
// ============================================================================
// Module: Job Record
// Description: The job-posting record owned by exactly one tenant partition.
// Purpose: Define the canonical JSON wire and storage form of a job.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Job`] is the unit of data in the service. Stored value bytes are the
//! literal JSON encoding of this struct; the repository, not the storage
//! engine, owns serialization. Tenancy is carried by the partition a record
//! lives in, not by a field inside the record.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::identifiers::JobId;

// ============================================================================
// SECTION: Job
// ============================================================================

/// Job posting record.
///
/// # Invariants
/// - `id` is unique within its tenant partition and monotonically assigned by
///   the partition sequence counter; ids are never reused after deletion.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Job {
    /// Job identifier within the tenant partition.
    pub id: JobId,
    /// Job title.
    pub title: String,
    /// Job description.
    pub description: String,
}

impl Job {
    /// Returns the job with its identifier replaced.
    #[must_use]
    pub fn with_id(mut self, id: JobId) -> Self {
        self.id = id;
        self
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

    use super::Job;
    use super::JobId;

    #[test]
    fn json_field_names_are_lowercase() {
        let job = Job {
            id: JobId::new(1),
            title: "Engineer".to_string(),
            description: "Build things".to_string(),
        };
        let json = serde_json::to_string(&job).unwrap();
        assert_eq!(json, r#"{"id":1,"title":"Engineer","description":"Build things"}"#);
    }

    #[test]
    fn json_round_trip() {
        let job = Job {
            id: JobId::new(7),
            title: "Writer".to_string(),
            description: "Write things".to_string(),
        };
        let bytes = serde_json::to_vec(&job).unwrap();
        let decoded: Job = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, job);
    }
}
