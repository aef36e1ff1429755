// crates/jobboard-server/src/audit.rs
// ============================================================================
// Module: Request Audit Logging
// Description: Structured audit events for HTTP request handling.
// Purpose: Emit one JSON line per request without a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines the request audit event and its sinks. It is
//! intentionally lightweight so deployments can route events to their
//! preferred logging pipeline without redesign. In lenient error mode the
//! audit stream is the only place failed operations surface.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Request outcome labels for audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// The operation completed.
    Success,
    /// The operation failed.
    Error,
}

/// HTTP request audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct RequestAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// HTTP method.
    pub method: &'static str,
    /// Request path.
    pub path: String,
    /// Tenant short code resolved for the request.
    pub tenant: Option<String>,
    /// Request outcome.
    pub outcome: AuditOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Error message when the operation failed.
    pub error: Option<String>,
    /// HTTP status code returned to the caller.
    pub status: u16,
}

/// Inputs required to construct a request audit event.
pub struct RequestAuditEventParams {
    /// HTTP method.
    pub method: &'static str,
    /// Request path.
    pub path: String,
    /// Tenant short code resolved for the request.
    pub tenant: Option<String>,
    /// Request outcome.
    pub outcome: AuditOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Error message when the operation failed.
    pub error: Option<String>,
    /// HTTP status code returned to the caller.
    pub status: u16,
}

impl RequestAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: RequestAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "http_request",
            timestamp_ms,
            method: params.method,
            path: params.path,
            tenant: params.tenant,
            outcome: params.outcome,
            error_kind: params.error_kind,
            error: params.error,
            status: params.status,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for request events.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &RequestAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &RequestAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// No-op audit sink for tests.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &RequestAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
