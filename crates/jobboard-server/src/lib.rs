// crates/jobboard-server/src/lib.rs
// ============================================================================
// Module: Jobboard Server
// Description: HTTP surface, configuration, and wiring for Jobboard.
// Purpose: Expose tenant-scoped job CRUD over HTTP with audited errors.
// Dependencies: jobboard-core, jobboard-store-sqlite, axum, tokio
// ============================================================================

//! ## Overview
//! This crate wires the Jobboard domain onto an axum HTTP server. Tenant
//! identity comes from a request header through a pluggable resolver, every
//! request outcome is recorded to an audit sink, and error handling runs in
//! one of two modes: strict (errors map to HTTP status codes) or lenient
//! (errors are audited and the success-path response is returned anyway).

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod config;
pub mod notify;
pub mod pages;
pub mod server;
pub mod static_files;
pub mod tenant;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::NoopAuditSink;
pub use audit::RequestAuditEvent;
pub use audit::StderrAuditSink;
pub use config::ConfigError;
pub use config::ErrorMode;
pub use config::JobboardConfig;
pub use notify::JobListNotifier;
pub use notify::NoopNotifier;
pub use server::JobboardServer;
pub use server::JobboardServerError;
pub use tenant::HeaderTenantResolver;
pub use tenant::TenantResolver;
