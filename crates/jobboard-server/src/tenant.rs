// crates/jobboard-server/src/tenant.rs
// ============================================================================
// Module: Tenant Resolution
// Description: Resolves the caller's tenant identity from request headers.
// Purpose: Keep the trust boundary for tenant identity in one seam.
// Dependencies: axum, jobboard-core
// ============================================================================

//! ## Overview
//! Tenant identity is carried in the `tazzy-tenant` request header and is
//! trusted as-is: there is no token validation behind it, so the same URL
//! resolves to different data depending on the header value. The resolver
//! trait keeps that trust decision in one replaceable seam. A missing or
//! non-UTF-8 header resolves to the empty code, which downstream layers
//! accept as a degenerate but valid tenant.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::http::HeaderMap;
use jobboard_core::TenantCode;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying the caller's tenant short code.
pub const TENANT_HEADER: &str = "tazzy-tenant";

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Produces a tenant identity from request headers.
pub trait TenantResolver: Send + Sync {
    /// Resolves the tenant code for a request.
    fn resolve(&self, headers: &HeaderMap) -> TenantCode;
}

/// Resolver that trusts the tenant header verbatim.
pub struct HeaderTenantResolver;

impl TenantResolver for HeaderTenantResolver {
    fn resolve(&self, headers: &HeaderMap) -> TenantCode {
        let code = headers
            .get(TENANT_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        TenantCode::new(code)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
