// crates/jobboard-server/src/notify.rs
// ============================================================================
// Module: Job List Notifier
// Description: Outbound upload of a tenant's job list to a partner endpoint.
// Purpose: Keep the dormant webhook behind a trait seam.
// Dependencies: jobboard-core, reqwest, thiserror
// ============================================================================

//! ## Overview
//! After a job write the server can upload the tenant's full job list to a
//! partner endpoint. The feature ships disabled: it activates only when the
//! config enables it and the endpoint environment variables are present.
//! Credentials come from the environment (`IO_TAZZY_URL`, `IO_TAZZY_SECRET`,
//! `APP_SHORTCODE`), never from the config file. The upload authenticates
//! with a secret header and identifies this application, not the tenant whose
//! list is being uploaded, in the tenant header.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::time::Duration;

use jobboard_core::TenantCode;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable holding the partner base URL.
pub const URL_ENV_VAR: &str = "IO_TAZZY_URL";
/// Environment variable holding the upload secret.
pub const SECRET_ENV_VAR: &str = "IO_TAZZY_SECRET";
/// Environment variable holding this application's short code.
pub const APP_SHORTCODE_ENV_VAR: &str = "APP_SHORTCODE";
/// Upload API path under the partner base URL.
const UPLOAD_API_PATH: &str = "devs/tas/jobSets/uploads";
/// Header carrying the upload secret.
const SECRET_HEADER: &str = "tazzy-secret";
/// Header carrying the application short code.
const TENANT_HEADER: &str = "tazzy-tenant";
/// Request timeout for uploads.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Notifier errors.
#[derive(Debug, Error, Clone)]
pub enum NotifyError {
    /// The notifier could not be constructed.
    #[error("notify init error: {0}")]
    Init(String),
    /// The upload request failed.
    #[error("notify http error: {0}")]
    Http(String),
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Uploads a tenant's job list after writes.
pub trait JobListNotifier: Send + Sync {
    /// Sends the serialized job list for the given tenant.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the upload fails.
    fn notify(&self, tenant: &TenantCode, job_list: &[u8]) -> Result<(), NotifyError>;
}

/// Notifier that does nothing. Used when the feature is disabled.
pub struct NoopNotifier;

impl JobListNotifier for NoopNotifier {
    fn notify(&self, _tenant: &TenantCode, _job_list: &[u8]) -> Result<(), NotifyError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: HTTP Notifier
// ============================================================================

/// Notifier that POSTs the job list to the partner endpoint.
pub struct HttpJobListNotifier {
    /// Blocking HTTP client for uploads.
    client: reqwest::blocking::Client,
    /// Full upload endpoint URL.
    endpoint: String,
    /// Upload secret sent in the secret header.
    secret: String,
    /// This application's short code sent in the tenant header.
    app_shortcode: String,
}

impl HttpJobListNotifier {
    /// Builds a notifier from the environment.
    ///
    /// Returns `Ok(None)` when the endpoint URL is not configured, which is
    /// the dormant state.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Init`] when the HTTP client cannot be built.
    pub fn from_env() -> Result<Option<Self>, NotifyError> {
        let Ok(base_url) = env::var(URL_ENV_VAR) else {
            return Ok(None);
        };
        let secret = env::var(SECRET_ENV_VAR).unwrap_or_default();
        let app_shortcode = env::var(APP_SHORTCODE_ENV_VAR).unwrap_or_default();
        let client = reqwest::blocking::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .map_err(|err| NotifyError::Init(err.to_string()))?;
        Ok(Some(Self {
            client,
            endpoint: endpoint_url(&base_url),
            secret,
            app_shortcode,
        }))
    }

    /// Returns the upload endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl JobListNotifier for HttpJobListNotifier {
    fn notify(&self, _tenant: &TenantCode, job_list: &[u8]) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header(SECRET_HEADER, &self.secret)
            .header(TENANT_HEADER, &self.app_shortcode)
            .body(job_list.to_vec())
            .send()
            .map_err(|err| NotifyError::Http(err.to_string()))?;
        if !response.status().is_success() {
            return Err(NotifyError::Http(format!("upload rejected: {}", response.status())));
        }
        Ok(())
    }
}

/// Joins the partner base URL with the upload API path.
fn endpoint_url(base_url: &str) -> String {
    format!("{}/{UPLOAD_API_PATH}", base_url.trim_end_matches('/'))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
