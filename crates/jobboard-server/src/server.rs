// crates/jobboard-server/src/server.rs
// ============================================================================
// Module: HTTP Server
// Description: Route table, handlers, and wiring for the Jobboard service.
// Purpose: Map HTTP requests onto registry and repository operations.
// Dependencies: jobboard-core, jobboard-store-sqlite, axum, tokio
// ============================================================================

//! ## Overview
//! The server maps each route onto one registry or repository call. Tenant
//! identity comes from the resolver seam, never from job-scoped URLs, so the
//! same URL resolves to different data per caller. Error handling follows the
//! configured mode: strict maps error kinds to HTTP statuses, lenient records
//! the error to the audit sink and returns the success-path response anyway.
//! Unmatched paths fall through to static file serving.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::extract::Form;
use axum::extract::Json;
use axum::extract::Path;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::http::header::CONTENT_TYPE;
use axum::http::header::LOCATION;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use jobboard_core::Job;
use jobboard_core::JobId;
use jobboard_core::JobRepository;
use jobboard_core::MemoryStorageEngine;
use jobboard_core::RegistryError;
use jobboard_core::RepositoryError;
use jobboard_core::SharedStorageEngine;
use jobboard_core::TenantCode;
use jobboard_core::TenantRegistry;
use jobboard_store_sqlite::SqliteEngineConfig;
use jobboard_store_sqlite::SqliteStorageEngine;
use serde::Deserialize;
use thiserror::Error;

use crate::audit::AuditOutcome;
use crate::audit::AuditSink;
use crate::audit::RequestAuditEvent;
use crate::audit::RequestAuditEventParams;
use crate::audit::StderrAuditSink;
use crate::config::ErrorMode;
use crate::config::JobboardConfig;
use crate::config::StoreType;
use crate::notify::HttpJobListNotifier;
use crate::notify::JobListNotifier;
use crate::notify::NoopNotifier;
use crate::pages::render_job_form;
use crate::pages::render_job_list;
use crate::static_files::content_type_for;
use crate::static_files::resolve_asset_path;
use crate::tenant::HeaderTenantResolver;
use crate::tenant::TenantResolver;

// ============================================================================
// SECTION: Server
// ============================================================================

/// Jobboard HTTP server instance.
pub struct JobboardServer {
    /// Loaded server configuration.
    config: JobboardConfig,
    /// Shared handler state.
    state: Arc<AppState>,
}

impl JobboardServer {
    /// Builds a server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`JobboardServerError`] when initialization fails.
    pub fn from_config(config: JobboardConfig) -> Result<Self, JobboardServerError> {
        config.validate().map_err(|err| JobboardServerError::Config(err.to_string()))?;
        let engine = build_storage_engine(&config)?;
        let (notifier, notify_enabled) = build_notifier(&config)?;
        let state = Arc::new(AppState {
            registry: TenantRegistry::new(engine.clone()),
            repository: JobRepository::new(engine),
            resolver: Arc::new(HeaderTenantResolver),
            audit: Arc::new(StderrAuditSink),
            notifier,
            notify_enabled,
            error_mode: config.server.error_mode,
            static_dir: config.server.static_dir.clone(),
        });
        Ok(Self {
            config,
            state,
        })
    }

    /// Serves requests until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`JobboardServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), JobboardServerError> {
        let addr: SocketAddr = self
            .config
            .server
            .bind
            .parse()
            .map_err(|_| JobboardServerError::Config("invalid bind address".to_string()))?;
        let app = build_router(self.state, self.config.server.max_body_bytes);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|_| JobboardServerError::Transport("http bind failed".to_string()))?;
        axum::serve(listener, app)
            .await
            .map_err(|_| JobboardServerError::Transport("http server failed".to_string()))
    }
}

/// Builds the route table over shared state.
fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handle_base_page))
        .route("/job/{job}", get(handle_job_form).post(handle_job_update))
        .route("/remove/{job}", get(handle_job_remove))
        .route("/tas/core/tenants", post(handle_tenant_create))
        .route("/tas/core/tenants/{tenant}", delete(handle_tenant_delete))
        .route("/tas/devs/tas/jobs", get(handle_jobs_json))
        .route("/tas/devs/tas/jobs/byID/{job}", get(handle_job_by_id))
        .fallback(handle_static)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Builds the storage engine selected by configuration.
fn build_storage_engine(
    config: &JobboardConfig,
) -> Result<SharedStorageEngine, JobboardServerError> {
    match config.store.store_type {
        StoreType::Memory => Ok(SharedStorageEngine::from_engine(MemoryStorageEngine::new())),
        StoreType::Sqlite => {
            let path = config.store.path.clone().ok_or_else(|| {
                JobboardServerError::Config("sqlite store requires store.path".to_string())
            })?;
            let engine_config = SqliteEngineConfig {
                path,
                busy_timeout_ms: config.store.busy_timeout_ms,
                journal_mode: config.store.journal_mode,
                sync_mode: config.store.sync_mode,
                read_pool_size: config.store.read_pool_size,
            };
            let engine = SqliteStorageEngine::new(&engine_config)
                .map_err(|err| JobboardServerError::Init(err.to_string()))?;
            Ok(SharedStorageEngine::from_engine(engine))
        }
    }
}

/// Builds the job-list notifier and reports whether uploads are live.
fn build_notifier(
    config: &JobboardConfig,
) -> Result<(Arc<dyn JobListNotifier>, bool), JobboardServerError> {
    if !config.notify.enabled {
        return Ok((Arc::new(NoopNotifier), false));
    }
    match HttpJobListNotifier::from_env()
        .map_err(|err| JobboardServerError::Init(err.to_string()))?
    {
        Some(notifier) => Ok((Arc::new(notifier), true)),
        None => {
            let _ = writeln!(
                std::io::stderr(),
                "jobboard: notify.enabled is set but IO_TAZZY_URL is missing; uploads stay off"
            );
            Ok((Arc::new(NoopNotifier), false))
        }
    }
}

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared handler state.
struct AppState {
    /// Tenant lifecycle operations.
    registry: TenantRegistry,
    /// Tenant-scoped job operations.
    repository: JobRepository,
    /// Tenant identity seam.
    resolver: Arc<dyn TenantResolver>,
    /// Request audit sink.
    audit: Arc<dyn AuditSink>,
    /// Job-list upload seam.
    notifier: Arc<dyn JobListNotifier>,
    /// Whether uploads run after job writes.
    notify_enabled: bool,
    /// Configured error handling mode.
    error_mode: ErrorMode,
    /// Root directory for static assets.
    static_dir: PathBuf,
}

// ============================================================================
// SECTION: Request Errors
// ============================================================================

/// Domain errors surfaced by request handlers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
enum RequestError {
    /// The tenant is already registered.
    #[error("tenant already exists: {0}")]
    TenantExists(String),
    /// The tenant is not registered.
    #[error("tenant not found: {0}")]
    TenantNotFound(String),
    /// The job does not exist in the tenant's collection.
    #[error("job not found: {0}")]
    JobNotFound(String),
    /// The request carried an unparsable id, body, or form.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// Underlying storage failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl RequestError {
    /// Returns the strict-mode HTTP status for this error.
    const fn status(&self) -> StatusCode {
        match self {
            Self::TenantExists(_) => StatusCode::CONFLICT,
            Self::TenantNotFound(_) | Self::JobNotFound(_) => StatusCode::NOT_FOUND,
            Self::MalformedInput(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the normalized audit label for this error.
    const fn kind_label(&self) -> &'static str {
        match self {
            Self::TenantExists(_) => "tenant_exists",
            Self::TenantNotFound(_) => "tenant_not_found",
            Self::JobNotFound(_) => "job_not_found",
            Self::MalformedInput(_) => "malformed_input",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<RegistryError> for RequestError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::AlreadyExists(tenant) => Self::TenantExists(tenant),
            RegistryError::NotFound(tenant) => Self::TenantNotFound(tenant),
            RegistryError::Storage(message) => Self::Storage(message),
        }
    }
}

impl From<RepositoryError> for RequestError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::TenantNotFound(tenant) => Self::TenantNotFound(tenant),
            RepositoryError::Serialization(message) | RepositoryError::Storage(message) => {
                Self::Storage(message)
            }
        }
    }
}

// ============================================================================
// SECTION: Request Bodies
// ============================================================================

/// Form payload for job creation and update.
#[derive(Debug, Default, Deserialize)]
struct JobForm {
    /// Job title field.
    #[serde(rename = "Title", default)]
    title: String,
    /// Job description field.
    #[serde(rename = "Description", default)]
    description: String,
}

/// JSON payload for tenant registration.
#[derive(Debug, Default, Deserialize)]
struct TenantInfo {
    /// Tenant short code.
    #[serde(rename = "shortCode", default)]
    short_code: String,
}

// ============================================================================
// SECTION: Response Plumbing
// ============================================================================

/// Per-request audit context.
struct AuditContext {
    /// HTTP method label.
    method: &'static str,
    /// Request path.
    path: String,
    /// Resolved tenant, when the route is tenant-scoped.
    tenant: Option<String>,
}

impl AuditContext {
    /// Creates a context for a tenant-scoped route.
    fn scoped(method: &'static str, path: String, tenant: &TenantCode) -> Self {
        Self {
            method,
            path,
            tenant: Some(tenant.to_string()),
        }
    }

    /// Creates a context for a tenant-independent route.
    fn bare(method: &'static str, path: String) -> Self {
        Self {
            method,
            path,
            tenant: None,
        }
    }
}

/// Completes a request: audits the outcome and applies the error mode.
fn finish(
    state: &AppState,
    ctx: AuditContext,
    result: Result<Response, RequestError>,
    fallback: impl FnOnce() -> Response,
) -> Response {
    match result {
        Ok(response) => {
            state.audit.record(&RequestAuditEvent::new(RequestAuditEventParams {
                method: ctx.method,
                path: ctx.path,
                tenant: ctx.tenant,
                outcome: AuditOutcome::Success,
                error_kind: None,
                error: None,
                status: response.status().as_u16(),
            }));
            response
        }
        Err(err) => {
            let (status, response) = match state.error_mode {
                ErrorMode::Strict => {
                    let status = err.status();
                    (status, (status, err.to_string()).into_response())
                }
                ErrorMode::Lenient => {
                    let response = fallback();
                    (response.status(), response)
                }
            };
            state.audit.record(&RequestAuditEvent::new(RequestAuditEventParams {
                method: ctx.method,
                path: ctx.path,
                tenant: ctx.tenant,
                outcome: AuditOutcome::Error,
                error_kind: Some(err.kind_label()),
                error: Some(err.to_string()),
                status: status.as_u16(),
            }));
            response
        }
    }
}

/// Builds a 301 redirect to the given location.
fn redirect_to(location: &str) -> Response {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .body(Body::empty())
        .unwrap_or_else(|_| StatusCode::MOVED_PERMANENTLY.into_response())
}

/// Parses a path segment into a job id.
fn parse_job_id(raw: &str) -> Result<JobId, RequestError> {
    raw.parse::<u64>()
        .map(JobId::new)
        .map_err(|_| RequestError::MalformedInput(format!("invalid job id: {raw}")))
}

/// Resolves the effective job id for the configured error mode.
///
/// Unparsable ids collapse to the assign-new sentinel in lenient mode, which
/// is what the legacy handlers did after logging the parse failure.
fn effective_job_id(state: &AppState, raw: &str) -> Result<JobId, RequestError> {
    match parse_job_id(raw) {
        Ok(id) => Ok(id),
        Err(err) => match state.error_mode {
            ErrorMode::Strict => Err(err),
            ErrorMode::Lenient => Ok(JobId::UNASSIGNED),
        },
    }
}

// ============================================================================
// SECTION: Page Handlers
// ============================================================================

/// `GET /` renders the job list page.
async fn handle_base_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let tenant = state.resolver.resolve(&headers);
    let ctx = AuditContext::scoped("GET", "/".to_string(), &tenant);
    let result = base_page_core(&state, &tenant);
    finish(&state, ctx, result, || Html(render_job_list(&[])).into_response())
}

/// Renders the job list for a tenant.
fn base_page_core(state: &AppState, tenant: &TenantCode) -> Result<Response, RequestError> {
    let jobs = state.repository.list_jobs_decoded(tenant)?;
    Ok(Html(render_job_list(&jobs)).into_response())
}

/// `GET /job/{job}` renders the creation or edit form.
async fn handle_job_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response {
    let tenant = state.resolver.resolve(&headers);
    let ctx = AuditContext::scoped("GET", format!("/job/{raw_id}"), &tenant);
    let result = job_form_core(&state, &tenant, &raw_id);
    finish(&state, ctx, result, || Html(render_job_form(None)).into_response())
}

/// Builds the form page for an id: `0` is the empty creation form.
fn job_form_core(
    state: &AppState,
    tenant: &TenantCode,
    raw_id: &str,
) -> Result<Response, RequestError> {
    let id = effective_job_id(state, raw_id)?;
    if id.is_unassigned() {
        return Ok(Html(render_job_form(None)).into_response());
    }
    let bytes = state
        .repository
        .get_job(tenant, id)?
        .ok_or_else(|| RequestError::JobNotFound(id.to_string()))?;
    let job: Job =
        serde_json::from_slice(&bytes).map_err(|err| RequestError::Storage(err.to_string()))?;
    Ok(Html(render_job_form(Some(&job))).into_response())
}

/// `POST /job/{job}` stores a job and redirects to its edit form.
async fn handle_job_update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    form: Result<Form<JobForm>, FormRejection>,
) -> Response {
    let tenant = state.resolver.resolve(&headers);
    let ctx = AuditContext::scoped("POST", format!("/job/{raw_id}"), &tenant);
    let form = match accept_payload(&state, form.map(|Form(form)| form)) {
        Ok(form) => form,
        Err(err) => {
            return finish(&state, ctx, Err(err), || redirect_to(&format!("/job/{raw_id}")));
        }
    };
    let result = update_job_core(&state, &tenant, &raw_id, form);
    match result {
        Ok(stored) => {
            let response = redirect_to(&format!("/job/{}", stored.id));
            send_notification(&state, &tenant);
            finish(&state, ctx, Ok(response), || StatusCode::OK.into_response())
        }
        Err(err) => finish(&state, ctx, Err(err), || redirect_to(&format!("/job/{raw_id}"))),
    }
}

/// Applies the error mode to an extracted request payload.
///
/// Strict mode rejects the request; lenient mode substitutes the payload's
/// default, matching the legacy handlers that logged decode failures and
/// carried on with an empty value.
fn accept_payload<T: Default>(
    state: &AppState,
    payload: Result<T, impl ToString>,
) -> Result<T, RequestError> {
    match payload {
        Ok(value) => Ok(value),
        Err(rejection) => match state.error_mode {
            ErrorMode::Strict => Err(RequestError::MalformedInput(rejection.to_string())),
            ErrorMode::Lenient => Ok(T::default()),
        },
    }
}

/// Stores a job from form input, allocating an id when the path id is `0`.
fn update_job_core(
    state: &AppState,
    tenant: &TenantCode,
    raw_id: &str,
    form: JobForm,
) -> Result<Job, RequestError> {
    let id = effective_job_id(state, raw_id)?;
    let job = Job {
        id,
        title: form.title,
        description: form.description,
    };
    Ok(state.repository.put_job(tenant, job)?)
}

/// `GET /remove/{job}` deletes a job and redirects to the list page.
async fn handle_job_remove(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response {
    let tenant = state.resolver.resolve(&headers);
    let ctx = AuditContext::scoped("GET", format!("/remove/{raw_id}"), &tenant);
    let result = remove_job_core(&state, &tenant, &raw_id).map(|()| redirect_to("/"));
    finish(&state, ctx, result, || redirect_to("/"))
}

/// Deletes a job by id. Deleting an absent id is a no-op.
fn remove_job_core(
    state: &AppState,
    tenant: &TenantCode,
    raw_id: &str,
) -> Result<(), RequestError> {
    let id = effective_job_id(state, raw_id)?;
    state.repository.delete_job(tenant, id)?;
    Ok(())
}

// ============================================================================
// SECTION: Tenant Handlers
// ============================================================================

/// `POST /tas/core/tenants` registers a tenant from a JSON body.
async fn handle_tenant_create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TenantInfo>, JsonRejection>,
) -> Response {
    let info = match accept_payload(&state, body.map(|Json(info)| info)) {
        Ok(info) => info,
        Err(err) => {
            let ctx = AuditContext::bare("POST", "/tas/core/tenants".to_string());
            return finish(&state, ctx, Err(err), || StatusCode::OK.into_response());
        }
    };
    let tenant = TenantCode::new(info.short_code);
    let ctx = AuditContext::scoped("POST", "/tas/core/tenants".to_string(), &tenant);
    let result = state
        .registry
        .create_tenant(&tenant)
        .map(|()| StatusCode::OK.into_response())
        .map_err(RequestError::from);
    finish(&state, ctx, result, || StatusCode::OK.into_response())
}

/// `DELETE /tas/core/tenants/{tenant}` removes a tenant and its jobs.
async fn handle_tenant_delete(
    State(state): State<Arc<AppState>>,
    Path(tenant): Path<String>,
) -> Response {
    let tenant = TenantCode::new(tenant);
    let ctx =
        AuditContext::scoped("DELETE", format!("/tas/core/tenants/{tenant}"), &tenant);
    let result = state
        .registry
        .delete_tenant(&tenant)
        .map(|()| StatusCode::OK.into_response())
        .map_err(RequestError::from);
    finish(&state, ctx, result, || StatusCode::OK.into_response())
}

// ============================================================================
// SECTION: JSON API Handlers
// ============================================================================

/// `GET /tas/devs/tas/jobs` returns the tenant's job list as JSON.
async fn handle_jobs_json(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let tenant = state.resolver.resolve(&headers);
    let ctx = AuditContext::scoped("GET", "/tas/devs/tas/jobs".to_string(), &tenant);
    let result = jobs_json_core(&state, &tenant);
    finish(&state, ctx, result, || json_bytes_response(b"[]".to_vec()))
}

/// Builds the raw JSON list response for a tenant.
fn jobs_json_core(state: &AppState, tenant: &TenantCode) -> Result<Response, RequestError> {
    let list = state.repository.list_jobs(tenant)?;
    Ok(json_bytes_response(list))
}

/// `GET /tas/devs/tas/jobs/byID/{job}` returns one job's stored bytes.
async fn handle_job_by_id(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response {
    let tenant = state.resolver.resolve(&headers);
    let ctx = AuditContext::scoped("GET", format!("/tas/devs/tas/jobs/byID/{raw_id}"), &tenant);
    let result = job_by_id_core(&state, &tenant, &raw_id);
    finish(&state, ctx, result, || json_bytes_response(Vec::new()))
}

/// Builds the raw record response for one job id.
fn job_by_id_core(
    state: &AppState,
    tenant: &TenantCode,
    raw_id: &str,
) -> Result<Response, RequestError> {
    let id = effective_job_id(state, raw_id)?;
    let bytes = state
        .repository
        .get_job(tenant, id)?
        .ok_or_else(|| RequestError::JobNotFound(id.to_string()))?;
    Ok(json_bytes_response(bytes))
}

/// Wraps raw JSON bytes in a response.
fn json_bytes_response(bytes: Vec<u8>) -> Response {
    ([(CONTENT_TYPE, "application/json")], bytes).into_response()
}

// ============================================================================
// SECTION: Static Fallback
// ============================================================================

/// Serves unmatched paths from the static asset directory.
async fn handle_static(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let Some(path) = resolve_asset_path(&state.static_dir, uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(CONTENT_TYPE, content_type_for(&path))], bytes).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

// ============================================================================
// SECTION: Notification
// ============================================================================

/// Uploads the tenant's job list after a successful write.
///
/// Upload failures never affect the response; they surface in the audit
/// stream only.
fn send_notification(state: &AppState, tenant: &TenantCode) {
    if !state.notify_enabled {
        return;
    }
    let list = match state.repository.list_jobs(tenant) {
        Ok(list) => list,
        Err(err) => {
            record_notify_failure(state, tenant, &err.to_string());
            return;
        }
    };
    let result = match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(|| state.notifier.notify(tenant, &list))
        }
        _ => state.notifier.notify(tenant, &list),
    };
    if let Err(err) = result {
        record_notify_failure(state, tenant, &err.to_string());
    }
}

/// Records a failed job-list upload to the audit sink.
fn record_notify_failure(state: &AppState, tenant: &TenantCode, message: &str) {
    state.audit.record(&RequestAuditEvent::new(RequestAuditEventParams {
        method: "POST",
        path: "/notify/jobSets/uploads".to_string(),
        tenant: Some(tenant.to_string()),
        outcome: AuditOutcome::Error,
        error_kind: Some("notify_failed"),
        error: Some(message.to_string()),
        status: StatusCode::BAD_GATEWAY.as_u16(),
    }));
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Jobboard server errors.
#[derive(Debug, Error)]
pub enum JobboardServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
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

    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum::http::header::LOCATION;
    use jobboard_core::JobRepository;
    use jobboard_core::MemoryStorageEngine;
    use jobboard_core::SharedStorageEngine;
    use jobboard_core::TenantCode;
    use jobboard_core::TenantRegistry;

    use super::AppState;
    use super::AuditContext;
    use super::JobForm;
    use super::RequestError;
    use super::TenantInfo;
    use super::accept_payload;
    use super::base_page_core;
    use super::effective_job_id;
    use super::finish;
    use super::job_by_id_core;
    use super::job_form_core;
    use super::jobs_json_core;
    use super::parse_job_id;
    use super::redirect_to;
    use super::remove_job_core;
    use super::update_job_core;
    use crate::audit::NoopAuditSink;
    use crate::config::ErrorMode;
    use crate::notify::NoopNotifier;
    use crate::tenant::HeaderTenantResolver;

    fn test_state(error_mode: ErrorMode) -> AppState {
        let engine = SharedStorageEngine::from_engine(MemoryStorageEngine::new());
        AppState {
            registry: TenantRegistry::new(engine.clone()),
            repository: JobRepository::new(engine),
            resolver: Arc::new(HeaderTenantResolver),
            audit: Arc::new(NoopAuditSink),
            notifier: Arc::new(NoopNotifier),
            notify_enabled: false,
            error_mode,
            static_dir: PathBuf::from("public"),
        }
    }

    fn form(title: &str, description: &str) -> JobForm {
        JobForm {
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn job_ids_parse_from_path_segments() {
        assert_eq!(parse_job_id("7").unwrap().get(), 7);
        assert!(matches!(parse_job_id("abc"), Err(RequestError::MalformedInput(_))));
        assert!(matches!(parse_job_id("-1"), Err(RequestError::MalformedInput(_))));
    }

    #[test]
    fn lenient_mode_collapses_bad_ids_to_the_create_sentinel() {
        let strict = test_state(ErrorMode::Strict);
        let lenient = test_state(ErrorMode::Lenient);
        assert!(effective_job_id(&strict, "abc").is_err());
        assert!(effective_job_id(&lenient, "abc").unwrap().is_unassigned());
    }

    #[test]
    fn strict_mode_rejects_malformed_payloads() {
        let state = test_state(ErrorMode::Strict);
        let err = accept_payload(&state, Err::<JobForm, &str>("bad form body")).unwrap_err();
        assert!(matches!(err, RequestError::MalformedInput(_)));
        let err = accept_payload(&state, Err::<TenantInfo, &str>("bad json body")).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn lenient_mode_collapses_malformed_payloads_to_defaults() {
        let state = test_state(ErrorMode::Lenient);
        let form = accept_payload(&state, Err::<JobForm, &str>("bad form body")).unwrap();
        assert!(form.title.is_empty());
        assert!(form.description.is_empty());
        let info = accept_payload(&state, Err::<TenantInfo, &str>("bad json body")).unwrap();
        assert!(info.short_code.is_empty());
    }

    #[test]
    fn create_and_list_round_trip() {
        let state = test_state(ErrorMode::Strict);
        let tenant = TenantCode::new("acme");
        state.registry.create_tenant(&tenant).unwrap();
        let stored =
            update_job_core(&state, &tenant, "0", form("Engineer", "Build things")).unwrap();
        assert_eq!(stored.id.get(), 1);
        let response = jobs_json_core(&state, &tenant).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = base_page_core(&state, &tenant).unwrap();
        assert_eq!(page.status(), StatusCode::OK);
    }

    #[test]
    fn edit_form_requires_an_existing_job() {
        let state = test_state(ErrorMode::Strict);
        let tenant = TenantCode::new("acme");
        state.registry.create_tenant(&tenant).unwrap();
        let err = job_form_core(&state, &tenant, "5").unwrap_err();
        assert!(matches!(err, RequestError::JobNotFound(_)));
        let creation = job_form_core(&state, &tenant, "0").unwrap();
        assert_eq!(creation.status(), StatusCode::OK);
    }

    #[test]
    fn writes_against_an_unknown_tenant_map_to_not_found() {
        let state = test_state(ErrorMode::Strict);
        let tenant = TenantCode::new("ghost");
        let err = update_job_core(&state, &tenant, "0", form("a", "a")).unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let err = remove_job_core(&state, &tenant, "1").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicate_tenant_maps_to_conflict() {
        let state = test_state(ErrorMode::Strict);
        let tenant = TenantCode::new("acme");
        state.registry.create_tenant(&tenant).unwrap();
        let err: RequestError = state.registry.create_tenant(&tenant).unwrap_err().into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn strict_finish_maps_errors_to_statuses() {
        let state = test_state(ErrorMode::Strict);
        let ctx = AuditContext::bare("GET", "/job/9".to_string());
        let response = finish(
            &state,
            ctx,
            Err(RequestError::JobNotFound("9".to_string())),
            || redirect_to("/"),
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn lenient_finish_returns_the_success_path_response() {
        let state = test_state(ErrorMode::Lenient);
        let ctx = AuditContext::bare("GET", "/remove/9".to_string());
        let response = finish(
            &state,
            ctx,
            Err(RequestError::TenantNotFound("ghost".to_string())),
            || redirect_to("/"),
        );
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/");
    }

    #[test]
    fn job_by_id_returns_stored_bytes_and_misses_map_to_not_found() {
        let state = test_state(ErrorMode::Strict);
        let tenant = TenantCode::new("acme");
        state.registry.create_tenant(&tenant).unwrap();
        update_job_core(&state, &tenant, "0", form("Engineer", "Build things")).unwrap();
        let response = job_by_id_core(&state, &tenant, "1").unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let err = job_by_id_core(&state, &tenant, "2").unwrap_err();
        assert!(matches!(err, RequestError::JobNotFound(_)));
    }

    #[test]
    fn upsert_path_keeps_the_supplied_id() {
        let state = test_state(ErrorMode::Strict);
        let tenant = TenantCode::new("acme");
        state.registry.create_tenant(&tenant).unwrap();
        let stored = update_job_core(&state, &tenant, "7", form("late", "late")).unwrap();
        assert_eq!(stored.id.get(), 7);
    }

    #[test]
    fn tenants_are_isolated_through_the_handler_cores() {
        let state = test_state(ErrorMode::Strict);
        let acme = TenantCode::new("acme");
        let rival = TenantCode::new("rival");
        state.registry.create_tenant(&acme).unwrap();
        state.registry.create_tenant(&rival).unwrap();
        update_job_core(&state, &acme, "0", form("secret", "plans")).unwrap();
        let err = job_by_id_core(&state, &rival, "1").unwrap_err();
        assert!(matches!(err, RequestError::JobNotFound(_)));
    }
}
