// crates/jobboard-server/src/config.rs
// ============================================================================
// Module: Jobboard Configuration
// Description: Configuration loading and validation for the Jobboard server.
// Purpose: Provide strict config parsing with hard limits and sane defaults.
// Dependencies: jobboard-store-sqlite, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every field has a default so an empty file yields a runnable in-memory
//! server on loopback. Webhook credentials are read from the environment by
//! the notifier, never from this file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use jobboard_store_sqlite::SqliteEngineMode;
use jobboard_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "jobboard.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "JOBBOARD_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default server bind address.
const DEFAULT_BIND: &str = "127.0.0.1:8080";
/// Default static asset directory.
const DEFAULT_STATIC_DIR: &str = "public";
/// Default maximum request body size in bytes.
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Default `SQLite` busy timeout in milliseconds.
const DEFAULT_SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Default `SQLite` read connection pool size.
const DEFAULT_SQLITE_READ_POOL_SIZE: usize = 4;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Jobboard server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobboardConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerSection,
    /// Storage engine configuration.
    #[serde(default)]
    pub store: StoreSection,
    /// Outbound notification configuration.
    #[serde(default)]
    pub notify: NotifySection,
}

impl JobboardConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.store.validate()?;
        Ok(())
    }
}

/// HTTP server section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    /// Bind address in `host:port` form.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory served for unmatched paths.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    /// Error handling mode for request handlers.
    #[serde(default)]
    pub error_mode: ErrorMode,
    /// Maximum allowed request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl ServerSection {
    /// Validates the server section.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid("server.bind must be host:port".to_string()))?;
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if self.static_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("server.static_dir must be set".to_string()));
        }
        Ok(())
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            static_dir: default_static_dir(),
            error_mode: ErrorMode::default(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Error handling mode for request handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// Map error kinds to HTTP status codes.
    #[default]
    Strict,
    /// Record errors to the audit sink and return the success-path response.
    Lenient,
}

/// Storage engine selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// In-memory engine; contents are lost on shutdown.
    #[default]
    Memory,
    /// Durable `SQLite` engine.
    Sqlite,
}

/// Storage engine section.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    /// Selected engine backend.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// Database file path (required for the sqlite backend).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// `SQLite` busy timeout in milliseconds.
    #[serde(default = "default_sqlite_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteEngineMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// `SQLite` read connection pool size.
    #[serde(default = "default_sqlite_read_pool_size")]
    pub read_pool_size: usize,
}

impl StoreSection {
    /// Validates the store section.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.store_type == StoreType::Sqlite && self.path.is_none() {
            return Err(ConfigError::Invalid("sqlite store requires store.path".to_string()));
        }
        if self.read_pool_size == 0 {
            return Err(ConfigError::Invalid(
                "store.read_pool_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            store_type: StoreType::default(),
            path: None,
            busy_timeout_ms: default_sqlite_busy_timeout_ms(),
            journal_mode: SqliteEngineMode::default(),
            sync_mode: SqliteSyncMode::default(),
            read_pool_size: default_sqlite_read_pool_size(),
        }
    }
}

/// Outbound notification section.
///
/// Endpoint and secret come from the environment (see [`crate::notify`]);
/// the file only toggles the feature.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifySection {
    /// Whether job-list uploads are sent after writes.
    #[serde(default)]
    pub enabled: bool,
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Returns the default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Returns the default static asset directory.
fn default_static_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STATIC_DIR)
}

/// Returns the default maximum request body size.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Returns the default `SQLite` busy timeout.
const fn default_sqlite_busy_timeout_ms() -> u64 {
    DEFAULT_SQLITE_BUSY_TIMEOUT_MS
}

/// Returns the default `SQLite` read pool size.
const fn default_sqlite_read_pool_size() -> usize {
    DEFAULT_SQLITE_READ_POOL_SIZE
}

// ============================================================================
// SECTION: Path Resolution
// ============================================================================

/// Resolves the config path from the argument, environment, or default.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(value) = env::var(CONFIG_ENV_VAR) {
        if value.is_empty() {
            return Err(ConfigError::Invalid(format!("{CONFIG_ENV_VAR} must not be empty")));
        }
        return Ok(PathBuf::from(value));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates config paths for safety limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(
                "config path contains an overlong component".to_string(),
            ));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file I/O error.
    #[error("config io error: {0}")]
    Io(String),
    /// Config file parse error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration value.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
