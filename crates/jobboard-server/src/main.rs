// crates/jobboard-server/src/main.rs
// ============================================================================
// Module: Jobboard Binary
// Description: Command-line entry point for the Jobboard server.
// Purpose: Load configuration and run the HTTP server.
// Dependencies: jobboard-server, clap, tokio
// ============================================================================

//! ## Overview
//! The binary loads a TOML configuration file (`--config`, the
//! `JOBBOARD_CONFIG` environment variable, or `jobboard.toml` in the working
//! directory), builds the server, and serves until the listener fails. The
//! storage engine is constructed once here and handed into the components by
//! shared handle; there is no global store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use jobboard_server::JobboardConfig;
use jobboard_server::JobboardServer;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "jobboard", version, about = "Multi-tenant job board server")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Binary entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            let _ = writeln!(std::io::stderr(), "jobboard: {message}");
            ExitCode::FAILURE
        }
    }
}

/// Loads configuration and serves requests.
async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let config =
        JobboardConfig::load(cli.config.as_deref()).map_err(|err| err.to_string())?;
    let server = JobboardServer::from_config(config).map_err(|err| err.to_string())?;
    server.serve().await.map_err(|err| err.to_string())
}
