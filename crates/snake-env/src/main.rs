//! Snake environment server binary.
//!
//! Loads configuration, builds the single shared board and the session
//! pool, and serves the REST adapter until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `snake-config.yaml` (or the path in
//!    `SNAKE_CONFIG`), falling back to defaults
//! 2. Initialize structured logging (tracing)
//! 3. Validate the board and build the shared state
//! 4. Serve HTTP until shutdown

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use snake_core::SnakeConfig;
use snake_server::{AppState, ServerConfig, start_server};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EnvError;

/// Default configuration file, relative to the working directory.
const CONFIG_FILE: &str = "snake-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the server cannot
/// bind.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so remember whether the
    // file was found and report it below.
    let (config, source) = load_config()?;

    // 2. Initialize structured logging.
    let level = config.logging.level.clone();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(true)
        .init();

    info!("snake-env starting");
    match &source {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }

    // 3. Validate and build state.
    config.validate().map_err(EnvError::from)?;
    info!(
        cols = config.board.cols,
        rows = config.board.rows,
        timeout_mult = config.board.timeout_mult,
        "Default board"
    );
    let state = Arc::new(AppState::new(config.board).map_err(EnvError::from)?);

    // 4. Serve.
    let server = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.rest_port,
    };
    start_server(&server, state, shutdown_signal())
        .await
        .map_err(EnvError::from)?;

    info!("snake-env stopped");
    Ok(())
}

/// Load configuration from `SNAKE_CONFIG` or [`CONFIG_FILE`].
///
/// A missing file is not an error; defaults (plus environment overrides)
/// are used instead.
fn load_config() -> Result<(SnakeConfig, Option<PathBuf>), EnvError> {
    let path = std::env::var_os("SNAKE_CONFIG").map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    if path.exists() {
        let config = SnakeConfig::from_file(&path)?;
        Ok((config, Some(path)))
    } else {
        let mut config = SnakeConfig::default();
        config.apply_env_overrides();
        Ok((config, None))
    }
}

/// Resolve when the process receives `Ctrl-C`.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
