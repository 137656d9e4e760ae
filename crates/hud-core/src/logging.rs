//! Logging infrastructure for HUD.
//!
//! This module provides structured logging using the `tracing` ecosystem.
//!
//! ## Features
//!
//! - JSON lines format for machine parsing, with the enclosing spans
//!   (`command`, `decode_snapshot`, `classify`) on every record
//! - File output to `~/.hud/logs/hud.log`
//! - Console output with configurable verbosity
//!
//! ## Example
//!
//! ```no_run
//! use hud_core::logging;
//!
//! // Initialize logging (call once at startup)
//! let _guard = logging::init_logging(None, false).expect("logging init");
//!
//! tracing::info!("HUD started");
//! tracing::debug!(resource = "vigoda", alerts = 2, "classified resource");
//! ```

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{HudError, Result};

/// Guard that must be held to ensure log flushing on shutdown.
///
/// Keep this guard alive for the lifetime of the application.
pub struct LogGuard {
    log_dir: PathBuf,
    _file_guard: Option<WorkerGuard>,
}

impl LogGuard {
    /// Directory the rolling `hud.log` files are written to.
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Initialize the HUD logging system.
///
/// This sets up:
/// - File logging to `<log_dir>/hud.log` (JSON lines, rolled daily). Each
///   record carries its span list, and closing a span writes its timings.
/// - Console logging to stderr (human-readable format)
///
/// `RUST_LOG` overrides the default filter of `hud=info` (`hud=debug` when
/// `verbose` is set).
pub fn init_logging(log_dir: Option<PathBuf>, verbose: bool) -> Result<LogGuard> {
    let log_dir = match log_dir {
        Some(dir) => dir,
        None => default_log_dir()?,
    };

    std::fs::create_dir_all(&log_dir).map_err(|e| HudError::DirectoryCreation {
        path: log_dir.clone(),
        source: e,
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "hud.log");
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hud={default_level}")));

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true)
        .with_span_list(true);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| HudError::internal(format!("logging already initialized: {e}")))?;

    tracing::debug!(log_dir = %log_dir.display(), verbose, "logging initialized");

    Ok(LogGuard {
        log_dir,
        _file_guard: Some(file_guard),
    })
}

/// Initialize minimal console-only logging for tests.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Get the default log directory path.
///
/// Returns `~/.hud/logs/`
pub fn default_log_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| HudError::internal("home directory not found"))?;
    Ok(home.join(".hud").join("logs"))
}

/// Get the default HUD log file path.
pub fn default_log_file() -> Result<PathBuf> {
    Ok(default_log_dir()?.join("hud.log"))
}
