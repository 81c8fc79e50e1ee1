//! Diagnostic logging via the `tracing` crate.
//!
//! Separate from the durable event log: this is operator-facing process
//! diagnostics, initialized exactly once at startup with a defined
//! lifecycle and never reconfigured afterwards.

use crate::error::MonitorError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether diagnostic logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output is "file"; None means the platform state
    /// directory
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, stdout/stderr only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
        }
    }
}

/// Resolve the diagnostic log file path: the configured value, or a
/// `vigil.log` under the platform state directory.
pub fn resolve_log_file_path(config_file: Option<PathBuf>) -> Result<PathBuf, MonitorError> {
    if let Some(path) = config_file {
        if !path.as_os_str().is_empty() {
            return Ok(path);
        }
    }
    let project_dirs = directories::ProjectDirs::from("", "vigil", "vigil").ok_or_else(|| {
        MonitorError::Config("could not determine platform state directory for log file".to_string())
    })?;
    let dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_dir())
        .to_path_buf();
    Ok(dir.join("vigil.log"))
}

/// Initialize the logging system.
///
/// Called once from the binary at process start; the library never
/// installs a global subscriber on its own. `VIGIL_LOG` overrides the
/// configured level filter.
pub fn init_logging(config: &LoggingConfig) -> Result<(), MonitorError> {
    if !config.enabled {
        Registry::default()
            .with(EnvFilter::new("off"))
            .with(fmt::layer().with_writer(|| std::io::sink()))
            .init();
        return Ok(());
    }

    let filter = build_env_filter(config);
    let base = Registry::default().with(filter);

    match (config.format.as_str(), config.output.as_str()) {
        ("json", "stdout") => base
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stdout),
            )
            .init(),
        ("json", "stderr") => base
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .init(),
        ("json", "file") => {
            let writer = open_log_file(config)?;
            base.with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .init();
        }
        ("text", "stdout") => base
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color)
                    .with_writer(std::io::stdout),
            )
            .init(),
        ("text", "stderr") => base
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color)
                    .with_writer(std::io::stderr),
            )
            .init(),
        ("text", "file") => {
            let writer = open_log_file(config)?;
            base.with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .with_writer(writer),
            )
            .init();
        }
        (format, _) if format != "json" && format != "text" => {
            return Err(MonitorError::Config(format!(
                "invalid log format: {format} (must be 'json' or 'text')"
            )));
        }
        (_, output) => {
            return Err(MonitorError::Config(format!(
                "invalid log output: {output} (must be 'stdout', 'stderr', or 'file')"
            )));
        }
    }

    Ok(())
}

fn open_log_file(config: &LoggingConfig) -> Result<std::fs::File, MonitorError> {
    let log_file = resolve_log_file_path(config.file.clone())?;
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| MonitorError::Config(format!("failed to create log directory: {e}")))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .map_err(|e| {
            MonitorError::Config(format!("failed to open log file {log_file:?}: {e}"))
        })
}

/// Build the level filter: `VIGIL_LOG` environment variable first, then
/// the configured level.
fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env("VIGIL_LOG") {
        return filter;
    }
    EnvFilter::new(config.level.as_str())
}
