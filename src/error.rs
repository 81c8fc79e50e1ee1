//! Error taxonomy for the integrity monitor.
//!
//! Per-file failures are contained and logged; pass-level preconditions
//! (no baseline, corrupt baseline, unavailable log) propagate as explicit
//! distinct outcomes, never as silent empty results.

use std::path::PathBuf;
use thiserror::Error;

/// Per-file hashing failure. "File absent" is a distinct variant from
/// "read failed mid-stream" so callers can log a specific diagnostic.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level error type for monitor operations.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The monitored directory does not exist; the check is aborted.
    #[error("monitored directory not found: {}", .0.display())]
    WatchDirMissing(PathBuf),

    /// No (or an empty) baseline exists. This is a precondition failure,
    /// not a zero-anomaly result: callers must create a baseline rather
    /// than trust an all-clear.
    #[error("no baseline available; run `vigil baseline` to create one")]
    NoBaseline,

    /// Refusal to silently overwrite an existing baseline.
    #[error("baseline already exists at {}; pass --force to overwrite it", .0.display())]
    BaselineExists(PathBuf),

    /// Baseline storage exists but cannot be used. Reconciliation aborts
    /// rather than comparing against an empty set, which would misreport
    /// every file as unknown.
    #[error("baseline at {} is unusable: {reason}", .path.display())]
    BaselineUnusable { path: PathBuf, reason: String },

    /// The event log cannot be opened. Distinct from an empty log so the
    /// dashboard renders an error state instead of zeroed statistics.
    #[error("event log {} unavailable: {source}", .path.display())]
    LogUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to encode baseline: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
