//! Append-only event log: the durable audit trail of reconciliation
//! outcomes.
//!
//! The log is an explicit handle owned by the caller, opened once for the
//! process lifetime. Past entries are never mutated or deleted. Each line
//! follows the `[timestamp] LEVEL: message` grammar; classified events
//! additionally carry a machine-readable kind tag at the start of the
//! message so the aggregator parses a tag rather than prose.

use crate::error::MonitorError;
use crate::types::{AnomalyEvent, Severity, TIMESTAMP_FORMAT};
use chrono::Local;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Level field of one log line. `Info`, `Warning` and `Critical` lines
/// participate in aggregation; `Error` lines are diagnostics outside the
/// anomaly grammar, retained in the audit trail but skipped by the
/// aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

impl From<Severity> for LogLevel {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Info => LogLevel::Info,
            Severity::Warning => LogLevel::Warning,
            Severity::Critical => LogLevel::Critical,
        }
    }
}

/// Render one classified event as a single log line, newline included.
pub fn format_event_line(event: &AnomalyEvent) -> String {
    format!(
        "[{}] {}: [{}] {}\n",
        event.timestamp.format(TIMESTAMP_FORMAT),
        LogLevel::from(event.severity).as_str(),
        event.kind.tag(),
        event.message
    )
}

/// Append-only sink for reconciliation and baseline-creation records.
pub struct EventLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl EventLog {
    /// Open (creating if needed) the log for appending.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, MonitorError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| MonitorError::LogUnavailable {
                path: path.clone(),
                source,
            })?;
        Ok(EventLog {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one classified event.
    pub fn append(&self, event: &AnomalyEvent) -> Result<(), MonitorError> {
        self.write_line(format_event_line(event))
    }

    /// Append an informational boundary marker or an `ERROR` diagnostic.
    pub fn append_marker(&self, level: LogLevel, message: &str) -> Result<(), MonitorError> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        self.write_line(format!("[{timestamp}] {}: {message}\n", level.as_str()))
    }

    // One write_all per line on an O_APPEND descriptor: a concurrent reader
    // sees a prefix of the log, never a torn line.
    fn write_line(&self, line: String) -> Result<(), MonitorError> {
        let mut file = self.file.lock();
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}
