//! Core types for baseline-driven integrity monitoring.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Hex-encoded 256-bit content digest (64 lowercase hex characters).
pub type Digest = String;

/// Baseline: the last trusted mapping of monitored filenames to digests.
///
/// Ordered so reconciliation and serialization walk entries deterministically.
pub type Baseline = BTreeMap<String, Digest>;

/// Timestamp format used throughout the event log. Fixed-width and
/// zero-padded, so textual ordering matches chronological ordering; the
/// aggregator still parses to a real time value before comparing.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Event severity, mirrored into the log line level field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one observed file against the baseline.
///
/// The four kinds are mutually exclusive and collectively exhaustive over
/// the union of baseline names and scan names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    VerifiedOk,
    Modified,
    Deleted,
    UnknownNew,
}

impl EventKind {
    /// Severity carried into the log line level field.
    pub fn severity(&self) -> Severity {
        match self {
            EventKind::VerifiedOk => Severity::Info,
            EventKind::Modified | EventKind::Deleted => Severity::Warning,
            EventKind::UnknownNew => Severity::Critical,
        }
    }

    /// Stable machine-readable tag carried in each log line, so the
    /// aggregator parses a tag rather than pattern-matching prose.
    pub fn tag(&self) -> &'static str {
        match self {
            EventKind::VerifiedOk => "verified",
            EventKind::Modified => "modified",
            EventKind::Deleted => "deleted",
            EventKind::UnknownNew => "unknown",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "verified" => Some(EventKind::VerifiedOk),
            "modified" => Some(EventKind::Modified),
            "deleted" => Some(EventKind::Deleted),
            "unknown" => Some(EventKind::UnknownNew),
            _ => None,
        }
    }

    /// Human-readable message for one classified file.
    pub fn describe(&self, filename: &str) -> String {
        match self {
            EventKind::VerifiedOk => format!("File \"{filename}\" verified OK."),
            EventKind::Modified => {
                format!("Integrity of file \"{filename}\" failed: digest does not match baseline.")
            }
            EventKind::Deleted => {
                format!("File \"{filename}\" has been deleted from the monitored directory.")
            }
            EventKind::UnknownNew => format!("Unrecognized new file detected: \"{filename}\"."),
        }
    }
}

/// One classified reconciliation outcome. Immutable once appended to the
/// event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnomalyEvent {
    pub timestamp: NaiveDateTime,
    pub severity: Severity,
    pub kind: EventKind,
    pub filename: String,
    pub message: String,
}

impl AnomalyEvent {
    /// Build an event stamped with the current local time.
    pub fn now(kind: EventKind, filename: &str) -> Self {
        Self::at(Local::now().naive_local(), kind, filename)
    }

    /// Build an event with an explicit timestamp.
    pub fn at(timestamp: NaiveDateTime, kind: EventKind, filename: &str) -> Self {
        AnomalyEvent {
            timestamp,
            severity: kind.severity(),
            kind,
            filename: filename.to_string(),
            message: kind.describe(filename),
        }
    }

    /// Any classification other than VERIFIED_OK is an anomaly.
    pub fn is_anomaly(&self) -> bool {
        self.kind != EventKind::VerifiedOk
    }
}

/// Summary over the full event history. Always recomputed on demand from
/// the event log, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub verified_ok: u64,
    /// Modified and deleted files combined.
    pub integrity_failed: u64,
    pub unknown_files: u64,
    pub last_anomaly_time: Option<NaiveDateTime>,
}

impl Summary {
    pub fn total_anomalies(&self) -> u64 {
        self.integrity_failed + self.unknown_files
    }
}
