//! Log aggregation: reduces the event history to summary statistics.
//!
//! The summary is always a pure reduction over the full event stream.
//! Classification prefers the machine-readable kind tag each event line
//! carries; untagged lines fall back to the fixed message vocabulary.
//! Lines outside the `[timestamp] LEVEL: message` grammar (boundary
//! markers, ERROR diagnostics, blanks) are skipped, never fatal.

use crate::error::MonitorError;
use crate::types::{EventKind, Summary, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Levels recognized by the anomaly-line grammar. `ERROR` is deliberately
/// absent: diagnostics never feed the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineLevel {
    Info,
    Warning,
    Critical,
}

#[derive(Debug)]
struct ParsedLine<'a> {
    timestamp: NaiveDateTime,
    level: LineLevel,
    message: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Classification {
    Verified,
    IntegrityFailed,
    Unknown,
}

/// Reduce the event log at `path` to a summary.
///
/// An unopenable log is [`MonitorError::LogUnavailable`], which callers
/// must keep distinct from an empty log: zero and "unavailable" are never
/// conflated.
pub fn summarize_log(path: &Path) -> Result<Summary, MonitorError> {
    let file = File::open(path).map_err(|source| MonitorError::LogUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let mut summary = Summary::default();
    for line in reader.lines() {
        let line = line.map_err(|source| MonitorError::LogUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        observe_line(&mut summary, &line);
    }
    Ok(summary)
}

/// Reduce an in-memory sequence of log lines. Exposed for callers that
/// already hold the stream.
pub fn summarize_lines<'a, I>(lines: I) -> Summary
where
    I: IntoIterator<Item = &'a str>,
{
    let mut summary = Summary::default();
    for line in lines {
        observe_line(&mut summary, line);
    }
    summary
}

/// Fold one log line into the summary.
fn observe_line(summary: &mut Summary, line: &str) {
    let Some(parsed) = parse_line(line) else {
        return;
    };
    match parsed.level {
        LineLevel::Info => {
            if classify(parsed.message) == Some(Classification::Verified) {
                summary.verified_ok += 1;
            }
        }
        LineLevel::Warning | LineLevel::Critical => {
            // Chronological max over parsed time values, not the line seen
            // last and not a string comparison.
            summary.last_anomaly_time = Some(match summary.last_anomaly_time {
                Some(prev) => prev.max(parsed.timestamp),
                None => parsed.timestamp,
            });
            match classify(parsed.message) {
                Some(Classification::IntegrityFailed) => summary.integrity_failed += 1,
                Some(Classification::Unknown) => summary.unknown_files += 1,
                _ => {}
            }
        }
    }
}

fn parse_line(line: &str) -> Option<ParsedLine<'_>> {
    let rest = line.strip_prefix('[')?;
    let (raw_timestamp, rest) = rest.split_once("] ")?;
    let timestamp = NaiveDateTime::parse_from_str(raw_timestamp, TIMESTAMP_FORMAT).ok()?;
    let (raw_level, message) = rest.split_once(": ")?;
    let level = match raw_level {
        "INFO" => LineLevel::Info,
        "WARNING" => LineLevel::Warning,
        "CRITICAL" => LineLevel::Critical,
        _ => return None,
    };
    Some(ParsedLine {
        timestamp,
        level,
        message,
    })
}

/// Map a message to a counter: the leading kind tag when present,
/// otherwise the fixed vocabulary.
fn classify(message: &str) -> Option<Classification> {
    if let Some(rest) = message.strip_prefix('[') {
        if let Some((tag, _)) = rest.split_once(']') {
            if let Some(kind) = EventKind::from_tag(tag) {
                return Some(match kind {
                    EventKind::VerifiedOk => Classification::Verified,
                    EventKind::Modified | EventKind::Deleted => Classification::IntegrityFailed,
                    EventKind::UnknownNew => Classification::Unknown,
                });
            }
        }
    }
    let lowered = message.to_lowercase();
    if lowered.contains("failed") || lowered.contains("deleted") {
        return Some(Classification::IntegrityFailed);
    }
    if lowered.contains("unrecognized new file") {
        return Some(Classification::Unknown);
    }
    if lowered.contains("verified") {
        return Some(Classification::Verified);
    }
    None
}
