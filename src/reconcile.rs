//! Set-based reconciliation between a baseline and the live directory
//! state.

use crate::error::{HashError, MonitorError};
use crate::hasher;
use crate::types::{AnomalyEvent, Baseline, EventKind};
use std::collections::BTreeSet;
use std::path::Path;
use walkdir::WalkDir;

/// A baseline entry that could not be hashed this pass. Excluded from both
/// the verified and the failed counts.
#[derive(Debug)]
pub struct SkippedFile {
    pub name: String,
    pub error: HashError,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Default)]
pub struct Reconciliation {
    /// Classified events: baseline entries in baseline iteration order,
    /// followed by new-file events in directory-scan order.
    pub events: Vec<AnomalyEvent>,
    pub skipped: Vec<SkippedFile>,
}

/// Enumerate regular files directly inside `dir`, non-recursive. Hidden
/// files are not special-cased; subdirectories are not descended into.
pub fn scan_directory(dir: &Path) -> Result<Vec<String>, MonitorError> {
    if !dir.is_dir() {
        return Err(MonitorError::WatchDirMissing(dir.to_path_buf()));
    }
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| MonitorError::Io(e.into()))?;
        if entry.file_type().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

/// Compare `baseline` against the current contents of `dir`.
///
/// Every name in the union of baseline and scan is classified exactly once:
/// baseline-only names as DELETED, names in both as MODIFIED or VERIFIED_OK
/// by digest comparison, scan-only names as UNKNOWN_NEW. A file whose hash
/// cannot be computed is reported as skipped instead.
///
/// An empty baseline means there is nothing to compare against; that is a
/// [`MonitorError::NoBaseline`] precondition failure, not an all-clear.
pub fn reconcile(baseline: &Baseline, dir: &Path) -> Result<Reconciliation, MonitorError> {
    if baseline.is_empty() {
        return Err(MonitorError::NoBaseline);
    }

    let scan_order = scan_directory(dir)?;
    let on_disk: BTreeSet<&str> = scan_order.iter().map(String::as_str).collect();
    let mut result = Reconciliation::default();

    for (name, recorded) in baseline {
        if !on_disk.contains(name.as_str()) {
            result.events.push(AnomalyEvent::now(EventKind::Deleted, name));
            continue;
        }
        match hasher::hash_file(&dir.join(name)) {
            Ok(digest) if digest == *recorded => {
                result.events.push(AnomalyEvent::now(EventKind::VerifiedOk, name));
            }
            Ok(_) => result.events.push(AnomalyEvent::now(EventKind::Modified, name)),
            Err(error) => result.skipped.push(SkippedFile {
                name: name.clone(),
                error,
            }),
        }
    }

    for name in &scan_order {
        if !baseline.contains_key(name) {
            result.events.push(AnomalyEvent::now(EventKind::UnknownNew, name));
        }
    }

    Ok(result)
}
