//! Orchestrates baseline creation and integrity checks over the core
//! pieces: baseline store, hasher, reconciler and event log.

use crate::baseline::{BaselineStore, LoadedBaseline};
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::events::{EventLog, LogLevel};
use crate::hasher;
use crate::reconcile::{self, Reconciliation};
use crate::types::{Baseline, EventKind};
use serde::Serialize;
use std::fs;
use tracing::{info, warn};

/// Per-kind counts from one completed check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub verified: usize,
    pub modified: usize,
    pub deleted: usize,
    pub unknown: usize,
    /// Files excluded from this pass because they could not be read.
    pub skipped: usize,
}

impl CheckReport {
    pub fn anomalies(&self) -> usize {
        self.modified + self.deleted + self.unknown
    }

    fn from_reconciliation(outcome: &Reconciliation) -> Self {
        let mut report = CheckReport {
            skipped: outcome.skipped.len(),
            ..CheckReport::default()
        };
        for event in &outcome.events {
            match event.kind {
                EventKind::VerifiedOk => report.verified += 1,
                EventKind::Modified => report.modified += 1,
                EventKind::Deleted => report.deleted += 1,
                EventKind::UnknownNew => report.unknown += 1,
            }
        }
        report
    }
}

/// What a single monitor tick did.
#[derive(Debug)]
pub enum RunOutcome {
    BaselineCreated(usize),
    Checked(CheckReport),
}

/// Ties the core components together for one monitored directory.
pub struct IntegrityMonitor {
    config: MonitorConfig,
    store: BaselineStore,
    log: EventLog,
}

impl IntegrityMonitor {
    /// Open the event log and bind the baseline store. The log handle
    /// lives as long as the monitor; it is never reconfigured.
    pub fn new(config: MonitorConfig) -> Result<Self, MonitorError> {
        let store = BaselineStore::new(&config.baseline_path);
        let log = EventLog::open(&config.event_log)?;
        Ok(IntegrityMonitor { config, store, log })
    }

    pub fn baseline_store(&self) -> &BaselineStore {
        &self.store
    }

    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    /// Build the baseline from the directory's current contents and
    /// atomically replace the stored one. Creates the monitored directory
    /// if it does not exist yet. Unreadable files are skipped with a
    /// diagnostic rather than aborting the build.
    pub fn create_baseline(&self) -> Result<usize, MonitorError> {
        fs::create_dir_all(&self.config.watch_dir)?;
        info!(dir = %self.config.watch_dir.display(), "building baseline");

        let names = reconcile::scan_directory(&self.config.watch_dir)?;
        if names.is_empty() {
            warn!(
                dir = %self.config.watch_dir.display(),
                "monitored directory is empty; baseline will be empty"
            );
        }
        let mut baseline = Baseline::new();
        for name in names {
            match hasher::hash_file(&self.config.watch_dir.join(&name)) {
                Ok(digest) => {
                    baseline.insert(name, digest);
                }
                Err(error) => {
                    self.log.append_marker(
                        LogLevel::Error,
                        &format!("Cannot hash \"{name}\" while building baseline: {error}."),
                    )?;
                }
            }
        }
        self.store.save(&baseline)?;
        self.log.append_marker(
            LogLevel::Info,
            &format!(
                "Baseline with {} entries written to \"{}\".",
                baseline.len(),
                self.store.path().display()
            ),
        )?;
        Ok(baseline.len())
    }

    /// One reconciliation pass against the stored baseline.
    ///
    /// Distinct outcomes: missing watch directory, missing or empty
    /// baseline ([`MonitorError::NoBaseline`]), corrupt baseline
    /// ([`MonitorError::BaselineUnusable`], never silently compared
    /// against an empty set). The baseline itself is never rewritten here.
    pub fn run_check(&self) -> Result<CheckReport, MonitorError> {
        if !self.config.watch_dir.is_dir() {
            self.log.append_marker(
                LogLevel::Error,
                &format!(
                    "Monitored directory \"{}\" not found; check aborted.",
                    self.config.watch_dir.display()
                ),
            )?;
            return Err(MonitorError::WatchDirMissing(self.config.watch_dir.clone()));
        }

        self.log
            .append_marker(LogLevel::Info, "--- integrity check started ---")?;

        let baseline = match self.store.load() {
            LoadedBaseline::Loaded(baseline) if !baseline.is_empty() => baseline,
            LoadedBaseline::Loaded(_) | LoadedBaseline::Missing => {
                self.log.append_marker(
                    LogLevel::Info,
                    &format!(
                        "No baseline available at \"{}\"; create one before checking.",
                        self.store.path().display()
                    ),
                )?;
                return Err(MonitorError::NoBaseline);
            }
            LoadedBaseline::Corrupt { reason } => {
                self.log.append_marker(
                    LogLevel::Error,
                    &format!(
                        "Baseline file \"{}\" is unusable: {reason}. Re-create the baseline to resume checks.",
                        self.store.path().display()
                    ),
                )?;
                return Err(MonitorError::BaselineUnusable {
                    path: self.store.path().to_path_buf(),
                    reason,
                });
            }
        };

        let outcome = reconcile::reconcile(&baseline, &self.config.watch_dir)?;
        for event in &outcome.events {
            self.log.append(event)?;
        }
        for skipped in &outcome.skipped {
            self.log.append_marker(
                LogLevel::Error,
                &format!(
                    "Cannot read file \"{}\": {}; excluded from this pass.",
                    skipped.name, skipped.error
                ),
            )?;
        }
        self.log
            .append_marker(LogLevel::Info, "--- integrity check completed ---")?;

        let report = CheckReport::from_reconciliation(&outcome);
        info!(
            verified = report.verified,
            modified = report.modified,
            deleted = report.deleted,
            unknown = report.unknown,
            skipped = report.skipped,
            "integrity check completed"
        );
        Ok(report)
    }

    /// First run builds the baseline; subsequent runs check against it.
    pub fn run_once(&self) -> Result<RunOutcome, MonitorError> {
        if self.store.exists() {
            self.run_check().map(RunOutcome::Checked)
        } else {
            self.create_baseline().map(RunOutcome::BaselineCreated)
        }
    }
}
