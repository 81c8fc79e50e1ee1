//! Baseline store: the durable mapping of filename to content digest.
//!
//! The mapping is replaced only by an explicit `save`; a reconciliation run
//! never writes through this store. Re-baselining after a detected change
//! is a deliberate operator action.

use crate::error::MonitorError;
use crate::types::Baseline;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Result of reading the persisted baseline. Absence and corruption are
/// states, not process-halting failures; the caller decides how each
/// affects the pass.
#[derive(Debug)]
pub enum LoadedBaseline {
    /// No baseline has been created yet.
    Missing,
    /// Storage exists but cannot be read or parsed.
    Corrupt { reason: String },
    Loaded(Baseline),
}

/// Owns the persisted baseline file.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        BaselineStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the persisted mapping. Never fails the calling process: a
    /// missing file is `Missing`, unreadable or unparseable content is
    /// `Corrupt`.
    pub fn load(&self) -> LoadedBaseline {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return LoadedBaseline::Missing,
            Err(e) => {
                error!(path = %self.path.display(), "failed to read baseline: {e}");
                return LoadedBaseline::Corrupt {
                    reason: e.to_string(),
                };
            }
        };
        match serde_json::from_str::<Baseline>(&raw) {
            Ok(baseline) => LoadedBaseline::Loaded(baseline),
            Err(e) => {
                error!(path = %self.path.display(), "baseline does not parse: {e}");
                LoadedBaseline::Corrupt {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Serialize the full mapping and atomically replace the previous file.
    ///
    /// The new content is written to a sibling temp file and renamed over
    /// the old one, so a concurrent `load` observes either the prior
    /// baseline or the new one, never a partial write.
    pub fn save(&self, baseline: &Baseline) -> Result<(), MonitorError> {
        let serialized = serde_json::to_string_pretty(baseline)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(serialized.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        info!(path = %self.path.display(), entries = baseline.len(), "baseline saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_baseline() -> Baseline {
        let mut baseline = BTreeMap::new();
        baseline.insert("a.txt".to_string(), "aa".repeat(32));
        baseline.insert("b.txt".to_string(), "bb".repeat(32));
        baseline
    }

    #[test]
    fn missing_storage_loads_as_missing() {
        let temp = tempfile::tempdir().unwrap();
        let store = BaselineStore::new(temp.path().join("baseline.json"));

        assert!(matches!(store.load(), LoadedBaseline::Missing));
        assert!(!store.exists());
    }

    #[test]
    fn corrupt_storage_loads_as_corrupt_not_a_crash() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("baseline.json");
        fs::write(&path, "{ this is not json").unwrap();
        let store = BaselineStore::new(&path);

        assert!(matches!(store.load(), LoadedBaseline::Corrupt { .. }));
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = tempfile::tempdir().unwrap();
        let store = BaselineStore::new(temp.path().join("baseline.json"));
        let baseline = sample_baseline();

        store.save(&baseline).unwrap();
        match store.load() {
            LoadedBaseline::Loaded(loaded) => assert_eq!(loaded, baseline),
            other => panic!("expected Loaded, got {:?}", other),
        }
    }

    #[test]
    fn save_replaces_prior_content_and_leaves_no_temp_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("baseline.json");
        let store = BaselineStore::new(&path);

        store.save(&sample_baseline()).unwrap();
        let mut replacement = Baseline::new();
        replacement.insert("only.txt".to_string(), "cc".repeat(32));
        store.save(&replacement).unwrap();

        match store.load() {
            LoadedBaseline::Loaded(loaded) => assert_eq!(loaded, replacement),
            other => panic!("expected Loaded, got {:?}", other),
        }
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn empty_baseline_round_trips() {
        let temp = tempfile::tempdir().unwrap();
        let store = BaselineStore::new(temp.path().join("baseline.json"));

        store.save(&Baseline::new()).unwrap();
        match store.load() {
            LoadedBaseline::Loaded(loaded) => assert!(loaded.is_empty()),
            other => panic!("expected Loaded, got {:?}", other),
        }
    }
}
