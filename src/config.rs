//! Runtime configuration: defaults, an optional config file, and a
//! `VIGIL_*` environment overlay, merged in that precedence order.

use crate::error::MonitorError;
use crate::logging::LoggingConfig;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file consulted when none is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "vigil.toml";

/// Monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Directory whose direct children are monitored.
    #[serde(default = "default_watch_dir")]
    pub watch_dir: PathBuf,

    /// Persisted baseline mapping (JSON).
    #[serde(default = "default_baseline_path")]
    pub baseline_path: PathBuf,

    /// Append-only event log, the durable audit trail.
    #[serde(default = "default_event_log")]
    pub event_log: PathBuf,

    /// Seconds between periodic checks in monitor mode.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Bind address for the read-only dashboard.
    #[serde(default = "default_dashboard_bind")]
    pub dashboard_bind: String,

    /// Diagnostic logging (distinct from the event log).
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_watch_dir() -> PathBuf {
    PathBuf::from("./secure_files")
}

fn default_baseline_path() -> PathBuf {
    PathBuf::from("baseline.json")
}

fn default_event_log() -> PathBuf {
    PathBuf::from("integrity.log")
}

fn default_interval_secs() -> u64 {
    30
}

fn default_dashboard_bind() -> String {
    "127.0.0.1:5000".to_string()
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            watch_dir: default_watch_dir(),
            baseline_path: default_baseline_path(),
            event_log: default_event_log(),
            interval_secs: default_interval_secs(),
            dashboard_bind: default_dashboard_bind(),
            logging: LoggingConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration.
    ///
    /// Precedence (lowest to highest): built-in defaults, `vigil.toml`
    /// (or the explicit file, which must exist), `VIGIL_*` environment
    /// variables (`__` separates nested keys, e.g. `VIGIL_LOGGING__LEVEL`).
    pub fn load(explicit_file: Option<&Path>) -> Result<Self, MonitorError> {
        let mut builder = Config::builder();
        match explicit_file {
            Some(path) => {
                let path_str = path.to_str().ok_or_else(|| {
                    MonitorError::Config(format!("config path {path:?} is not valid UTF-8"))
                })?;
                builder = builder.add_source(File::new(path_str, FileFormat::Toml));
            }
            None => {
                builder = builder
                    .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false));
            }
        }
        builder = builder.add_source(
            Environment::with_prefix("VIGIL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let merged = builder
            .build()
            .map_err(|e| MonitorError::Config(e.to_string()))?;
        merged
            .try_deserialize()
            .map_err(|e| MonitorError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = MonitorConfig::default();
        assert_eq!(config.watch_dir, PathBuf::from("./secure_files"));
        assert_eq!(config.baseline_path, PathBuf::from("baseline.json"));
        assert_eq!(config.event_log, PathBuf::from("integrity.log"));
        assert_eq!(config.interval_secs, 30);
        assert_eq!(config.dashboard_bind, "127.0.0.1:5000");
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("vigil.toml");
        fs::write(
            &path,
            "watch_dir = \"/srv/monitored\"\ninterval_secs = 5\n",
        )
        .unwrap();

        let config = MonitorConfig::load(Some(&path)).unwrap();
        assert_eq!(config.watch_dir, PathBuf::from("/srv/monitored"));
        assert_eq!(config.interval_secs, 5);
        // Untouched keys keep their defaults.
        assert_eq!(config.baseline_path, PathBuf::from("baseline.json"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("nope.toml");

        assert!(matches!(
            MonitorConfig::load(Some(&missing)),
            Err(MonitorError::Config(_))
        ));
    }

    #[test]
    fn environment_overrides_file_values() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("vigil.toml");
        fs::write(&path, "dashboard_bind = \"127.0.0.1:8000\"\n").unwrap();

        std::env::set_var("VIGIL_DASHBOARD_BIND", "0.0.0.0:9000");
        let result = MonitorConfig::load(Some(&path));
        std::env::remove_var("VIGIL_DASHBOARD_BIND");

        assert_eq!(result.unwrap().dashboard_bind, "0.0.0.0:9000");
    }
}
