//! CLI Tooling
//!
//! Command-line surface over the integrity monitor: baseline management,
//! one-shot checks, log reports, and the long-running monitor and
//! dashboard modes. The long-running modes communicate only through the
//! durable baseline and event log, never through shared in-memory state.

use crate::config::MonitorConfig;
use crate::dashboard::DashboardServer;
use crate::error::MonitorError;
use crate::monitor::{IntegrityMonitor, RunOutcome};
use crate::{aggregate, report};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

/// Vigil - baseline-driven file integrity monitoring
#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Detects unauthorized file changes against a recorded baseline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (default: vigil.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the baseline from the monitored directory's current contents
    Baseline {
        /// Overwrite an existing baseline (re-baselining is deliberate)
        #[arg(long)]
        force: bool,
    },
    /// Run a single integrity check against the baseline
    Check,
    /// Summarize the event log
    Report {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Run periodic checks until interrupted
    Monitor {
        /// Seconds between checks (overrides config)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Serve the read-only dashboard
    Dashboard {
        /// Bind address (overrides config)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run periodic checks and the dashboard together
    Start {
        /// Seconds between checks (overrides config)
        #[arg(long)]
        interval: Option<u64>,
        /// Bind address (overrides config)
        #[arg(long)]
        bind: Option<String>,
    },
}

/// CLI context holding the resolved configuration.
pub struct CliContext {
    config: MonitorConfig,
}

impl CliContext {
    pub fn new(
        config_path: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Result<Self, MonitorError> {
        let mut config = MonitorConfig::load(config_path.as_deref())?;
        if let Some(level) = log_level {
            config.logging.level = level;
        }
        Ok(CliContext { config })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Execute a CLI command.
    pub fn execute(&self, command: &Commands) -> Result<String, MonitorError> {
        match command {
            Commands::Baseline { force } => self.handle_baseline(*force),
            Commands::Check => self.handle_check(),
            Commands::Report { format } => self.handle_report(format),
            Commands::Monitor { interval } => {
                let runtime = tokio::runtime::Runtime::new()?;
                runtime.block_on(self.run_monitor(interval.unwrap_or(self.config.interval_secs)))
            }
            Commands::Dashboard { bind } => {
                let runtime = tokio::runtime::Runtime::new()?;
                runtime.block_on(self.run_dashboard(self.resolve_bind(bind.as_deref())))
            }
            Commands::Start { interval, bind } => {
                let runtime = tokio::runtime::Runtime::new()?;
                runtime.block_on(self.run_start(
                    interval.unwrap_or(self.config.interval_secs),
                    self.resolve_bind(bind.as_deref()),
                ))
            }
        }
    }

    fn resolve_bind(&self, override_bind: Option<&str>) -> String {
        override_bind
            .map(str::to_string)
            .unwrap_or_else(|| self.config.dashboard_bind.clone())
    }

    fn handle_baseline(&self, force: bool) -> Result<String, MonitorError> {
        let monitor = IntegrityMonitor::new(self.config.clone())?;
        if monitor.baseline_store().exists() && !force {
            return Err(MonitorError::BaselineExists(
                monitor.baseline_store().path().to_path_buf(),
            ));
        }
        let entries = monitor.create_baseline()?;
        Ok(format!(
            "Baseline with {entries} entries written to \"{}\".",
            monitor.baseline_store().path().display()
        ))
    }

    fn handle_check(&self) -> Result<String, MonitorError> {
        let monitor = IntegrityMonitor::new(self.config.clone())?;
        let check = monitor.run_check()?;
        Ok(report::format_check_report_text(&check))
    }

    fn handle_report(&self, format: &str) -> Result<String, MonitorError> {
        let summary = aggregate::summarize_log(&self.config.event_log)?;
        if format == "json" {
            serde_json::to_string_pretty(&summary).map_err(MonitorError::Encode)
        } else {
            Ok(report::format_summary_text(&summary))
        }
    }

    /// Periodic checks until Ctrl-C. Per-tick failures are logged and the
    /// loop continues; the next tick may succeed.
    async fn run_monitor(&self, interval_secs: u64) -> Result<String, MonitorError> {
        let monitor = IntegrityMonitor::new(self.config.clone())?;
        info!(
            interval_secs,
            dir = %self.config.watch_dir.display(),
            "periodic monitoring started"
        );
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        loop {
            tokio::select! {
                _ = ticker.tick() => run_tick(&monitor),
                _ = tokio::signal::ctrl_c() => break,
            }
        }
        Ok("Monitoring stopped.".to_string())
    }

    async fn run_dashboard(&self, bind: String) -> Result<String, MonitorError> {
        let server = DashboardServer::bind(&bind, self.config.event_log.clone()).await?;
        tokio::select! {
            result = server.serve() => result.map(|()| String::new()),
            _ = tokio::signal::ctrl_c() => Ok("Dashboard stopped.".to_string()),
        }
    }

    async fn run_start(&self, interval_secs: u64, bind: String) -> Result<String, MonitorError> {
        let server = DashboardServer::bind(&bind, self.config.event_log.clone()).await?;
        tokio::select! {
            result = self.run_monitor(interval_secs) => result,
            result = server.serve() => result.map(|()| "Dashboard stopped.".to_string()),
        }
    }
}

fn run_tick(monitor: &IntegrityMonitor) {
    match monitor.run_once() {
        Ok(RunOutcome::BaselineCreated(entries)) => {
            info!(entries, "baseline created; subsequent ticks will check against it");
        }
        Ok(RunOutcome::Checked(check)) => {
            if check.anomalies() > 0 {
                warn!(anomalies = check.anomalies(), "anomalies detected this tick");
            }
        }
        // Contained: a missing directory or unusable baseline this tick
        // does not stop the loop.
        Err(e) => error!("integrity check failed: {e}"),
    }
}
