//! Vigil: Baseline-Driven File Integrity Monitoring
//!
//! Detects unauthorized changes to a monitored directory by comparing file
//! content digests against a recorded baseline, appending classified events
//! to a durable log, and aggregating that log into summary statistics.

pub mod aggregate;
pub mod baseline;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod hasher;
pub mod logging;
pub mod monitor;
pub mod reconcile;
pub mod report;
pub mod tooling;
pub mod types;
