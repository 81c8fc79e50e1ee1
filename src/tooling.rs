//! Command-line tooling for the integrity monitor.

pub mod cli;
