//! End-to-end behavior of baseline creation and integrity checks.

use std::fs;
use tempfile::TempDir;
use vigil::config::MonitorConfig;
use vigil::error::MonitorError;
use vigil::monitor::{IntegrityMonitor, RunOutcome};

fn test_config(temp: &TempDir) -> MonitorConfig {
    MonitorConfig {
        watch_dir: temp.path().join("secure"),
        baseline_path: temp.path().join("baseline.json"),
        event_log: temp.path().join("integrity.log"),
        ..MonitorConfig::default()
    }
}

fn populate(temp: &TempDir, files: &[(&str, &str)]) {
    let dir = temp.path().join("secure");
    fs::create_dir_all(&dir).unwrap();
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

#[test]
fn first_run_creates_baseline_then_verifies() {
    let temp = TempDir::new().unwrap();
    populate(&temp, &[("a.txt", "alpha"), ("b.txt", "beta")]);
    let monitor = IntegrityMonitor::new(test_config(&temp)).unwrap();

    match monitor.run_once().unwrap() {
        RunOutcome::BaselineCreated(entries) => assert_eq!(entries, 2),
        other => panic!("expected BaselineCreated, got {:?}", other),
    }

    match monitor.run_once().unwrap() {
        RunOutcome::Checked(check) => {
            assert_eq!(check.verified, 2);
            assert_eq!(check.anomalies(), 0);
        }
        other => panic!("expected Checked, got {:?}", other),
    }
}

#[test]
fn unchanged_file_and_new_file_are_reported() {
    let temp = TempDir::new().unwrap();
    populate(&temp, &[("a.txt", "alpha")]);
    let monitor = IntegrityMonitor::new(test_config(&temp)).unwrap();
    monitor.create_baseline().unwrap();

    fs::write(temp.path().join("secure").join("b.txt"), "intruder").unwrap();

    let check = monitor.run_check().unwrap();
    assert_eq!(check.verified, 1);
    assert_eq!(check.unknown, 1);
    assert_eq!(check.modified, 0);
    assert_eq!(check.deleted, 0);
}

#[test]
fn modified_and_deleted_files_are_reported() {
    let temp = TempDir::new().unwrap();
    populate(&temp, &[("a.txt", "alpha"), ("b.txt", "beta")]);
    let monitor = IntegrityMonitor::new(test_config(&temp)).unwrap();
    monitor.create_baseline().unwrap();

    fs::write(temp.path().join("secure").join("a.txt"), "tampered").unwrap();
    fs::remove_file(temp.path().join("secure").join("b.txt")).unwrap();

    let check = monitor.run_check().unwrap();
    assert_eq!(check.modified, 1);
    assert_eq!(check.deleted, 1);
    assert_eq!(check.verified, 0);
    assert_eq!(check.unknown, 0);
}

#[test]
fn empty_baseline_signals_no_baseline_not_all_clear() {
    let temp = TempDir::new().unwrap();
    // Monitored directory exists and has content, but the baseline was
    // built over an empty directory.
    let monitor = IntegrityMonitor::new(test_config(&temp)).unwrap();
    monitor.create_baseline().unwrap();
    populate(&temp, &[("a.txt", "alpha")]);

    assert!(matches!(
        monitor.run_check(),
        Err(MonitorError::NoBaseline)
    ));
}

#[test]
fn missing_baseline_signals_no_baseline() {
    let temp = TempDir::new().unwrap();
    populate(&temp, &[("a.txt", "alpha")]);
    let monitor = IntegrityMonitor::new(test_config(&temp)).unwrap();

    assert!(matches!(
        monitor.run_check(),
        Err(MonitorError::NoBaseline)
    ));
}

#[test]
fn corrupt_baseline_aborts_with_a_distinct_signal_and_an_error_event() {
    let temp = TempDir::new().unwrap();
    populate(&temp, &[("a.txt", "alpha")]);
    let config = test_config(&temp);
    fs::write(&config.baseline_path, "{ not valid json").unwrap();
    let monitor = IntegrityMonitor::new(config.clone()).unwrap();

    assert!(matches!(
        monitor.run_check(),
        Err(MonitorError::BaselineUnusable { .. })
    ));

    let log = fs::read_to_string(&config.event_log).unwrap();
    assert!(log.lines().any(|line| line.contains("ERROR") && line.contains("unusable")));

    // The diagnostic is invisible to the aggregator: no mass false
    // positives, no anomaly timestamp.
    let summary = vigil::aggregate::summarize_log(&config.event_log).unwrap();
    assert_eq!(summary.integrity_failed, 0);
    assert_eq!(summary.unknown_files, 0);
    assert_eq!(summary.last_anomaly_time, None);
}

#[test]
fn missing_watch_directory_is_a_distinct_error() {
    let temp = TempDir::new().unwrap();
    let monitor = IntegrityMonitor::new(test_config(&temp)).unwrap();

    assert!(matches!(
        monitor.run_check(),
        Err(MonitorError::WatchDirMissing(_))
    ));
}

#[test]
fn checks_never_rewrite_the_baseline() {
    let temp = TempDir::new().unwrap();
    populate(&temp, &[("a.txt", "alpha")]);
    let config = test_config(&temp);
    let monitor = IntegrityMonitor::new(config.clone()).unwrap();
    monitor.create_baseline().unwrap();
    let saved = fs::read(&config.baseline_path).unwrap();

    fs::write(temp.path().join("secure").join("a.txt"), "tampered").unwrap();
    let check = monitor.run_check().unwrap();
    assert_eq!(check.modified, 1);

    // Still the modified classification on a second pass, and the stored
    // baseline is byte-identical: re-baselining is an operator action.
    let again = monitor.run_check().unwrap();
    assert_eq!(again.modified, 1);
    assert_eq!(fs::read(&config.baseline_path).unwrap(), saved);
}

#[test]
fn checked_events_land_in_the_log_and_aggregate_back_to_the_same_counts() {
    let temp = TempDir::new().unwrap();
    populate(
        &temp,
        &[("a.txt", "alpha"), ("b.txt", "beta"), ("c.txt", "gamma")],
    );
    let config = test_config(&temp);
    let monitor = IntegrityMonitor::new(config.clone()).unwrap();
    monitor.create_baseline().unwrap();

    let secure = temp.path().join("secure");
    fs::write(secure.join("a.txt"), "tampered").unwrap();
    fs::remove_file(secure.join("b.txt")).unwrap();
    fs::write(secure.join("d.txt"), "new arrival").unwrap();

    let check = monitor.run_check().unwrap();
    assert_eq!(check.modified, 1);
    assert_eq!(check.deleted, 1);
    assert_eq!(check.verified, 1);
    assert_eq!(check.unknown, 1);

    let summary = vigil::aggregate::summarize_log(&config.event_log).unwrap();
    assert_eq!(summary.verified_ok, 1);
    assert_eq!(summary.integrity_failed, 2);
    assert_eq!(summary.unknown_files, 1);
    assert!(summary.last_anomaly_time.is_some());
}
