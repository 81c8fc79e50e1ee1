//! Format check results and log summaries as text.

use crate::monitor::CheckReport;
use crate::types::{Summary, TIMESTAMP_FORMAT};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline. Respects NO_COLOR and TTY.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Format the aggregated log summary as human-readable text.
pub fn format_summary_text(summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Integrity Summary")));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Metric", "Count"]);
    table.add_row(vec![
        "Files verified OK".to_string(),
        summary.verified_ok.to_string(),
    ]);
    table.add_row(vec![
        "Modified / deleted files".to_string(),
        summary.integrity_failed.to_string(),
    ]);
    table.add_row(vec![
        "Unrecognized new files".to_string(),
        summary.unknown_files.to_string(),
    ]);
    out.push_str(&format!("{}\n\n", table));

    match summary.last_anomaly_time {
        Some(ts) => out.push_str(&format!(
            "Last anomaly detected: {}\n",
            ts.format(TIMESTAMP_FORMAT)
        )),
        None => out.push_str("No anomalies recorded.\n"),
    }
    out
}

/// Format one check's outcome as human-readable text.
pub fn format_check_report_text(report: &CheckReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Check Result")));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Classification", "Files"]);
    table.add_row(vec!["Verified OK".to_string(), report.verified.to_string()]);
    table.add_row(vec!["Modified".to_string(), report.modified.to_string()]);
    table.add_row(vec!["Deleted".to_string(), report.deleted.to_string()]);
    table.add_row(vec!["Unknown new".to_string(), report.unknown.to_string()]);
    table.add_row(vec!["Skipped (unreadable)".to_string(), report.skipped.to_string()]);
    out.push_str(&format!("{}\n\n", table));

    if report.anomalies() == 0 {
        out.push_str("All monitored files verified OK.\n");
    } else {
        out.push_str(&format!("{} anomalies detected.\n", report.anomalies()));
    }
    out
}
