//! Execution report generation.
//!
//! This module renders run statistics as the plain-text execution report
//! or as a JSON document.

use crate::models::{FailureDetail, HostId, ReportMetadata, RunStatistics};
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

const TITLE: &str = "ANSIBLE EXECUTION REPORT";
const TITLE_RULE_WIDTH: usize = 50;
const SECTION_RULE_WIDTH: usize = 30;

/// Render the text report and the overall verdict.
///
/// The verdict is `true` when no task failed.
pub fn report(stats: &RunStatistics, metadata: &ReportMetadata) -> (String, bool) {
    (generate_text_report(stats, metadata), stats.is_success())
}

/// Generate the complete text report.
pub fn generate_text_report(stats: &RunStatistics, metadata: &ReportMetadata) -> String {
    let mut output = String::new();

    output.push_str(&generate_header(metadata));
    output.push_str(&generate_statistics_section(stats));

    if stats.failed_tasks > 0 {
        output.push_str(&generate_failures_section(&stats.failures));
    }

    if let Some(rate) = stats.success_rate() {
        output.push_str(&format!("Success rate: {:.1}%\n", rate));
    }

    output
}

fn generate_header(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str(TITLE);
    section.push('\n');
    section.push_str(&"=".repeat(TITLE_RULE_WIDTH));
    section.push('\n');
    section.push_str(&format!(
        "Timestamp: {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    section.push_str(&format!("Log file: {}\n", metadata.log_file));
    section.push('\n');

    section
}

fn generate_statistics_section(stats: &RunStatistics) -> String {
    let mut section = String::new();

    section.push_str("EXECUTION STATISTICS:\n");
    section.push_str(&"-".repeat(SECTION_RULE_WIDTH));
    section.push('\n');
    section.push_str(&format!("Total tasks: {}\n", stats.total_tasks));
    section.push_str(&format!("Successful tasks: {}\n", stats.ok_tasks));
    section.push_str(&format!("Changed tasks: {}\n", stats.changed_tasks));
    section.push_str(&format!("Failed tasks: {}\n", stats.failed_tasks));
    section.push_str(&format!("Skipped tasks: {}\n", stats.skipped_tasks));
    section.push_str(&format!("Managed hosts: {}\n", stats.host_count()));
    section.push('\n');

    section
}

fn generate_failures_section(failures: &[FailureDetail]) -> String {
    let mut section = String::new();

    section.push_str("FAILED TASKS DETAILS:\n");
    section.push_str(&"-".repeat(SECTION_RULE_WIDTH));
    section.push('\n');

    for failure in failures {
        section.push_str(&format!("Task: {}\n", failure.task));
        section.push_str(&format!("Host: {}\n", failure.host));
        section.push_str(&format!("Error: {}\n", failure.error));
        section.push('\n');
    }

    section
}

/// JSON view of a report.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    metadata: &'a ReportMetadata,
    total_tasks: usize,
    ok_tasks: usize,
    changed_tasks: usize,
    failed_tasks: usize,
    skipped_tasks: usize,
    managed_hosts: usize,
    hosts: &'a std::collections::BTreeSet<HostId>,
    failures: &'a [FailureDetail],
    #[serde(skip_serializing_if = "Option::is_none")]
    success_rate: Option<f64>,
    success: bool,
}

/// Generate a JSON report.
pub fn generate_json_report(stats: &RunStatistics, metadata: &ReportMetadata) -> Result<String> {
    let report = JsonReport {
        metadata,
        total_tasks: stats.total_tasks,
        ok_tasks: stats.ok_tasks,
        changed_tasks: stats.changed_tasks,
        failed_tasks: stats.failed_tasks,
        skipped_tasks: stats.skipped_tasks,
        managed_hosts: stats.host_count(),
        hosts: &stats.hosts,
        failures: &stats.failures,
        success_rate: stats.rounded_success_rate(),
        success: stats.is_success(),
    };

    serde_json::to_string_pretty(&report).map_err(Into::into)
}

/// Write a rendered report to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}
