//! Output formatters for run reports
//!
//! Provides table, JSON and summary output formats.

use anyhow::{Context, Result};
use std::path::Path;

use crate::models::{FailureRecord, RunReport, StepOutcome, TestStatus};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Report formatter
pub struct ReportFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ReportFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format a full run report
    pub fn format_report(&self, report: &RunReport) -> String {
        match self.format {
            OutputFormat::Table => self.format_table(report),
            OutputFormat::Json => serde_json::to_string(report).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Summary => self.format_brief(report),
        }
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.colorize {
            format!("\x1b[{color}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn status_label(&self, status: TestStatus) -> String {
        let label = format!("{} {}", status.symbol(), status);
        match status {
            TestStatus::Pass => self.paint(&label, "32"),
            TestStatus::Skip => self.paint(&label, "33"),
            TestStatus::Fail | TestStatus::Error => self.paint(&label, "31"),
        }
    }

    /// One line per step
    pub fn format_outcome(&self, outcome: &StepOutcome) -> String {
        let code = outcome
            .status_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "---".to_string());
        let mut line = format!(
            "{:2}. {:32} {} {} [{:>6}ms]",
            outcome.number,
            outcome.name,
            self.status_label(outcome.status),
            code,
            outcome.duration_ms
        );
        if let Some(msg) = &outcome.message {
            line.push_str(&format!(" {msg}"));
        }
        if outcome.shape_ok == Some(false) {
            line.push_str(&format!(" {}", self.paint("(shape mismatch)", "33")));
        }
        line
    }

    fn format_table(&self, report: &RunReport) -> String {
        let rule = "=".repeat(60);
        let mut output = String::new();

        output.push_str(&format!("\n{rule}\n"));
        output.push_str("📊 TEST RESULTS\n");
        output.push_str(&format!(
            "Target: {} | Started: {}\n",
            report.base_url,
            report.started_at.format("%Y-%m-%d %H:%M:%S")
        ));
        output.push_str(&format!("{rule}\n"));

        for outcome in &report.outcomes {
            output.push_str(&format!("  {}\n", self.format_outcome(outcome)));
        }

        output.push_str(&format!("{rule}\n"));
        output.push_str(&format!(
            "Tests passed: {}/{}\n",
            report.tests_passed, report.tests_run
        ));
        if report.tests_skipped > 0 {
            output.push_str(&format!("Skipped: {}\n", report.tests_skipped));
        }
        output.push_str(&format!(
            "Success rate: {} | Duration: {}ms\n",
            report.success_rate_text(),
            report.total_duration_ms
        ));

        if !report.failures.is_empty() {
            output.push_str(&format!(
                "\n{}\n",
                self.paint(
                    &format!("❌ FAILED TESTS ({}):", report.failures.len()),
                    "31"
                )
            ));
            for (i, failure) in report.failures.iter().enumerate() {
                output.push_str(&format_failure(i + 1, failure));
            }
        }

        output
    }

    fn format_brief(&self, report: &RunReport) -> String {
        let verdict = if report.is_all_passed() {
            self.paint("✓ PASS", "32")
        } else {
            self.paint("✗ FAIL", "31")
        };
        format!(
            "{verdict} {}/{} passed, {} skipped, {} failed ({}) in {}ms",
            report.tests_passed,
            report.tests_run,
            report.tests_skipped,
            report.failures.len(),
            report.success_rate_text(),
            report.total_duration_ms
        )
    }
}

fn format_failure(index: usize, failure: &FailureRecord) -> String {
    match failure {
        FailureRecord::Error { test, error } => {
            format!("{index}. {test}\n   Error: {error}\n")
        }
        FailureRecord::Mismatch {
            test,
            expected,
            actual,
            response,
        } => {
            let mut out = format!("{index}. {test}\n   Expected: {expected}, Got: {actual}\n");
            if !response.is_empty() {
                out.push_str(&format!("   Response: {response}\n"));
            }
            out
        }
    }
}

/// Write the report as pretty JSON, creating parent directories
pub fn save_report(report: &RunReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let content = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TestRunState;
    use chrono::Local;

    fn sample_report() -> RunReport {
        let mut state = TestRunState::new();
        state.record_pass();
        state.outcomes.push(
            StepOutcome::new(1, "API Health Check", TestStatus::Pass)
                .with_status_code(Some(200))
                .with_duration(42),
        );
        state.record_failure(FailureRecord::mismatch("Invalid Login", 401, 200, "{}"));
        state.outcomes.push(
            StepOutcome::new(5, "Invalid Login", TestStatus::Fail).with_status_code(Some(200)),
        );
        state.record_failure(FailureRecord::error("Get Stats", "Timeout after 10 seconds"));
        state.record_skip();
        state.outcomes.push(
            StepOutcome::new(17, "Change User Password", TestStatus::Skip)
                .with_message("no test_user_id available"),
        );
        RunReport::new("http://localhost:8001/api", Local::now(), 120, state)
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(
            OutputFormat::from_str("json-pretty"),
            Some(OutputFormat::JsonPretty)
        );
        assert_eq!(OutputFormat::from_str("csv"), None);
    }

    #[test]
    fn test_table_report() {
        let text = ReportFormatter::new(OutputFormat::Table)
            .no_color()
            .format_report(&sample_report());

        assert!(text.contains("Tests passed: 1/3"));
        assert!(text.contains("Skipped: 1"));
        assert!(text.contains("Success rate: 33.3%"));
        assert!(text.contains("❌ FAILED TESTS (2):"));
        assert!(text.contains("1. Invalid Login\n   Expected: 401, Got: 200\n   Response: {}"));
        assert!(text.contains("2. Get Stats\n   Error: Timeout after 10 seconds"));
        assert!(text.contains("○ SKIP"));
        assert!(!text.contains("\x1b["));
    }

    #[test]
    fn test_json_report() {
        let text = ReportFormatter::new(OutputFormat::Json).format_report(&sample_report());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["tests_run"], 3);
        assert_eq!(value["failures"][0]["expected"], 401);
        assert_eq!(value["outcomes"][2]["status"], "skip");
    }

    #[test]
    fn test_summary_report() {
        let text = ReportFormatter::new(OutputFormat::Summary)
            .no_color()
            .format_report(&sample_report());
        assert_eq!(
            text,
            "✗ FAIL 1/3 passed, 1 skipped, 2 failed (33.3%) in 120ms"
        );
    }

    #[test]
    fn test_all_skipped_report_shows_no_rate() {
        let mut state = TestRunState::new();
        state.record_skip();
        state.outcomes.push(
            StepOutcome::new(18, "Delete User", TestStatus::Skip)
                .with_message("no test_user_id available"),
        );
        let report = RunReport::new("http://localhost:8001/api", Local::now(), 3, state);

        let table = ReportFormatter::new(OutputFormat::Table)
            .no_color()
            .format_report(&report);
        assert!(table.contains("Tests passed: 0/0"));
        assert!(table.contains("Success rate: n/a"));

        let brief = ReportFormatter::new(OutputFormat::Summary)
            .no_color()
            .format_report(&report);
        assert_eq!(brief, "✓ PASS 0/0 passed, 1 skipped, 0 failed (n/a) in 3ms");

        let json: serde_json::Value = serde_json::from_str(
            &ReportFormatter::new(OutputFormat::Json).format_report(&report),
        )
        .unwrap();
        assert!(json["success_rate"].is_null());
    }

    #[test]
    fn test_save_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("run.json");

        save_report(&sample_report(), &path).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["base_url"], "http://localhost:8001/api");
        assert_eq!(saved["tests_skipped"], 1);
    }
}
