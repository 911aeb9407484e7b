//! Test result models
//!
//! Run state, failure records, per-step outcomes and the final report.

#![allow(dead_code)]

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::CapturedValues;

/// Maximum number of characters of a response body kept in a failure record
pub const RESPONSE_EXCERPT_CHARS: usize = 200;

/// Keep at most `max` characters of `text`
pub fn excerpt(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Step execution status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    Skip,
    Error,
}

impl TestStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            TestStatus::Pass => "✓",
            TestStatus::Fail => "✗",
            TestStatus::Skip => "○",
            TestStatus::Error => "!",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "PASS"),
            TestStatus::Fail => write!(f, "FAIL"),
            TestStatus::Skip => write!(f, "SKIP"),
            TestStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// A recorded failure
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FailureRecord {
    /// Observed status differs from the expected one
    Mismatch {
        test: String,
        expected: u16,
        actual: u16,
        response: String,
    },
    /// Transport failure or an error raised while preparing the step
    Error { test: String, error: String },
}

impl FailureRecord {
    pub fn mismatch(test: impl Into<String>, expected: u16, actual: u16, body: &str) -> Self {
        FailureRecord::Mismatch {
            test: test.into(),
            expected,
            actual,
            response: excerpt(body, RESPONSE_EXCERPT_CHARS),
        }
    }

    pub fn error(test: impl Into<String>, error: impl Into<String>) -> Self {
        FailureRecord::Error {
            test: test.into(),
            error: error.into(),
        }
    }

    pub fn test_name(&self) -> &str {
        match self {
            FailureRecord::Mismatch { test, .. } | FailureRecord::Error { test, .. } => test,
        }
    }
}

/// What happened to one step of the suite
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepOutcome {
    pub number: u8,
    pub name: String,
    pub status: TestStatus,
    pub status_code: Option<u16>,
    pub duration_ms: u64,
    pub message: Option<String>,
    pub shape_ok: Option<bool>,
}

impl StepOutcome {
    pub fn new(number: u8, name: impl Into<String>, status: TestStatus) -> Self {
        Self {
            number,
            name: name.into(),
            status,
            status_code: None,
            duration_ms: 0,
            message: None,
            shape_ok: None,
        }
    }

    pub fn with_status_code(mut self, code: Option<u16>) -> Self {
        self.status_code = code;
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_shape(mut self, shape_ok: Option<bool>) -> Self {
        self.shape_ok = shape_ok;
        self
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:2}. {} [{}ms]",
            self.status.symbol(),
            self.number,
            self.name,
            self.duration_ms
        )?;
        if let Some(msg) = &self.message {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

/// Mutable state of one suite run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TestRunState {
    pub tests_run: usize,
    pub tests_passed: usize,
    pub tests_skipped: usize,
    pub failures: Vec<FailureRecord>,
    pub captured: CapturedValues,
    pub outcomes: Vec<StepOutcome>,
}

impl TestRunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pass(&mut self) {
        self.tests_run += 1;
        self.tests_passed += 1;
    }

    pub fn record_failure(&mut self, failure: FailureRecord) {
        self.tests_run += 1;
        self.failures.push(failure);
    }

    pub fn record_skip(&mut self) {
        self.tests_skipped += 1;
    }

    /// Success rate over executed tests, in percent; `None` when nothing ran
    pub fn success_rate(&self) -> Option<f64> {
        (self.tests_run > 0).then(|| (self.tests_passed as f64 / self.tests_run as f64) * 100.0)
    }
}

/// Final report of a run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub base_url: String,
    pub started_at: DateTime<Local>,
    pub total_duration_ms: u64,
    pub tests_run: usize,
    pub tests_passed: usize,
    pub tests_skipped: usize,
    pub success_rate: Option<f64>,
    pub outcomes: Vec<StepOutcome>,
    pub failures: Vec<FailureRecord>,
}

impl RunReport {
    pub fn new(
        base_url: impl Into<String>,
        started_at: DateTime<Local>,
        total_duration_ms: u64,
        state: TestRunState,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            started_at,
            total_duration_ms,
            tests_run: state.tests_run,
            tests_passed: state.tests_passed,
            tests_skipped: state.tests_skipped,
            success_rate: state.success_rate(),
            outcomes: state.outcomes,
            failures: state.failures,
        }
    }

    pub fn is_all_passed(&self) -> bool {
        self.tests_passed == self.tests_run
    }

    /// Rate as `33.3%`, or `n/a` when every step was skipped
    pub fn success_rate_text(&self) -> String {
        self.success_rate
            .map_or_else(|| "n/a".to_string(), |rate| format!("{rate:.1}%"))
    }

    /// Process exit code: 0 when every executed test passed
    pub fn exit_code(&self) -> i32 {
        if self.is_all_passed() {
            0
        } else {
            1
        }
    }
}
