//! Test execution runner
//!
//! Executes suite steps one after another against the API, capturing values
//! for later steps and recording every failure without aborting the run.

use anyhow::Result;
use chrono::Local;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::http::HttpClient;
use crate::models::{
    excerpt, value_text, CaptureKey, FailureRecord, RunReport, StepOutcome, TestCase,
    TestRunState, TestStatus, RESPONSE_EXCERPT_CHARS,
};
use crate::scenarios::{Resolution, Step, StepError};
use crate::utils::Timer;

/// Detailed result of one request
#[derive(Clone, Debug)]
pub struct Execution {
    pub passed: bool,
    pub body: Value,
    /// `None` when no response was received
    pub status_code: Option<u16>,
    pub duration_ms: u64,
}

/// Sequential runner for the smoke suite
pub struct TestRunner {
    client: HttpClient,
    state: TestRunState,
}

impl TestRunner {
    /// Create a runner for `base_url`
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(base_url, timeout_secs)?,
            state: TestRunState::new(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.timeout_secs)
    }

    pub fn state(&self) -> &TestRunState {
        &self.state
    }

    /// Send one test case and compare the status code
    ///
    /// Returns whether it passed and the parsed body (`{}` on failure or when
    /// the body is not JSON). Every call counts as one run test.
    pub async fn execute(&mut self, case: &TestCase) -> (bool, Value) {
        let execution = self.execute_detailed(case).await;
        (execution.passed, execution.body)
    }

    pub async fn execute_detailed(&mut self, case: &TestCase) -> Execution {
        let timer = Timer::start(case.name.as_str());

        match self.client.send(case).await {
            Ok(response) if response.status_code == case.expected_status => {
                self.state.record_pass();
                info!("✓ Passed - Status: {}", response.status_code);
                Execution {
                    passed: true,
                    body: response.json(),
                    status_code: Some(response.status_code),
                    duration_ms: timer.stop(),
                }
            }
            Ok(response) => {
                warn!(
                    "✗ Failed - Expected {}, got {}",
                    case.expected_status, response.status_code
                );
                warn!(
                    "  Response: {}",
                    excerpt(&response.body, RESPONSE_EXCERPT_CHARS)
                );
                self.state.record_failure(FailureRecord::mismatch(
                    &case.name,
                    case.expected_status,
                    response.status_code,
                    &response.body,
                ));
                Execution {
                    passed: false,
                    body: Value::Object(Default::default()),
                    status_code: Some(response.status_code),
                    duration_ms: timer.stop(),
                }
            }
            Err(e) => {
                error!("✗ Failed - Error: {}", e);
                self.state
                    .record_failure(FailureRecord::error(&case.name, e.to_string()));
                Execution {
                    passed: false,
                    body: Value::Object(Default::default()),
                    status_code: None,
                    duration_ms: timer.stop(),
                }
            }
        }
    }

    /// Run one step: resolve it, skip it, or execute it and post-process
    pub async fn run_step(&mut self, step: &Step) -> Result<StepOutcome, StepError> {
        let case = match step.resolve(&self.state.captured)? {
            Resolution::Skip(key) => {
                self.state.record_skip();
                warn!("○ Skipping {} - no {} available", step.name, key);
                return Ok(StepOutcome::new(step.number, step.name, TestStatus::Skip)
                    .with_message(format!("no {key} available")));
            }
            Resolution::Ready(case) => case,
        };

        info!("Testing {}...", step.name);
        let execution = self.execute_detailed(&case).await;

        if !execution.passed {
            let status = if execution.status_code.is_some() {
                TestStatus::Fail
            } else {
                TestStatus::Error
            };
            let message = self
                .state
                .failures
                .last()
                .map(failure_message)
                .unwrap_or_default();
            return Ok(StepOutcome::new(step.number, step.name, status)
                .with_status_code(execution.status_code)
                .with_duration(execution.duration_ms)
                .with_message(message));
        }

        let mut notes = Vec::new();

        if let Some(capture) = step.capture {
            match execution.body.get(capture.field) {
                Some(value) if !value.is_null() => {
                    let shown = display_capture(capture.key, value);
                    info!("  Captured {} = {}", capture.key, shown);
                    notes.push(format!("{} = {}", capture.key, shown));
                    self.state.captured.set(capture.key, value.clone());
                }
                _ => {
                    warn!(
                        "  Response has no {}; {} not captured",
                        capture.field, capture.key
                    );
                    notes.push(format!("{} not captured", capture.key));
                }
            }
        }

        let mut shape_ok = None;
        if let Some(check) = &step.check {
            let result = check.evaluate(&execution.body);
            if result.ok {
                info!("  {}", result.message);
            } else {
                warn!("  Shape check failed: {}", result.message);
            }
            notes.push(result.message);
            shape_ok = Some(result.ok);
        }

        let mut outcome = StepOutcome::new(step.number, step.name, TestStatus::Pass)
            .with_status_code(execution.status_code)
            .with_duration(execution.duration_ms)
            .with_shape(shape_ok);
        if !notes.is_empty() {
            outcome = outcome.with_message(notes.join("; "));
        }
        Ok(outcome)
    }

    /// Run the steps in order; one failing step never stops the run
    pub async fn run_suite(mut self, steps: &[Step]) -> RunReport {
        let started_at = Local::now();
        let timer = Timer::start("suite");

        info!(
            "Starting {} steps against {}",
            steps.len(),
            self.client.base_url()
        );

        for step in steps {
            let outcome = match self.run_step(step).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("✗ {} - Error: {}", step.name, e);
                    self.state
                        .record_failure(FailureRecord::error(step.name, e.to_string()));
                    StepOutcome::new(step.number, step.name, TestStatus::Error)
                        .with_message(e.to_string())
                }
            };
            self.state.outcomes.push(outcome);
        }

        let total_ms = timer.stop();
        info!(
            "Suite completed in {}ms - Pass: {}/{}, skipped: {}",
            total_ms, self.state.tests_passed, self.state.tests_run, self.state.tests_skipped
        );

        RunReport::new(self.client.base_url(), started_at, total_ms, self.state)
    }
}

fn failure_message(failure: &FailureRecord) -> String {
    match failure {
        FailureRecord::Mismatch {
            expected, actual, ..
        } => format!("expected {expected}, got {actual}"),
        FailureRecord::Error { error, .. } => error.clone(),
    }
}

/// Tokens are shortened to their first 20 characters
fn display_capture(key: CaptureKey, value: &Value) -> String {
    let text = value_text(value);
    match key {
        CaptureKey::AdminToken | CaptureKey::WorkerToken if text.chars().count() > 20 => {
            format!("{}...", excerpt(&text, 20))
        }
        _ => text,
    }
}
