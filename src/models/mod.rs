//! Data models for the smoke suite
//!
//! This module contains all data structures used throughout the application.

mod test_case;
mod test_result;

pub use test_case::{value_text, CaptureKey, CapturedValues, HttpMethod, TestCase};
pub use test_result::{
    excerpt, FailureRecord, RunReport, StepOutcome, TestRunState, TestStatus,
    RESPONSE_EXCERPT_CHARS,
};
