//! Output formatting module
//!
//! Provides various output formats for run reports.

mod formatter;

pub use formatter::{save_report, OutputFormat, ReportFormatter};
