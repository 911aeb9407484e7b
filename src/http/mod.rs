//! HTTP client module
//!
//! Provides the JSON/bearer HTTP client used by the runner.

mod client;

pub use client::HttpClient;
