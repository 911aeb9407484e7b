//! Test execution engine
//!
//! Provides strictly sequential suite execution.

mod runner;

pub use runner::TestRunner;
