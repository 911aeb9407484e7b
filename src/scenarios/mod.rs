//! Missed-calls API scenarios
//!
//! The suite is a table of templated steps interpreted by the runner.
//!
//! ## Steps
//!
//! ### Setup (1-2)
//! - API Health Check
//! - Initialize Users
//!
//! ### Auth (3-7)
//! - Admin / Worker / Invalid Login
//! - Get Me (Admin, Worker)
//!
//! ### Users (8-10, 17-18)
//! - List as admin, list as worker (forbidden), create, change password, delete
//!
//! ### Calls, Notes, Stats (11-16)
//! - Create / list / update missed calls, create / list notes, stats

mod step;
mod suite;

pub use step::{Resolution, ShapeCheck, Step, StepError};
pub use suite::{default_suite, SUITE_LEN};

use anyhow::Result;

/// Parse a comma-separated list of step numbers, e.g. `"1,3,17"`
pub fn parse_step_list(list: &str) -> Result<Vec<u8>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| -> Result<u8> {
            let n: u8 = s
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid step number: {s}"))?;
            if n < 1 || n > SUITE_LEN {
                anyhow::bail!("Invalid step number {n}. Valid range: 1-{SUITE_LEN}");
            }
            Ok(n)
        })
        .collect()
}

/// Keep the steps selected by `only` (all when empty) minus `skip`
pub fn select(steps: Vec<Step>, only: &[u8], skip: &[u8]) -> Vec<Step> {
    steps
        .into_iter()
        .filter(|s| only.is_empty() || only.contains(&s.number))
        .filter(|s| !skip.contains(&s.number))
        .collect()
}
