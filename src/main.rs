//! Missed-calls API smoke tester
//!
//! Runs an ordered end-to-end suite against a live missed-calls backend:
//! logs in as admin and worker, exercises users, missed calls, notes and
//! stats, and checks status codes and response shapes.
//!
//! ## Usage
//!
//! ```bash
//! # Run the full suite against the default backend
//! missed-calls-smoke
//!
//! # Run against a local backend, JSON report saved to disk
//! missed-calls-smoke run --base-url http://localhost:8001/api --output report.json
//!
//! # Run a subset
//! missed-calls-smoke run --only 1,2,3,16
//!
//! # List the steps
//! missed-calls-smoke list --detailed
//! ```
//!
//! The process exits with 0 when every executed test passed, 1 otherwise.

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

mod cli;
mod config;
mod executor;
mod http;
mod models;
mod output;
mod scenarios;
#[cfg(test)]
mod testing;
mod utils;

use cli::Args;
use config::{find_config_file, load_config_file, AppConfig, EnvConfig};
use executor::TestRunner;
use output::{save_report, OutputFormat, ReportFormatter};
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(LogLevel::from_args(args.verbose, args.log_level));

    let code = match args.command {
        Some(cli::Command::Run(run_args)) => run_suite(run_args).await?,
        Some(cli::Command::List(list_args)) => {
            list_steps(list_args);
            0
        }
        None => run_suite(cli::RunArgs::default()).await?,
    };

    std::process::exit(code);
}

/// Layer defaults, config file, environment and flags
fn resolve_config(args: &cli::RunArgs, env: &EnvConfig) -> Result<AppConfig> {
    let path = args
        .config
        .clone()
        .or_else(|| env.config_file.as_ref().map(PathBuf::from))
        .or_else(find_config_file);

    let mut config = match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            load_config_file(&path)?
        }
        None => AppConfig::default(),
    };

    config = config.merge_env(env);

    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(format) = &args.format {
        config.format = format.clone();
    }
    if args.no_color {
        config.color = false;
    }

    config.validate()?;
    Ok(config)
}

async fn run_suite(args: cli::RunArgs) -> Result<i32> {
    let env = EnvConfig::load();
    if env.has_any() {
        debug!("Environment overrides: {:?}", env);
    }
    let config = resolve_config(&args, &env)?;

    let format = OutputFormat::from_str(&config.format)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {}", config.format))?;
    let mut formatter = ReportFormatter::new(format);
    if !config.color {
        formatter = formatter.no_color();
    }

    let only = scenarios::parse_step_list(args.only.as_deref().unwrap_or(""))?;
    let skip = scenarios::parse_step_list(args.skip.as_deref().unwrap_or(""))?;
    let steps = scenarios::select(
        scenarios::default_suite(&config.credentials, Local::now()),
        &only,
        &skip,
    );

    info!(
        "🚀 Starting missed-calls API smoke tests against {} ({} steps)",
        config.base_url,
        steps.len()
    );

    let runner = TestRunner::from_config(&config)?;
    let report = runner.run_suite(&steps).await;

    println!("{}", formatter.format_report(&report));

    if let Some(path) = &args.output {
        save_report(&report, path)?;
        info!("Report saved to {}", path.display());
    }

    Ok(report.exit_code())
}

fn list_steps(args: cli::ListArgs) {
    let steps = scenarios::default_suite(&config::Credentials::default(), Local::now());

    println!("\nMissed-calls API Smoke Suite ({} steps)\n", steps.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut current_category = "";

    for step in &steps {
        if step.category != current_category {
            println!("\n{} Steps:", step.category);
            println!("──────────────────────────────────────────────────────────────────────");
            current_category = step.category;
        }

        if args.detailed {
            let path = if step.path.is_empty() {
                "/"
            } else {
                step.path.as_str()
            };
            let requires: Vec<&str> = step.requires.iter().map(|k| k.name()).collect();
            println!(
                "  {:2}. {:32} {:6} {:30} -> {}{}",
                step.number,
                step.name,
                step.method.as_str(),
                path,
                step.expected_status,
                if requires.is_empty() {
                    String::new()
                } else {
                    format!("  (needs {})", requires.join(", "))
                }
            );
        } else {
            println!("  {:2}. {}", step.number, step.name);
        }
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
}
