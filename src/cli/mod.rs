//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::LogLevel;

/// End-to-end smoke tests for the missed-calls API
#[derive(Parser, Debug)]
#[command(name = "missed-calls-smoke")]
#[command(version)]
#[command(about = "Run the missed-calls API smoke suite against a live backend")]
#[command(long_about = None)]
pub struct Args {
    /// Defaults to `run` with no options
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level
    #[arg(long, global = true, value_enum, ignore_case = true)]
    pub log_level: Option<LogLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the smoke suite
    Run(RunArgs),

    /// List the suite steps
    List(ListArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// API base URL
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format (table, json, json-pretty, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Run only these steps (comma-separated step numbers)
    #[arg(long)]
    pub only: Option<String>,

    /// Skip these steps (comma-separated step numbers)
    #[arg(long)]
    pub skip: Option<String>,

    /// Save the JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show method, path, expected status and requirements
    #[arg(short, long)]
    pub detailed: bool,
}
