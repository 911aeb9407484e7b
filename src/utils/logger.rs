//! Logging utilities
//!
//! Provides logging configuration and helpers.

use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Log level configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[value(alias = "warning")]
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }

    /// Level from `--verbose` and `--log-level`; an explicit level wins
    pub fn from_args(verbose: bool, explicit: Option<LogLevel>) -> Self {
        match explicit {
            Some(level) => level,
            None if verbose => LogLevel::Debug,
            None => LogLevel::Info,
        }
    }
}

/// Initialize the logger with specified level; `RUST_LOG` overrides it
pub fn init_logger(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "missed_calls_smoke={}",
            level.to_tracing_level()
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
