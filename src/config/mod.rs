//! Configuration module
//!
//! Handles loading and managing configuration. Precedence, lowest first:
//! built-in defaults, config file, `MISSED_CALLS_SMOKE_*` environment
//! variables, command-line flags.

#![allow(dead_code)]

mod env;
mod file;

pub use env::EnvConfig;
pub use file::{find_config_file, load_config_file};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// API base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://phone-tracker-198.preview.emergentagent.com/api";

/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the API under test
    pub base_url: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Report format (table, json, json-pretty, summary)
    pub format: String,

    /// Colorize table output
    pub color: bool,

    /// Fixture accounts seeded by `init-users`
    pub credentials: Credentials,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            format: "table".to_string(),
            color: true,
            credentials: Credentials::default(),
        }
    }
}

impl AppConfig {
    /// Apply environment overrides
    pub fn merge_env(mut self, env: &EnvConfig) -> Self {
        if let Some(url) = &env.base_url {
            self.base_url = url.clone();
        }
        if let Some(timeout) = env.timeout {
            self.timeout_secs = timeout;
        }
        if let Some(format) = &env.format {
            self.format = format.clone();
        }
        if env.no_color == Some(true) {
            self.color = false;
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            anyhow::bail!("Base URL must not be empty");
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("Base URL must start with http:// or https://: {url}");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("Timeout must be at least 1 second");
        }
        Ok(())
    }
}

/// Login credentials for the seeded admin and worker accounts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub admin_username: String,
    pub admin_password: String,
    pub worker_username: String,
    pub worker_password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            worker_username: "maria".to_string(),
            worker_password: "maria123".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_credentials() {
        let creds = Credentials::default();
        assert_eq!(creds.admin_username, "admin");
        assert_eq!(creds.worker_username, "maria");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig {
            base_url: "ftp://example.com".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        config.base_url = "  ".to_string();
        assert!(config.validate().is_err());

        config.base_url = "http://localhost:8000/api".to_string();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_env() {
        let env = EnvConfig {
            base_url: Some("http://localhost:8001/api".to_string()),
            timeout: Some(3),
            format: None,
            no_color: Some(true),
            config_file: None,
        };
        let config = AppConfig::default().merge_env(&env);
        assert_eq!(config.base_url, "http://localhost:8001/api");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.format, "table");
        assert!(!config.color);
    }
}
