//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "MISSED_CALLS_SMOKE";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Base URL from MISSED_CALLS_SMOKE_BASE_URL
    pub base_url: Option<String>,
    /// Timeout from MISSED_CALLS_SMOKE_TIMEOUT
    pub timeout: Option<u64>,
    /// Output format from MISSED_CALLS_SMOKE_FORMAT
    pub format: Option<String>,
    /// Disable colors from MISSED_CALLS_SMOKE_NO_COLOR
    pub no_color: Option<bool>,
    /// Config file from MISSED_CALLS_SMOKE_CONFIG
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}_{name}"));

        Self {
            base_url: get("BASE_URL"),
            timeout: get("TIMEOUT").and_then(|v| v.parse().ok()),
            format: get("FORMAT"),
            no_color: get("NO_COLOR").map(|v| parse_bool(&v)),
            config_file: get("CONFIG"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.base_url.is_some()
            || self.timeout.is_some()
            || self.format.is_some()
            || self.no_color.is_some()
            || self.config_file.is_some()
    }
}

fn parse_bool(v: &str) -> bool {
    matches!(
        v.to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enabled"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_env_config_from_lookup() {
        let env = EnvConfig::from_lookup(lookup(&[
            ("MISSED_CALLS_SMOKE_BASE_URL", "http://localhost:8001/api"),
            ("MISSED_CALLS_SMOKE_TIMEOUT", "30"),
            ("MISSED_CALLS_SMOKE_NO_COLOR", "yes"),
        ]));

        assert_eq!(env.base_url.as_deref(), Some("http://localhost:8001/api"));
        assert_eq!(env.timeout, Some(30));
        assert_eq!(env.no_color, Some(true));
        assert!(env.format.is_none());
        assert!(env.has_any());
    }

    #[test]
    fn test_env_config_ignores_bad_numbers() {
        let env = EnvConfig::from_lookup(lookup(&[("MISSED_CALLS_SMOKE_TIMEOUT", "soon")]));
        assert!(env.timeout.is_none());
        assert!(!env.has_any());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("no"));
    }
}
