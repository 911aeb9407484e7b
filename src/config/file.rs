//! Configuration file management
//!
//! Handles finding and loading configuration files.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::AppConfig;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./missed-calls-smoke.yaml",
    "./missed-calls-smoke.yml",
    "./.missed-calls-smoke.yaml",
    "~/.config/missed-calls-smoke/config.yaml",
];

/// Find configuration file in standard locations
pub fn find_config_file() -> Option<PathBuf> {
    CONFIG_LOCATIONS
        .iter()
        .map(|location| expand_path(location))
        .find(|path| path.exists())
}

/// Load configuration from file; validation happens once all layers are merged
pub fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: AppConfig = if is_yaml_file(path) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
    };

    Ok(config)
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_file_save_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let config = AppConfig {
            base_url: "http://localhost:8001/api".to_string(),
            timeout_secs: 5,
            ..AppConfig::default()
        };
        std::fs::write(&path, serde_yaml::to_string(&config).unwrap()).unwrap();

        let loaded = load_config_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"base_url": "http://127.0.0.1:9000", "credentials": {"worker_username": "jose"}}"#,
        )
        .unwrap();

        let loaded = load_config_file(&path).unwrap();
        assert_eq!(loaded.base_url, "http://127.0.0.1:9000");
        assert_eq!(loaded.timeout_secs, 10);
        assert_eq!(loaded.credentials.worker_username, "jose");
        assert_eq!(loaded.credentials.worker_password, "maria123");
    }

    #[test]
    fn test_out_of_range_values_load_unvalidated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "timeout_secs: 0\n").unwrap();

        let loaded = load_config_file(&path).unwrap();
        assert_eq!(loaded.timeout_secs, 0);
        assert!(loaded.validate().is_err());
    }

    #[test]
    fn test_malformed_config_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "timeout_secs: [not a number\n").unwrap();

        assert!(load_config_file(&path).is_err());
    }

    #[test]
    fn test_missing_file_errors() {
        let dir = tempdir().unwrap();
        assert!(load_config_file(dir.path().join("absent.yaml")).is_err());
    }

    #[test]
    fn test_expand_path() {
        let path = expand_path("./test.yaml");
        assert_eq!(path, PathBuf::from("./test.yaml"));
        assert!(is_yaml_file(Path::new("a.yml")));
        assert!(!is_yaml_file(Path::new("a.json")));
    }
}
