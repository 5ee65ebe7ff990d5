use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use airtable_mcp::client::{ClientConfig, DEFAULT_API_BASE};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub api: ApiConfig,
    pub broker: BrokerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout_ms: 30000,
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::with_api_base(self.base_url.clone()).with_timeout(Duration::from_millis(self.timeout_ms))
    }
}

/// Broker call tuning; connection identity always comes from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerSettings {
    pub timeout_ms: u64,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self { timeout_ms: 15000 }
    }
}

impl BrokerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            api: ApiConfig::default(),
            broker: BrokerSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");

        // Primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.api.base_url, "https://api.airtable.com/v0");
        assert_eq!(config.api.timeout_ms, 30000);
        assert_eq!(config.broker.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "log_level: debug\napi:\n  base_url: http://localhost:8080/v0\n  timeout_ms: 500").unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.api.base_url, "http://localhost:8080/v0");
        let client = config.api.client_config();
        assert_eq!(client.timeout, Duration::from_millis(500));
        // Unspecified sections keep their defaults
        assert_eq!(config.broker.timeout_ms, 15000);
    }

    #[test]
    fn test_load_partial_section() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api:\n  timeout_ms: 1000").unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_BASE);
        assert_eq!(config.api.timeout_ms, 1000);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let path = PathBuf::from("/nonexistent/airtable-mcp.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api: [not, a, map").unwrap();
        assert!(Config::load(Some(&file.path().to_path_buf())).is_err());
    }
}
