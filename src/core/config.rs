use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::core::analytics::aggregate::{Dimension, Granularity};
use crate::core::api::client::DEFAULT_LIMIT;
use crate::core::api::endpoint::{normalize_base_url, DEFAULT_API_URL};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_format")]
    pub default_format: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_format() -> String {
    "text".to_string()
}
fn default_color() -> String {
    "auto".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            color: default_color(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Entries requested per `/costs/` page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_page_size() -> u32 {
    DEFAULT_LIMIT
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    #[serde(default = "default_group_by")]
    pub group_by: String,
    /// Rows shown in the "top services" table
    #[serde(default = "default_top_services")]
    pub top_services: usize,
}

fn default_timeframe() -> String {
    "daily".to_string()
}
fn default_group_by() -> String {
    "provider".to_string()
}
fn default_top_services() -> usize {
    10
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            timeframe: default_timeframe(),
            group_by: default_group_by(),
            top_services: default_top_services(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    /// Get the config file path, respecting XDG_CONFIG_HOME
    pub fn config_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".config")
            });
        config_dir.join("cloudcost").join("config.toml")
    }

    /// Load config from the default path, falling back to defaults if not found
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Serialize and write this config to the config file path.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Validate the config
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !["text", "json"].contains(&self.settings.default_format.as_str()) {
            issues.push(format!(
                "Invalid default_format: '{}' (must be 'text' or 'json')",
                self.settings.default_format
            ));
        }
        if !["auto", "always", "never"].contains(&self.settings.color.as_str()) {
            issues.push(format!(
                "Invalid color: '{}' (must be 'auto', 'always', or 'never')",
                self.settings.color
            ));
        }
        if let Err(e) = normalize_base_url(&self.api.url) {
            issues.push(format!("Invalid api.url: {}", e));
        }
        if self.api.timeout_secs == 0 {
            issues.push("api.timeout_secs must be greater than 0".to_string());
        }
        if self.api.page_size == 0 {
            issues.push("api.page_size must be greater than 0".to_string());
        }
        if Granularity::from_id(&self.dashboard.timeframe).is_none() {
            issues.push(format!(
                "Invalid dashboard.timeframe: '{}' (must be daily|weekly|monthly)",
                self.dashboard.timeframe
            ));
        }
        if Dimension::from_id(&self.dashboard.group_by).is_none() {
            issues.push(format!(
                "Invalid dashboard.group_by: '{}' (must be provider|service|environment|project)",
                self.dashboard.group_by
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let config = AppConfig::default();
        let issues = config.validate();
        assert!(issues.is_empty(), "Default config should be valid, got: {:?}", issues);
    }

    #[test]
    fn defaults_point_at_local_api() {
        let config = AppConfig::default();
        assert_eq!(config.api.url, "http://localhost:8000");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.api.page_size, 100);
        assert_eq!(config.dashboard.timeframe, "daily");
        assert_eq!(config.dashboard.group_by, "provider");
    }

    #[test]
    fn validate_catches_invalid_format() {
        let mut config = AppConfig::default();
        config.settings.default_format = "xml".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("default_format")));
    }

    #[test]
    fn validate_catches_invalid_color() {
        let mut config = AppConfig::default();
        config.settings.color = "blue".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("color")));
    }

    #[test]
    fn validate_catches_bad_api_settings() {
        let mut config = AppConfig::default();
        config.api.url = "localhost:8000".to_string();
        config.api.timeout_secs = 0;
        config.api.page_size = 0;
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("api.url")));
        assert!(issues.iter().any(|i| i.contains("timeout_secs")));
        assert!(issues.iter().any(|i| i.contains("page_size")));
    }

    #[test]
    fn validate_catches_bad_dashboard_settings() {
        let mut config = AppConfig::default();
        config.dashboard.timeframe = "hourly".to_string();
        config.dashboard.group_by = "region".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("timeframe")));
        assert!(issues.iter().any(|i| i.contains("group_by")));
    }

    #[test]
    fn parse_partial_toml() {
        let toml = r#"
[settings]
default_format = "json"

[api]
url = "https://costs.internal"

[dashboard]
timeframe = "weekly"
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.settings.default_format, "json");
        assert_eq!(config.settings.color, "auto");
        assert_eq!(config.api.url, "https://costs.internal");
        assert_eq!(config.api.page_size, 100);
        assert_eq!(config.dashboard.timeframe, "weekly");
        assert_eq!(config.dashboard.group_by, "provider");
    }

    #[test]
    fn parse_empty_toml_gives_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.settings.default_format, "text");
        assert_eq!(config.api.url, "http://localhost:8000");
        assert_eq!(config.dashboard.top_services, 10);
    }

    #[test]
    fn serialized_defaults_parse_back() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let config: AppConfig = toml::from_str(&text).unwrap();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn config_path_uses_xdg_when_set() {
        std::env::set_var("XDG_CONFIG_HOME", "/tmp/test_xdg_config");
        let path = AppConfig::config_path();
        std::env::remove_var("XDG_CONFIG_HOME");
        assert_eq!(path, PathBuf::from("/tmp/test_xdg_config/cloudcost/config.toml"));
    }
}
