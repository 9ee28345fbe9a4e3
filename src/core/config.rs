use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::providers::DEFAULT_ENDPOINT;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// Starting values for a conversion, overridable from the command line.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ConversionDefaults {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub round_results: bool,
}

impl Default for ConversionDefaults {
    fn default() -> Self {
        ConversionDefaults {
            from: "AU".to_string(),
            to: "US".to_string(),
            amount: 100.0,
            round_results: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub defaults: ConversionDefaults,
    pub markup_rate: f64,
    pub fallback_rate: f64,
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderConfig::default(),
            defaults: ConversionDefaults::default(),
            markup_rate: 0.0005,
            fallback_rate: 0.7456,
            refresh_interval_secs: 10,
            request_timeout_secs: 5,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or the built-in defaults
    /// when no file has been set up.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxrate", "fxrate")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider:
  base_url: "http://example.com/rate/public"
defaults:
  from: "GB"
  to: "JP"
  amount: 250.5
  round_results: false
markup_rate: 0.01
fallback_rate: 1.1
refresh_interval_secs: 30
request_timeout_secs: 2
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "http://example.com/rate/public");
        assert_eq!(config.defaults.from, "GB");
        assert_eq!(config.defaults.to, "JP");
        assert_eq!(config.defaults.amount, 250.5);
        assert!(!config.defaults.round_results);
        assert_eq!(config.markup_rate, 0.01);
        assert_eq!(config.fallback_rate, 1.1);
        assert_eq!(config.refresh_interval(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml_str = r#"
defaults:
  to: "GB"
markup_rate: 0.002
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, DEFAULT_ENDPOINT);
        assert_eq!(config.defaults.from, "AU");
        assert_eq!(config.defaults.to, "GB");
        assert_eq!(config.defaults.amount, 100.0);
        assert!(config.defaults.round_results);
        assert_eq!(config.markup_rate, 0.002);
        assert_eq!(config.fallback_rate, 0.7456);
    }

    #[test]
    fn test_zero_durations_are_clamped() {
        let config = AppConfig {
            refresh_interval_secs: 0,
            request_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_default_config_path_is_owned_by_fxrate() {
        let Ok(path) = AppConfig::default_config_path() else {
            return;
        };
        assert!(path.ends_with("config.yaml"));
        assert!(path.to_string_lossy().contains("fxrate"));
        assert!(!path.to_string_lossy().contains("codito"));
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/nonexistent/fxrate/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
