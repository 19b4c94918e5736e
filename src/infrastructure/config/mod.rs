//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub slack: SlackConfig,
    pub handlers: HandlersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SlackConfig {
    /// Web API base, e.g. `https://slack.com/api`
    pub api_base: String,
}

/// Settings for the commands that call out to web APIs
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HandlersConfig {
    pub timeout_seconds: u64,
    pub quote_url: String,
    pub image_url: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "daryl".to_string(),
        }
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            api_base: "https://slack.com/api".to_string(),
        }
    }
}

impl Default for HandlersConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            quote_url: "http://download.finance.yahoo.com/d/quotes.csv".to_string(),
            image_url: "https://ajax.googleapis.com/ajax/services/search/images".to_string(),
        }
    }
}

impl HandlersConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides on top of this config
    pub fn with_env(mut self) -> Self {
        if let Ok(base) = std::env::var("DARYL_SLACK_API_BASE") {
            self.slack.api_base = base;
        }

        if let Ok(url) = std::env::var("DARYL_QUOTE_URL") {
            self.handlers.quote_url = url;
        }

        if let Ok(url) = std::env::var("DARYL_IMAGE_URL") {
            self.handlers.image_url = url;
        }

        self
    }

    pub fn load_env() -> Self {
        Config::default().with_env()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slack.api_base.trim().is_empty() {
            return Err(ConfigError::MissingField("slack.api-base".to_string()));
        }
        if self.handlers.quote_url.trim().is_empty() {
            return Err(ConfigError::MissingField("handlers.quote-url".to_string()));
        }
        if self.handlers.image_url.trim().is_empty() {
            return Err(ConfigError::MissingField("handlers.image-url".to_string()));
        }
        if self.handlers.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue("handlers.timeout-seconds must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.handlers.timeout(), Duration::from_secs(10));
        assert_eq!(config.slack.api_base, "https://slack.com/api");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "handlers:\n  timeout-seconds: 3\n  quote-url: http://localhost:8080/quotes.csv\n";
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(config.handlers.timeout_seconds, 3);
        assert_eq!(config.handlers.quote_url, "http://localhost:8080/quotes.csv");
        assert_eq!(config.handlers.image_url, HandlersConfig::default().image_url);
        assert_eq!(config.bot.name, "daryl");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let yaml = "handlers:\n  timeout-seconds: 0\n";
        assert!(matches!(Config::from_yaml(yaml), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_empty_url_rejected() {
        let yaml = "slack:\n  api-base: \"\"\n";
        assert!(matches!(Config::from_yaml(yaml), Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(Config::from_yaml("handlers: [oops"), Err(ConfigError::Parse(_))));
    }
}
