use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/wikichat/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("wikichat").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - Every service endpoint is an absolute http(s) URL
    /// - The topic list has no blank or duplicate entries
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, url) in self.services.endpoints() {
            let parsed = reqwest::Url::parse(url).map_err(|e| ConfigError::ValidationError {
                message: format!("services.{} '{}' is not a valid URL: {}", field, url, e),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "services.{} '{}' must use http or https",
                        field, url
                    ),
                });
            }
        }

        let mut seen = Vec::with_capacity(self.chat.topics.len());
        for topic in &self.chat.topics {
            if topic.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    message: "chat.topics must not contain blank entries".to_string(),
                });
            }
            if seen.contains(&topic) {
                return Err(ConfigError::ValidationError {
                    message: format!("chat.topics lists '{}' more than once", topic),
                });
            }
            seen.push(topic);
        }

        Ok(())
    }
}
