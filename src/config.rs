//! Client configuration
//!
//! Settings are read from `config.toml` in the platform configuration
//! directory (e.g. `~/.config/tvdb/config.toml` on Linux). Missing keys
//! fall back to their defaults; a missing file yields the defaults. The
//! `TVDB_API_KEY` environment variable overrides the stored API key.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable that overrides [`ClientConfig::api_key`]
pub const API_KEY_ENV: &str = "TVDB_API_KEY";

/// Errors that can occur while loading or saving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be written
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration could not be turned into TOML
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Settings of a [`crate::TvDbClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Personal API key issued by TheTVDB
    pub api_key: String,
    /// Server used to fetch the mirror list
    pub base_url: String,
    /// Language used when a request does not name one
    pub default_language: String,
    /// Directory that keeps downloaded archives; temporary when unset
    pub download_dir: Option<PathBuf>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "http://thetvdb.com".to_string(),
            default_language: "en".to_string(),
            download_dir: None,
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Loads the user configuration and applies environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
                path: path.clone(),
                source: e,
            })?;
            tracing::debug!(path = %path.display(), "Loaded configuration");
            Self::from_toml_str(&content)?
        } else {
            Self::default()
        };

        if let Ok(api_key) = std::env::var(API_KEY_ENV) {
            config.apply_api_key_override(&api_key);
        }

        Ok(config)
    }

    /// Parses a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Replaces the API key unless `api_key` is blank
    pub fn apply_api_key_override(&mut self, api_key: &str) {
        let api_key = api_key.trim();
        if !api_key.is_empty() {
            self.api_key = api_key.to_string();
        }
    }

    /// Writes this configuration to the user config file
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content).map_err(|e| ConfigError::Write { path, source: e })
    }

    /// Path of the user config file
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "thetvdb", "tvdb")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
