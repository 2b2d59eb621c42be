//! Configuration management for the Limon desktop shell
//!
//! Handles loading and saving of the TOML configuration: where the document
//! root lives and whether the onboarding dialog is available.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write config file: {0}")]
    Write(#[source] std::io::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Document root holding the storage tree; platform default when unset
    #[serde(default)]
    pub documents_dir: Option<PathBuf>,

    /// Whether this platform shows the What's New dialog
    #[serde(default = "default_onboarding_enabled")]
    pub onboarding_enabled: bool,
}

fn default_onboarding_enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            documents_dir: None,
            onboarding_enabled: default_onboarding_enabled(),
        }
    }
}

impl Config {
    fn app_dir() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("limon"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        Self::app_dir().join("config.toml")
    }

    /// Get the preferences store path
    pub fn preferences_path() -> PathBuf {
        Self::app_dir().join("preferences.json")
    }

    /// Load configuration from the default location
    ///
    /// Runs before logging is set up, so errors are returned for the caller
    /// to report once it is.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_or_default(&Self::config_path())
    }

    /// Load `path`, or defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(ConfigError::Read)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path();
        self.save_to(&path)?;
        log::info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::Write)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(ConfigError::Write)
    }

    /// Resolve the document root
    pub fn documents_root(&self) -> PathBuf {
        if let Some(dir) = &self.documents_dir {
            return dir.clone();
        }
        dirs::document_dir()
            .map(|dir| dir.join("Limon"))
            .unwrap_or_else(|| PathBuf::from("Limon"))
    }
}
