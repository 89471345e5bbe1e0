//! Configuration management
//!
//! Handles loading, validation, and merging of configuration from:
//! - TOML files
//! - CLI arguments

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod types;

pub use types::{ClipboardConfig, LoggingConfig, OutputConfig};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Clipboard configuration
    #[serde(default)]
    pub clipboard: ClipboardConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Default config file location (`$XDG_CONFIG_HOME/clipegg/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("clipegg").join("config.toml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Invalid log level: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            _ => anyhow::bail!("Invalid log format: {}", self.logging.format),
        }

        if self.clipboard.max_size == 0 {
            anyhow::bail!("clipboard.max_size must be greater than zero");
        }

        Ok(())
    }

    /// Override config with CLI arguments
    pub fn with_overrides(mut self, log_format: Option<String>, pretty: bool) -> Self {
        if let Some(format) = log_format {
            self.logging.format = format;
        }
        if pretty {
            self.output.pretty = true;
        }

        self
    }
}
