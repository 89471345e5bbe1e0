//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level ("trace", "debug", "info", "warn", "error")
    pub level: String,

    /// Output format ("pretty", "compact", "json")
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for log files (None = stderr only)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}

/// Clipboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipboardConfig {
    /// Maximum bundle size in bytes accepted from files and stdin
    pub max_size: usize,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            max_size: 10485760, // 10 MB
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON written by the CLI
    #[serde(default)]
    pub pretty: bool,
}
