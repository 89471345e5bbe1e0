//! Clipboard Error Types
//!
//! Errors raised while moving clipboard bundles in and out of files and
//! streams. A malformed egg inside an otherwise valid bundle is wrapped from
//! [`clipegg_core::EggError`].

use clipegg_core::EggError;
use thiserror::Error;

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Clipboard module error types
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Bundle exceeds the configured size limit
    #[error("Bundle exceeds maximum allowed size of {0} bytes")]
    DataSizeExceeded(usize),

    /// Bundle is valid JSON but not a format map
    #[error("Invalid bundle: {0}")]
    InvalidData(String),

    /// Bundle is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bundle carries a malformed egg payload
    #[error("Egg error: {0}")]
    Core(#[from] EggError),
}

/// Error classification for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Input rejected before or during parsing
    DataValidation,
    /// Reading or writing failed
    Io,
}

impl ClipboardError {
    /// Classify this error
    pub fn error_type(&self) -> ErrorType {
        match self {
            Self::DataSizeExceeded(_) | Self::InvalidData(_) | Self::Json(_) | Self::Core(_) => {
                ErrorType::DataValidation
            }
            Self::Io(e) if e.kind() == std::io::ErrorKind::InvalidData => ErrorType::DataValidation,
            Self::Io(_) => ErrorType::Io,
        }
    }

    /// Returns true if retrying with different input may succeed
    pub fn is_recoverable(&self) -> bool {
        self.error_type() == ErrorType::DataValidation
    }
}
