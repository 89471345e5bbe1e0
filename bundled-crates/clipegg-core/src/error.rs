//! Error types for egg decoding.

use thiserror::Error;

/// Result type for egg operations
pub type EggResult<T> = std::result::Result<T, EggError>;

/// Errors that can occur while reading an egg from a clipboard
#[derive(Error, Debug)]
pub enum EggError {
    /// Structured payload present but not a valid egg
    ///
    /// Covers both invalid JSON and JSON that does not have the egg shape.
    #[error("malformed structured payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

impl EggError {
    /// Returns true if the caller can carry on with the clipboard transaction
    ///
    /// A malformed payload only means "no usable egg"; it never poisons the
    /// clipboard or the codec.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedPayload(_))
    }

    /// Line and column of the parse failure, when known
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            Self::MalformedPayload(e) if e.line() > 0 => Some((e.line(), e.column())),
            Self::MalformedPayload(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_error(input: &str) -> EggError {
        serde_json::from_str::<serde_json::Value>(input)
            .map(|_| ())
            .map_err(EggError::from)
            .unwrap_err()
    }

    #[test]
    fn test_error_display() {
        let err = parse_error("{not json");
        assert!(err.to_string().starts_with("malformed structured payload: "));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(parse_error("{").is_recoverable());
    }

    #[test]
    fn test_location() {
        let err = parse_error("{\n  \"v\": }");
        assert_eq!(err.location().map(|(line, _)| line), Some(2));
    }
}
