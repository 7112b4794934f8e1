//! Error types used throughout osabridge

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for osabridge
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum OsaBridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Platform error: {0}")]
    Platform(String),

    /// The interpreter ran (or tried to) and the script did not succeed.
    #[error("Script error: {0}")]
    Script(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for osabridge operations
pub type Result<T> = std::result::Result<T, OsaBridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes_category() {
        let err = OsaBridgeError::Script("boom".into());
        assert_eq!(err.to_string(), "Script error: boom");

        let err = OsaBridgeError::Config("timeout_ms must be greater than zero".into());
        assert_eq!(err.to_string(), "Configuration error: timeout_ms must be greater than zero");
    }

    #[test]
    fn test_serializes_as_tagged_object() {
        let err = OsaBridgeError::Platform("osascript spawn failed".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Platform");
        assert_eq!(json["message"], "osascript spawn failed");

        let back: OsaBridgeError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }
}
