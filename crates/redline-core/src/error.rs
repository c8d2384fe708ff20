//! Error types for redline.

use thiserror::Error;

/// Result type alias using redline's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for redline operations.
///
/// `NotFound` deliberately covers both "absent" and "exists but owned by
/// someone else" so that callers can never probe for the existence of
/// another user's notes or revisions.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found (or not owned by the caller)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input (malformed offsets, overlapping spans, bad tag names)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Grammar checker unreachable or returned a non-success status
    #[error("Grammar check failed: {0}")]
    GrammarCheck(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("note abc".to_string());
        assert_eq!(err.to_string(), "Not found: note abc");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("offset out of bounds".to_string());
        assert_eq!(err.to_string(), "Invalid input: offset out of bounds");
    }

    #[test]
    fn test_error_display_grammar_check() {
        let err = Error::GrammarCheck("checker returned 503".to_string());
        assert_eq!(err.to_string(), "Grammar check failed: checker returned 503");
    }

    #[test]
    fn test_error_display_request() {
        let err = Error::Request("network unreachable".to_string());
        assert_eq!(err.to_string(), "Request error: network unreachable");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("bad timeout value".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad timeout value");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_error_debug_format() {
        let err = Error::NotFound("test".to_string());
        assert!(format!("{:?}", err).contains("NotFound"));
    }
}
