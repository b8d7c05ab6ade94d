//! Poll error types
//!
//! Every failure a single poll cycle can hit. None of these are fatal: the
//! caller logs them, raises the error banner and waits for the next tick.

use thiserror::Error;

/// Errors that can occur while fetching and decoding one endpoint
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Transport failed before a response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-success status
    #[error("HTTP error {status} from {path}")]
    Http { status: u16, path: String },

    /// Body was not valid JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Valid JSON with the wrong shape (e.g. `departments` is not an array)
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// Request was cancelled by the session before it completed
    #[error("Request aborted")]
    Aborted,
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// Result type alias for poll operations
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::Http {
            status: 502,
            path: "/realtime".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 502 from /realtime");

        let err = FetchError::Malformed("departments is not an array".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed payload: departments is not an array"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: FetchError = json_err.into();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
