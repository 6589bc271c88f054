//! Error types for revisit.
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in revisit
#[derive(Debug, Error)]
pub enum RevisitError {
    /// Rule text does not match the wire grammar
    #[error("Parse error: {0}")]
    Parse(String),

    /// A rule violating the schedule invariants at the save boundary
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// Schedule store / config persistence error
    #[error("Store error: {0}")]
    Store(String),

    /// Editor or default-open launch failure
    #[error("Launch error: {0}")]
    Launch(String),

    /// Notification delivery failure
    #[error("Notify error: {0}")]
    Notify(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for revisit operations
pub type Result<T> = std::result::Result<T, RevisitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error() {
        let err = RevisitError::Parse("no every() token".to_string());
        assert_eq!(err.to_string(), "Parse error: no every() token");
    }

    #[test]
    fn test_invalid_rule_error() {
        let err = RevisitError::InvalidRule("interval must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid rule: interval must be positive");
    }

    #[test]
    fn test_store_error() {
        let err = RevisitError::Store("file locked".to_string());
        assert_eq!(err.to_string(), "Store error: file locked");
    }

    #[test]
    fn test_launch_error() {
        let err = RevisitError::Launch("editor not found".to_string());
        assert_eq!(err.to_string(), "Launch error: editor not found");
    }

    #[test]
    fn test_notify_error() {
        let err = RevisitError::Notify("toast backend unavailable".to_string());
        assert_eq!(err.to_string(), "Notify error: toast backend unavailable");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RevisitError = io_err.into();
        assert!(matches!(err, RevisitError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: RevisitError = json_err.into();
        assert!(matches!(err, RevisitError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(RevisitError::Parse("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
