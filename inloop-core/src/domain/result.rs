//! Result and error types for the core library

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core library error type
///
/// The first four variants are the session outcomes consumers branch on.
/// Everything else is storage and serialization plumbing.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered: {0}")]
    EmailAlreadyRegistered(String),

    #[error("No active session")]
    NoActiveSession,

    #[error("Session store has not finished loading")]
    NotReady,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True for the outcomes a caller reports as a plain "failed" (bad login,
    /// duplicate signup) rather than a fault in the store itself.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::EmailAlreadyRegistered(_) | Self::NoActiveSession
        )
    }
}

impl From<duckdb::Error> for Error {
    fn from(e: duckdb::Error) -> Self {
        Self::Database(e.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Success flag plus payload or error message, the `--json` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_result_ok() {
        let result: OperationResult<i32> = OperationResult::ok(42);
        assert!(result.success);
        assert_eq!(result.data, Some(42));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_fail_envelope() {
        let err = Error::EmailAlreadyRegistered("jane@x.com".into());
        let result: OperationResult<()> = OperationResult::fail(err.to_string());
        assert!(!result.success);
        assert!(result.data.is_none());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("jane@x.com"));
    }

    #[test]
    fn test_rejection_classification() {
        assert!(Error::InvalidCredentials.is_rejection());
        assert!(Error::NoActiveSession.is_rejection());
        assert!(!Error::storage("disk full").is_rejection());
        assert!(!Error::NotReady.is_rejection());
    }
}
