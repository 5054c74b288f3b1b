//! Locale Lend Error Types
//!
//! Error handling for the record boundary, the one-time code ledger and
//! configuration loading. The trust engine and the ranking pipeline are total
//! over their typed inputs, so every variant here originates at an edge.

use serde::{Deserialize, Serialize};

/// Result type alias for Locale Lend operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Locale Lend Error Types
///
/// These errors are serializable so the glue layer can forward them over
/// HTTP or IPC unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "type", content = "message")]
pub enum Error {
    /// Invalid input parameter (negative counter, out-of-range rating, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Coordinates outside the valid longitude/latitude ranges
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// A document-store record is missing a required field or is malformed
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// No one-time code is pending for the key
    #[error("Code not found: {0}")]
    CodeNotFound(String),

    /// The one-time code exists but its lifetime has elapsed
    #[error("Code expired: {0}")]
    CodeExpired(String),

    /// The submitted one-time code does not match
    #[error("Code mismatch: {0}")]
    CodeMismatch(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (poisoned lock, unexpected condition)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid input error with context
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create an invalid record error with context
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Error::InvalidRecord(msg.into())
    }

    /// Check if the caller can retry after this error.
    ///
    /// An expired or mismatched code can be retried by requesting a new one.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::CodeNotFound(_) | Error::CodeExpired(_) | Error::CodeMismatch(_)
        )
    }

    /// Get the error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "LEND_INVALID_INPUT",
            Error::InvalidCoordinates(_) => "LEND_INVALID_COORDINATES",
            Error::InvalidRecord(_) => "LEND_INVALID_RECORD",
            Error::CodeNotFound(_) => "LEND_CODE_NOT_FOUND",
            Error::CodeExpired(_) => "LEND_CODE_EXPIRED",
            Error::CodeMismatch(_) => "LEND_CODE_MISMATCH",
            Error::Config(_) => "LEND_CONFIG",
            Error::Serialization(_) => "LEND_SERIALIZATION",
            Error::Internal(_) => "LEND_INTERNAL",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
