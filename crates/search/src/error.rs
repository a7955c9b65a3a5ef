//! Error types for the search crate.

use crate::RecordId;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
///
/// Every error is local to the call that produced it: a failed mutation
/// leaves the index exactly as it was before the call.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A record with this id is already indexed
    #[error("Duplicate record id: {0}")]
    DuplicateId(RecordId),

    /// No record with this id is indexed
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    /// Caller passed an out-of-contract argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A persisted index failed validation
    #[error("Corrupt index: {0}")]
    CorruptIndex(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Stable error codes for hosts that can't match on the enum.
/// Range: 11xxx for search errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    /// Duplicate record id
    DuplicateId = 11001,
    /// Record not found
    NotFound = 11002,
    /// Invalid argument
    InvalidArgument = 11003,
    /// Corrupt persisted index
    CorruptIndex = 11004,
    /// JSON parsing or serialization
    Json = 11005,
}

impl SearchError {
    /// Returns the error code for this error.
    pub fn code(&self) -> SearchErrorCode {
        match self {
            SearchError::DuplicateId(_) => SearchErrorCode::DuplicateId,
            SearchError::NotFound(_) => SearchErrorCode::NotFound,
            SearchError::InvalidArgument(_) => SearchErrorCode::InvalidArgument,
            SearchError::CorruptIndex(_) => SearchErrorCode::CorruptIndex,
            SearchError::Json(_) => SearchErrorCode::Json,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SearchError::InvalidArgument(message.into())
    }
}

/// Error payload for hosts, as thrown by the wasm bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub code: u32,
    pub message: String,
}

impl From<&SearchError> for ErrorReport {
    fn from(e: &SearchError) -> Self {
        Self {
            code: e.code() as u32,
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SearchError::DuplicateId(1).code() as u32, 11001);
        assert_eq!(SearchError::NotFound(1).code() as u32, 11002);
        assert_eq!(SearchError::invalid("x").code(), SearchErrorCode::InvalidArgument);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(SearchError::NotFound(42).to_string(), "Record not found: 42");
        assert_eq!(
            SearchError::invalid("max_results must be > 0").to_string(),
            "Invalid argument: max_results must be > 0"
        );
    }

    #[test]
    fn test_error_report() {
        let report = ErrorReport::from(&SearchError::DuplicateId(7));
        assert_eq!(report.code, 11001);
        assert_eq!(report.message, "Duplicate record id: 7");
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({"code": 11001, "message": "Duplicate record id: 7"})
        );
    }
}
