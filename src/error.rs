//! Structured error types for reconciler operations.
//!
//! Storage failures never show up here: the store recovers them locally.

use crate::remote::RemoteFetchError;
use serde::Serialize;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    MissingRequiredField,

    // Not found errors
    TaskNotFound,

    // Id allocation
    IdSpaceExhausted,

    // Remote errors
    RemoteUnavailable,
    RemoteBadStatus,
    RemoteDecodeFailed,
    RemoteEmpty,
    RemoteDisabled,
}

/// Errors surfaced to the presentation layer.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("{field} is required")]
    Validation { field: &'static str },

    #[error("Task not found: {0}")]
    NotFound(i64),

    #[error("No task id left above {}", i64::MAX)]
    IdsExhausted,

    #[error("Could not load tasks from remote: {0}")]
    RemoteFetch(#[from] RemoteFetchError),
}

impl ReconcileError {
    pub fn missing_field(field: &'static str) -> Self {
        ReconcileError::Validation { field }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ReconcileError::Validation { .. } => ErrorCode::MissingRequiredField,
            ReconcileError::NotFound(_) => ErrorCode::TaskNotFound,
            ReconcileError::IdsExhausted => ErrorCode::IdSpaceExhausted,
            ReconcileError::RemoteFetch(err) => match err {
                RemoteFetchError::Network(_) => ErrorCode::RemoteUnavailable,
                RemoteFetchError::Status(_) => ErrorCode::RemoteBadStatus,
                RemoteFetchError::Decode(_) => ErrorCode::RemoteDecodeFailed,
                RemoteFetchError::EmptyPayload => ErrorCode::RemoteEmpty,
                RemoteFetchError::Disabled => ErrorCode::RemoteDisabled,
            },
        }
    }

    /// Serializable view for JSON output.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            message: self.to_string(),
            field: match self {
                ReconcileError::Validation { field } => Some(*field),
                _ => None,
            },
        }
    }
}

/// Wire shape of a reconciler error.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

/// Result type for reconciler operations.
pub type ReconcileResult<T> = std::result::Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_serialize_screaming_snake() {
        let body = ReconcileError::NotFound(42).to_body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "TASK_NOT_FOUND");
        assert_eq!(json["message"], "Task not found: 42");
        assert!(json.get("field").is_none());
    }

    #[test]
    fn test_validation_carries_field() {
        let err = ReconcileError::missing_field("title");
        assert_eq!(err.code(), ErrorCode::MissingRequiredField);
        assert_eq!(err.to_string(), "title is required");
        assert_eq!(err.to_body().field, Some("title"));
    }

    #[test]
    fn test_remote_codes() {
        let err: ReconcileError = RemoteFetchError::EmptyPayload.into();
        assert_eq!(err.code(), ErrorCode::RemoteEmpty);
        let err: ReconcileError = RemoteFetchError::Status(503).into();
        assert_eq!(err.code(), ErrorCode::RemoteBadStatus);
    }
}
