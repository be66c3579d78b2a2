//! Error types for the caching and resilience layer
//!
//! Provides the backing-store error taxonomy, the timeout error raised by the
//! timeout guard, and the HTTP-facing error used by the operational endpoints.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Non-retryable message fragments ==
/// Message fragments that mark a driver error as fatal. Matched case-insensitively.
const FATAL_MESSAGE_PATTERNS: [(&str, ErrorKind); 4] = [
    ("argument validation failed", ErrorKind::Validation),
    ("invalid input", ErrorKind::InvalidInput),
    ("record not found", ErrorKind::NotFound),
    ("unique constraint", ErrorKind::Constraint),
];

// == Error Kind ==
/// Category of a backing-store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network blip, dropped connection or generic backend exception
    Transient,
    /// Argument validation failed
    Validation,
    /// Malformed input rejected by the store
    InvalidInput,
    /// Record not found
    NotFound,
    /// Unique constraint violation
    Constraint,
    /// The caller stopped waiting for the operation
    Timeout,
}

impl ErrorKind {
    /// Whether errors of this kind are retried unless overridden.
    pub fn default_retryable(self) -> bool {
        matches!(self, ErrorKind::Transient | ErrorKind::Timeout)
    }
}

// == Store Error ==
/// Error returned by operations against the backing store.
///
/// Retryability is decided when the error is constructed and carried with it,
/// so the retry executor never has to inspect message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct StoreError {
    kind: ErrorKind,
    message: String,
    retryable: bool,
}

impl StoreError {
    /// Creates an error of the given kind with that kind's default retryability.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: kind.default_retryable(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transient, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Constraint, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Classifies a free-form driver message.
    ///
    /// Messages containing one of the known fatal fragments become the matching
    /// fatal kind; everything else is transient.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();
        let kind = FATAL_MESSAGE_PATTERNS
            .iter()
            .find(|(pattern, _)| lowered.contains(pattern))
            .map(|(_, kind)| *kind)
            .unwrap_or(ErrorKind::Transient);
        Self::new(kind, message)
    }

    /// Overrides the retryability chosen by the kind.
    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

// == Retryable ==
/// Errors that know whether another attempt could succeed.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for StoreError {
    fn is_retryable(&self) -> bool {
        self.retryable
    }
}

// == Timeout Error ==
/// Raised by the timeout guard when the caller gives up waiting.
///
/// The wrapped operation may still be running, and may still succeed or fail
/// on its own afterwards.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutError {
    #[error("operation timed out after {}ms", .0.as_millis())]
    Elapsed(Duration),

    /// The detached operation was cancelled by the runtime before settling
    #[error("operation was aborted before completing")]
    Aborted,
}

impl Retryable for TimeoutError {
    fn is_retryable(&self) -> bool {
        true
    }
}

impl From<TimeoutError> for StoreError {
    fn from(err: TimeoutError) -> Self {
        StoreError::timeout(err.to_string())
    }
}

// == API Error ==
/// Error type for the operational HTTP endpoints.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "status": "error",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for backing-store operations.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_constructors_carry_retryability() {
        assert!(StoreError::transient("connection reset").is_retryable());
        assert!(StoreError::timeout("slow").is_retryable());
        assert!(!StoreError::validation("bad").is_retryable());
        assert!(!StoreError::invalid_input("bad").is_retryable());
        assert!(!StoreError::not_found("gone").is_retryable());
        assert!(!StoreError::constraint("dup").is_retryable());
    }

    #[test]
    fn test_from_message_fatal_patterns() {
        let err = StoreError::from_message("Unique constraint failed on the fields: (`sku`)");
        assert_eq!(err.kind(), ErrorKind::Constraint);
        assert!(!err.is_retryable());

        let err = StoreError::from_message("Argument validation failed for `price`");
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = StoreError::from_message("INVALID INPUT: quantity");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = StoreError::from_message("Record not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_from_message_defaults_to_transient() {
        let err = StoreError::from_message("connection was forcibly closed");
        assert_eq!(err.kind(), ErrorKind::Transient);
        assert!(err.is_retryable());
        assert_eq!(err.message(), "connection was forcibly closed");
    }

    #[test]
    fn test_with_retryable_override() {
        let err = StoreError::not_found("order 42").with_retryable(true);
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_timeout_converts_to_store_error() {
        let err: StoreError = TimeoutError::Elapsed(Duration::from_millis(250)).into();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "operation timed out after 250ms");
    }

    #[test]
    fn test_api_error_status_code() {
        let response = ApiError::InvalidRequest("empty pattern".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
