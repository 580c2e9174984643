//! Error handling module for the suggestions backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and
//! response bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Application error type.
///
/// A single-store failure never reaches the caller on its own: the failover
/// layer either serves the request from the other store or reports both
/// failures as `DualStoreFailure`.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or rejected input
    InvalidInput(String),
    /// Resource not found
    NotFound(String),
    /// Duplicate id on save
    Conflict(String),
    /// Both the primary and the fallback store failed
    DualStoreFailure { primary: String, fallback: String },
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DualStoreFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Conflict(msg) => msg.clone(),
            AppError::DualStoreFailure { .. } => "Both stores failed".to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::DualStoreFailure { primary, fallback } => {
                write!(
                    f,
                    "dual store failure: primary: {}; fallback: {}",
                    primary, fallback
                )
            }
            other => write!(f, "{}", other.message()),
        }
    }
}

impl std::error::Error for AppError {}

/// Error response body.
///
/// `details` and `fallback` only appear on a dual-store failure so ordinary
/// error bodies keep the plain `{error}` shape.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
}

impl ErrorBody {
    pub fn new(error: &AppError) -> Self {
        match error {
            AppError::DualStoreFailure { primary, fallback } => Self {
                error: "Both stores failed".to_string(),
                details: Some(format!("primary: {}; fallback: {}", primary, fallback)),
                fallback: Some(true),
            },
            other => Self {
                error: other.message(),
                details: None,
                fallback: None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, AppError::DualStoreFailure { .. }) {
            tracing::error!("request failed: {}", self);
        }
        let status = self.status_code();
        let body = ErrorBody::new(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dual_failure_body_carries_both_signals() {
        let err = AppError::DualStoreFailure {
            primary: "connection refused".to_string(),
            fallback: "corrupt document".to_string(),
        };
        let body = ErrorBody::new(&err);
        assert_eq!(body.fallback, Some(true));
        let details = body.details.unwrap();
        assert!(details.contains("connection refused"));
        assert!(details.contains("corrupt document"));
    }

    #[test]
    fn test_ordinary_error_body_has_no_fallback_marker() {
        let body = ErrorBody::new(&AppError::NotFound("Suggestion not found".to_string()));
        assert_eq!(body.error, "Suggestion not found");
        assert!(body.details.is_none());
        assert!(body.fallback.is_none());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::InvalidInput(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound(String::new()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict(String::new()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::DualStoreFailure {
                primary: String::new(),
                fallback: String::new()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
