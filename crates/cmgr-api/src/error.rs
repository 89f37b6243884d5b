//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps payload rejections from `cmgr-schema` to HTTP status codes and
//! returns JSON error bodies with an error code, a message, and, for field
//! rejections, one detail per offending field. Internal error details are
//! never exposed in responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cmgr_core::ValidationError;
use cmgr_schema::PayloadError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Per-field rejections, present only for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,
}

/// One rejected field of a write payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldViolation {
    /// Field name.
    pub field: String,
    /// Machine-readable rejection code (e.g., "NOT_IN_ENUMERATION").
    pub code: String,
    /// Human-readable reason.
    pub message: String,
}

impl From<&ValidationError> for FieldViolation {
    fn from(err: &ValidationError) -> Self {
        Self {
            field: err.field.clone(),
            code: err.reason.code().to_string(),
            message: err.reason.to_string(),
        }
    }
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown content type or entry (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// One or more fields of a write were rejected (400).
    #[error("validation error: {message}")]
    Validation {
        message: String,
        violations: Vec<FieldViolation>,
    },

    /// Request body could not be read or decoded (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let details = match self {
            Self::Validation { violations, .. } => Some(violations),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Field rejections become a 400 with per-field details; a payload that is
/// not an object is a plain bad request.
impl From<PayloadError> for AppError {
    fn from(err: PayloadError) -> Self {
        match &err {
            PayloadError::NotAnObject(_) => Self::BadRequest(err.to_string()),
            PayloadError::Rejected(errors) => Self::Validation {
                violations: errors.iter().map(FieldViolation::from).collect(),
                message: err.to_string(),
            },
        }
    }
}
