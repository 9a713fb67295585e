//! Error types for cablecheck-dv
//!
//! Pipeline errors propagate unchanged up to the orchestrator; this module
//! is where they meet HTTP. Extraction failures and malformed oracle output
//! are bad-gateway-class (the upstream needs better input or behaved badly),
//! oracle transport failures are service-unavailable (retryable).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::{NormalizeError, ValidateError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upstream dependency failed or replied unusably (502)
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    /// Oracle unreachable (503) - the one retryable condition
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// cablecheck-common error
    #[error("Common error: {0}")]
    Common(#[from] cablecheck_common::Error),
}

impl From<ValidateError> for ApiError {
    fn from(err: ValidateError) -> Self {
        match err {
            ValidateError::Select(e) => ApiError::BadRequest(e.to_string()),
            ValidateError::Normalize(NormalizeError::RecordNotFound(id)) => {
                ApiError::NotFound(format!("Design ID not found: {}", id))
            }
            ValidateError::Normalize(NormalizeError::Extraction(e)) => {
                ApiError::BadGateway(e.to_string())
            }
            ValidateError::Normalize(NormalizeError::Storage(e)) => ApiError::Common(e),
            ValidateError::Oracle(e) => ApiError::ServiceUnavailable(e.to_string()),
            ValidateError::MalformedOracleResponse(e) => ApiError::BadGateway(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "BAD_GATEWAY", msg),
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                msg,
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg,
            ),
            ApiError::Io(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                err.to_string(),
            ),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "COMMON_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
