//! Error types for the API server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::{ErrorResponse, NotFoundResponse};
use crate::store::StoreError;

/// Body returned for failures whose detail is not exposed to callers.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Body returned by the router fallback.
pub const ENDPOINT_NOT_FOUND_MESSAGE: &str = "Endpoint not found";

// == App Error Enum ==
/// Unified error type for the API server.
#[derive(Error, Debug)]
pub enum AppError {
    /// Cache key absent or expired
    #[error("Key \"{0}\" not found")]
    KeyNotFound(String),

    /// Store failure whose message is returned to the caller
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Request body could not be parsed
    #[error("{0}")]
    BadRequest(String),

    /// Body parsed but has the wrong shape; reported as a 500 with the message
    #[error("{0}")]
    UnexpectedBody(String),

    /// Failure reported with the generic message only
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Hides a store failure behind the generic 500 body.
    pub fn internal(err: StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::KeyNotFound(key) => (
                StatusCode::NOT_FOUND,
                Json(NotFoundResponse::new(format!("Key \"{}\" not found", key))),
            )
                .into_response(),
            AppError::Store(err) => {
                error!("Store operation failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(err.to_string())),
                )
                    .into_response()
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg))).into_response()
            }
            AppError::UnexpectedBody(msg) => {
                error!("Unusable request body: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(msg)),
                )
                    .into_response()
            }
            AppError::Internal(detail) => {
                error!("Unhandled error: {}", detail);
                internal_error_response()
            }
        }
    }
}

/// The generic 500 response.
pub fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(INTERNAL_ERROR_MESSAGE)),
    )
        .into_response()
}

// == Result Type Alias ==
/// Convenience Result type for the API server.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let response = AppError::KeyNotFound("missing".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_not_found_message() {
        let err = AppError::KeyNotFound("missing".to_string());
        assert_eq!(err.to_string(), "Key \"missing\" not found");
    }

    #[test]
    fn test_store_error_status() {
        let response = AppError::Store(StoreError::WrongType).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_hides_detail() {
        let err = AppError::internal(StoreError::WrongType);
        assert!(matches!(err, AppError::Internal(ref d) if d.contains("WRONGTYPE")));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unexpected_body_status() {
        let response = AppError::UnexpectedBody("expected object".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bad_request_status() {
        let response = AppError::BadRequest("expected value".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
