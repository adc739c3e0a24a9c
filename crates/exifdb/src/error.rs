//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use exifdb_core::{FetchError, ServiceError, StoreError};
use serde::Serialize;

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Error code for programmatic handling.
    pub code: &'static str,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Service(e) => match e {
                ServiceError::Fetch(FetchError::InvalidUrl { .. }) => "validation_error",
                ServiceError::Fetch(_) => "upstream_fetch_error",
                ServiceError::Extract(_) => "decode_error",
                ServiceError::Store(StoreError::InvalidIdentifier(_)) => "validation_error",
                ServiceError::Store(StoreError::Config(_)) => "config_error",
                ServiceError::Store(StoreError::Connection(_) | StoreError::Timeout { .. }) => {
                    "connection_error"
                }
                ServiceError::Store(_) => "store_error",
            },
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Service(e) => match e {
                ServiceError::Fetch(_) => StatusCode::BAD_REQUEST,
                ServiceError::Extract(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ServiceError::Store(StoreError::InvalidIdentifier(_)) => StatusCode::BAD_REQUEST,
                ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        } else {
            tracing::warn!(code = self.code(), error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
