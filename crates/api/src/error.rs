//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, ErrorKind};
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found outside of a domain operation.
    #[error("{0}")]
    NotFound(String),

    /// The request body is missing, not JSON, or has the wrong shape.
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    /// Domain operation failed.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Domain(err) => status_for(err.kind()),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidBody(_) => ErrorKind::InvalidArgument.code(),
            ApiError::Domain(err) => err.kind().code(),
        }
    }
}

/// Maps a domain error kind to the status code reported to clients.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::CartNotFound | ErrorKind::ProductNotFound | ErrorKind::ItemNotFound => {
            StatusCode::NOT_FOUND
        }
        ErrorKind::ConcurrencyConflict | ErrorKind::InvalidStatusTransition => {
            StatusCode::CONFLICT
        }
        ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::InvalidArgument
        | ErrorKind::InsufficientStock
        | ErrorKind::InvalidQuantity
        | ErrorKind::EmptyCart
        | ErrorKind::CurrencyMismatch
        | ErrorKind::NegativeResult
        | ErrorKind::InvalidAmount
        | ErrorKind::InvalidCurrency => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "internal server error");
        }

        let body = serde_json::json!({ "error": self.to_string(), "code": self.code() });
        (status, axum::Json(body)).into_response()
    }
}
