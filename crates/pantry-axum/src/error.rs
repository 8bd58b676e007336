//! Axum-specific error types and mappings.
//!
//! Errors leave the server in the callable-protocol shape:
//! `{"error": {"status": "INVALID_ARGUMENT", "message": "No Image Provided"}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pantry_core::RequestError;
use serde::Serialize;
use thiserror::Error;

/// Axum-specific error type.
///
/// The message is shown to callers verbatim, so it never carries provider
/// detail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HttpError {
    /// No signed-in caller.
    #[error("{0}")]
    Unauthenticated(String),

    /// Missing or malformed input.
    #[error("{0}")]
    InvalidArgument(String),

    /// Anything that went wrong after validation.
    #[error("{0}")]
    Internal(String),
}

impl HttpError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Canonical status name used in the error body.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    status: &'static str,
    message: &'a str,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        let body = ErrorBody {
            error: ErrorDetail {
                status: self.code(),
                message: &message,
            },
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<RequestError> for HttpError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::NotAuthenticated => Self::Unauthenticated(err.to_string()),
            RequestError::MissingRecipient
            | RequestError::MissingImage
            | RequestError::MissingInstruction => Self::InvalidArgument(err.to_string()),
            RequestError::Server => Self::Internal(err.to_string()),
        }
    }
}
