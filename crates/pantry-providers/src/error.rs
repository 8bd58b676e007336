//! Internal error types for provider HTTP calls.
//!
//! These errors never leave the crate: every port implementation maps them
//! to [`ProviderError`] with [`ClientError::into_provider`].

use pantry_core::ProviderError;
use thiserror::Error;

/// Result type alias for provider HTTP calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Longest response body kept in a status error.
const MAX_BODY_EXCERPT: usize = 512;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with a non-success status.
    #[error("request to {url} failed with status {status}: {body}")]
    Status {
        status: u16,
        url: String,
        /// Start of the response body, for diagnostics.
        body: String,
    },

    /// The service answered 2xx but the payload was unusable.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// A credential or identifier needed for the call is not configured.
    #[error("{name} is not configured")]
    MissingCredential { name: &'static str },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl ClientError {
    pub(crate) fn status(status: u16, url: &str, body: &str) -> Self {
        let body = match body.char_indices().nth(MAX_BODY_EXCERPT) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body.to_string(),
        };
        Self::Status {
            status,
            url: url.to_string(),
            body,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// HTTP status of a [`ClientError::Status`], if that is what this is.
    pub(crate) const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Convert to the core port error, tagged with the provider's name.
    pub(crate) fn into_provider(self, provider: &'static str) -> ProviderError {
        match self {
            Self::Status { status, body, .. } => ProviderError::Rejected {
                provider,
                status,
                message: body,
            },
            Self::InvalidResponse { message } => ProviderError::InvalidResponse { provider, message },
            Self::MissingCredential { name } => ProviderError::Configuration {
                provider,
                message: format!("{name} is not configured"),
            },
            Self::Network(e) => ProviderError::Unavailable {
                provider,
                message: e.to_string(),
            },
            Self::InvalidUrl(e) => ProviderError::Configuration {
                provider,
                message: e.to_string(),
            },
            Self::JsonParse(e) => ProviderError::InvalidResponse {
                provider,
                message: e.to_string(),
            },
        }
    }
}
