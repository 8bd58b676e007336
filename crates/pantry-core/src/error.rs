//! Error taxonomy for the callable operations.
//!
//! Two layers:
//!
//! - [`OperationFailure`] is the detailed, server-side cause. It is written to
//!   telemetry and logs and never shown to the caller.
//! - [`RequestError`] is what the caller sees. Precondition failures keep a
//!   specific message; everything else collapses to `"Server Error"`.

use thiserror::Error;

use crate::ports::ProviderError;

/// Caller-facing error. `Display` is the exact message returned to the app.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RequestError {
    /// The request carried no authenticated caller.
    #[error("User Not Logged In")]
    NotAuthenticated,

    /// `sendNotificationTo` without a recipient.
    #[error("No Receiver UserID provided")]
    MissingRecipient,

    /// `analyzeImageContents` without an image.
    #[error("No Image Provided")]
    MissingImage,

    /// `analyzeImageContents` without an instruction.
    #[error("No Processing Command Provided")]
    MissingInstruction,

    /// Any provider or data failure. The cause is deliberately not exposed.
    #[error("Server Error")]
    Server,
}

impl RequestError {
    /// True for errors the caller can fix by changing the request.
    pub const fn is_precondition(self) -> bool {
        !matches!(self, Self::Server)
    }
}

/// Server-side cause of a failed request.
#[derive(Debug, Error)]
pub enum OperationFailure {
    /// An external collaborator failed or timed out.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The transported image could not be decoded.
    #[error("Invalid image encoding: {0}")]
    InvalidImageEncoding(String),

    /// The vision model returned no usable text.
    #[error("Error Processing Image Contents")]
    VisionProcessingFailed,

    /// The speech model returned no audio.
    #[error("Error Processing Audio")]
    SpeechSynthesisFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_facing_messages() {
        assert_eq!(RequestError::NotAuthenticated.to_string(), "User Not Logged In");
        assert_eq!(
            RequestError::MissingRecipient.to_string(),
            "No Receiver UserID provided"
        );
        assert_eq!(RequestError::MissingImage.to_string(), "No Image Provided");
        assert_eq!(
            RequestError::MissingInstruction.to_string(),
            "No Processing Command Provided"
        );
        assert_eq!(RequestError::Server.to_string(), "Server Error");
    }

    #[test]
    fn test_precondition_classification() {
        assert!(RequestError::MissingImage.is_precondition());
        assert!(!RequestError::Server.is_precondition());
    }

    #[test]
    fn test_provider_failure_is_transparent() {
        let failure = OperationFailure::from(ProviderError::Unavailable {
            provider: "push",
            message: "connection reset".to_string(),
        });
        assert!(failure.to_string().contains("connection reset"));
    }
}
