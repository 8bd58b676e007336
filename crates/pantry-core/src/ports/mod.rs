//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No HTTP client types in any signature
//! - Every async port returns [`ProviderError`] on failure
//! - The telemetry sink is synchronous and infallible from the caller's side

pub mod content;
pub mod identity;
pub mod purchases;
pub mod push;
pub mod speech;
pub mod telemetry;
pub mod vision;

use std::sync::Arc;
use thiserror::Error;

pub use content::ContentStore;
pub use identity::IdentityProvider;
pub use purchases::PurchaseRecords;
pub use push::PushDelivery;
pub use speech::SpeechModel;
pub use telemetry::{NoopTelemetry, TelemetryCollector, TelemetrySink};
pub use vision::VisionModel;

/// Container for all outbound port trait objects.
///
/// Adapters build one of these at the composition root and hand it to
/// [`crate::services::PantryFunctions`].
#[derive(Clone)]
pub struct Providers {
    pub identities: Arc<dyn IdentityProvider>,
    pub content: Arc<dyn ContentStore>,
    pub purchases: Arc<dyn PurchaseRecords>,
    pub push: Arc<dyn PushDelivery>,
    pub vision: Arc<dyn VisionModel>,
    pub speech: Arc<dyn SpeechModel>,
    pub telemetry: Arc<dyn TelemetrySink>,
}

/// Failure reported by an external collaborator.
///
/// Adapters map their transport errors into this type at the port boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider could not be reached or timed out.
    #[error("{provider} unavailable: {message}")]
    Unavailable {
        provider: &'static str,
        message: String,
    },

    /// The provider answered with an error status.
    #[error("{provider} rejected the request with status {status}: {message}")]
    Rejected {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// The provider answered, but the payload was unusable.
    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },

    /// The requested record does not exist.
    #[error("{provider} has no record of {id}")]
    NotFound { provider: &'static str, id: String },

    /// The adapter is missing credentials or has an invalid endpoint.
    #[error("{provider} is misconfigured: {message}")]
    Configuration {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    /// Name of the provider that failed.
    pub const fn provider(&self) -> &'static str {
        match self {
            Self::Unavailable { provider, .. }
            | Self::Rejected { provider, .. }
            | Self::InvalidResponse { provider, .. }
            | Self::NotFound { provider, .. }
            | Self::Configuration { provider, .. } => provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name() {
        let err = ProviderError::NotFound {
            provider: "identity",
            id: "u1".to_string(),
        };
        assert_eq!(err.provider(), "identity");
        assert_eq!(err.to_string(), "identity has no record of u1");
    }

    #[test]
    fn test_rejected_message_includes_status() {
        let err = ProviderError::Rejected {
            provider: "openai",
            status: 429,
            message: "rate limited".to_string(),
        };
        assert!(err.to_string().contains("429"));
    }
}
