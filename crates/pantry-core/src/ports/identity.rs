//! Identity provider port.

use async_trait::async_trait;

use super::ProviderError;
use crate::domain::Identity;

/// Registered-user directory of the auth provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// List every registered identity, in provider order.
    ///
    /// Implementations follow pagination to the end.
    async fn list_identities(&self) -> Result<Vec<Identity>, ProviderError>;

    /// Look up a single identity.
    async fn get_identity(&self, user_id: &str) -> Result<Identity, ProviderError>;
}
