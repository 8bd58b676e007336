//! Purchase records port.

use async_trait::async_trait;

use super::ProviderError;

/// In-app purchase records, keyed by user ID.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PurchaseRecords: Send + Sync {
    /// Whether `user_id` currently holds `entitlement`.
    ///
    /// A user with no purchase record holds nothing and yields `Ok(false)`.
    async fn has_entitlement(&self, user_id: &str, entitlement: &str)
    -> Result<bool, ProviderError>;
}
