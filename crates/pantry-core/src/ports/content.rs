//! Content store port.

use async_trait::async_trait;

use super::ProviderError;
use crate::domain::ContentItem;

/// Read access to the user-authored content collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Every item in the collection, with its author field.
    async fn list_items(&self) -> Result<Vec<ContentItem>, ProviderError>;
}
