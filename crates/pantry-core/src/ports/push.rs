//! Push delivery port.

use async_trait::async_trait;

use super::ProviderError;
use crate::domain::NotificationRequest;

/// Delivers a notification to every device of the addressed recipient.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushDelivery: Send + Sync {
    async fn deliver(&self, notification: &NotificationRequest) -> Result<(), ProviderError>;
}
