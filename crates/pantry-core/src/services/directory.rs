//! User directory aggregation (`fetchAllUsers`).

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};

use super::EntitlementResolver;
use crate::domain::{DirectoryEntry, NO_DISPLAY_NAME, count_by_author};
use crate::error::{OperationFailure, RequestError};
use crate::ports::{ContentStore, IdentityProvider, TelemetrySink};
use crate::telemetry::{Operation, RequestTelemetry};

/// Builds the enriched user directory from identities, authored content and
/// entitlements.
pub struct DirectoryService {
    identities: Arc<dyn IdentityProvider>,
    content: Arc<dyn ContentStore>,
    entitlements: EntitlementResolver,
    telemetry: Arc<dyn TelemetrySink>,
    entitlement_concurrency: usize,
}

impl DirectoryService {
    pub fn new(
        identities: Arc<dyn IdentityProvider>,
        content: Arc<dyn ContentStore>,
        entitlements: EntitlementResolver,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            identities,
            content,
            entitlements,
            telemetry,
            entitlement_concurrency: 8,
        }
    }

    /// Limit how many entitlement lookups run at once. Zero is treated as one.
    #[must_use]
    pub const fn with_entitlement_concurrency(mut self, limit: usize) -> Self {
        self.entitlement_concurrency = limit;
        self
    }

    /// One entry per registered identity, in identity-provider order.
    pub async fn fetch_all_users(
        &self,
        caller: Option<&str>,
    ) -> Result<Vec<DirectoryEntry>, RequestError> {
        let scope = RequestTelemetry::start(
            Arc::clone(&self.telemetry),
            Operation::FetchAllUsers,
            caller,
            None,
        );

        match self.collect_entries().await {
            Ok(entries) => {
                tracing::debug!(count = entries.len(), "Fetched user directory");
                scope.succeed(None);
                Ok(entries)
            }
            Err(failure) => {
                tracing::error!(error = %failure, "Failed to fetch user directory");
                scope.fail(format!("Error fetching all users: {failure}"));
                Err(RequestError::Server)
            }
        }
    }

    async fn collect_entries(&self) -> Result<Vec<DirectoryEntry>, OperationFailure> {
        let identities = self.identities.list_identities().await?;
        let items = self.content.list_items().await?;
        let counts = count_by_author(&items);
        let counts = &counts;
        let resolver = &self.entitlements;

        let entries = stream::iter(identities)
            .map(|identity| async move {
                let has_premium = resolver.has_premium(&identity.user_id).await;
                DirectoryEntry {
                    post_count: counts
                        .get(identity.user_id.as_str())
                        .copied()
                        .unwrap_or(0),
                    display_name: identity.display_name_or(NO_DISPLAY_NAME).to_string(),
                    user_id: identity.user_id,
                    has_premium,
                }
            })
            .buffered(self.entitlement_concurrency.max(1))
            .collect()
            .await;

        Ok(entries)
    }
}
