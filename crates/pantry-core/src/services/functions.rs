//! `PantryFunctions` - the callable-operations facade.
//!
//! Composes the three services over one set of providers. Adapters hold an
//! `Arc<PantryFunctions>` and call through to the individual services.

use std::sync::Arc;

use super::entitlements::DEFAULT_PREMIUM_ENTITLEMENT;
use super::{AnalysisPipeline, DirectoryService, EntitlementResolver, NotificationDispatcher};
use crate::domain::PresentationHints;
use crate::ports::Providers;

/// Tunables for the callable operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionsConfig {
    /// Entitlement identifier that marks a user as premium.
    pub premium_entitlement: String,
    /// Concurrent entitlement lookups while building the directory.
    pub entitlement_concurrency: usize,
    /// How notifications render in the foreground.
    pub notification_hints: PresentationHints,
}

impl Default for FunctionsConfig {
    fn default() -> Self {
        Self {
            premium_entitlement: DEFAULT_PREMIUM_ENTITLEMENT.to_string(),
            entitlement_concurrency: 8,
            notification_hints: PresentationHints::default(),
        }
    }
}

/// The three callable operations, wired to a set of providers.
pub struct PantryFunctions {
    directory: DirectoryService,
    notifications: NotificationDispatcher,
    analysis: AnalysisPipeline,
}

impl PantryFunctions {
    pub fn new(providers: Providers, config: FunctionsConfig) -> Self {
        let entitlements = EntitlementResolver::with_entitlement(
            Arc::clone(&providers.purchases),
            config.premium_entitlement,
        );

        let directory = DirectoryService::new(
            Arc::clone(&providers.identities),
            providers.content,
            entitlements,
            Arc::clone(&providers.telemetry),
        )
        .with_entitlement_concurrency(config.entitlement_concurrency);

        let notifications = NotificationDispatcher::new(
            providers.identities,
            providers.push,
            Arc::clone(&providers.telemetry),
        )
        .with_hints(config.notification_hints);

        let analysis = AnalysisPipeline::new(providers.vision, providers.speech, providers.telemetry);

        Self {
            directory,
            notifications,
            analysis,
        }
    }

    pub const fn directory(&self) -> &DirectoryService {
        &self.directory
    }

    pub const fn notifications(&self) -> &NotificationDispatcher {
        &self.notifications
    }

    pub const fn analysis(&self) -> &AnalysisPipeline {
        &self.analysis
    }
}
