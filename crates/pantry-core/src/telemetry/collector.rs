//! Collector that writes telemetry into the tracing stream.

use async_trait::async_trait;

use super::{Severity, TelemetryEvent};
use crate::ports::{ProviderError, TelemetryCollector};

/// Default collector when no analytics service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingCollector;

#[async_trait]
impl TelemetryCollector for TracingCollector {
    async fn collect(&self, event: &TelemetryEvent) -> Result<(), ProviderError> {
        let actor = event.actor_user_id.as_deref().unwrap_or("-");
        let description = event.description.as_deref().unwrap_or("");
        match event.severity {
            Severity::Error => tracing::warn!(
                target: "pantry.telemetry",
                severity = event.severity.as_str(),
                id = event.operation.id(),
                source = event.source.as_str(),
                actor,
                "{description}"
            ),
            Severity::Info | Severity::Success => tracing::info!(
                target: "pantry.telemetry",
                severity = event.severity.as_str(),
                id = event.operation.id(),
                source = event.source.as_str(),
                actor,
                "{description}"
            ),
        }
        Ok(())
    }
}
