//! Telemetry ports.
//!
//! Two sides:
//!
//! - [`TelemetrySink`] is what services call. It is synchronous and cannot
//!   fail, so recording an event can never change a request's outcome.
//! - [`TelemetryCollector`] is where events end up. It is async and fallible;
//!   [`crate::telemetry::TelemetryQueue`] sits between the two.

use async_trait::async_trait;

use super::ProviderError;
use crate::telemetry::TelemetryEvent;

/// Fire-and-forget event sink.
///
/// # Implementations
///
/// - [`NoopTelemetry`] - discards everything
/// - [`crate::telemetry::TelemetryQueue`] - hands events to a background collector
pub trait TelemetrySink: Send + Sync {
    /// Record an event. Must not block.
    fn capture(&self, event: TelemetryEvent);
}

/// Destination for telemetry events (analytics service, log stream, ...).
#[async_trait]
pub trait TelemetryCollector: Send + Sync {
    async fn collect(&self, event: &TelemetryEvent) -> Result<(), ProviderError>;
}

/// A sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl NoopTelemetry {
    pub const fn new() -> Self {
        Self
    }
}

impl TelemetrySink for NoopTelemetry {
    fn capture(&self, _event: TelemetryEvent) {
        // Intentionally do nothing
    }
}
