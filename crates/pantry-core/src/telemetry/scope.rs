//! Per-request telemetry scope.

use std::sync::Arc;

use super::{Operation, Severity, TelemetryEvent};
use crate::ports::TelemetrySink;

/// Description recorded when a request is dropped before it finishes.
pub(crate) const CANCELLED: &str = "Request cancelled";

/// Records the start event on creation; the terminal methods take `self`,
/// so a request can end at most once. Dropping an unfinished scope (client
/// disconnect, timeout) records an error event.
pub(crate) struct RequestTelemetry {
    sink: Arc<dyn TelemetrySink>,
    operation: Operation,
    actor: Option<String>,
    finished: bool,
}

impl RequestTelemetry {
    pub(crate) fn start(
        sink: Arc<dyn TelemetrySink>,
        operation: Operation,
        actor: Option<&str>,
        description: Option<String>,
    ) -> Self {
        sink.capture(TelemetryEvent::new(
            Severity::Info,
            operation,
            actor,
            description,
        ));
        Self {
            sink,
            operation,
            actor: actor.map(str::to_string),
            finished: false,
        }
    }

    pub(crate) fn succeed(self, description: Option<String>) {
        self.finish(Severity::Success, description);
    }

    pub(crate) fn fail(self, description: impl Into<String>) {
        self.finish(Severity::Error, Some(description.into()));
    }

    fn finish(mut self, severity: Severity, description: Option<String>) {
        self.emit(severity, description);
        self.finished = true;
    }

    fn emit(&self, severity: Severity, description: Option<String>) {
        self.sink.capture(TelemetryEvent::new(
            severity,
            self.operation,
            self.actor.as_deref(),
            description,
        ));
    }
}

impl Drop for RequestTelemetry {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!(operation = self.operation.id(), "Request dropped before finishing");
            self.emit(Severity::Error, Some(CANCELLED.to_string()));
        }
    }
}
