//! Fire-and-forget telemetry queue.
//!
//! Services push events into an unbounded channel and return immediately.
//! A single background task drains the channel and forwards each event to a
//! [`TelemetryCollector`], one at a time, so events are delivered in the
//! order they were captured. Collector failures are logged and dropped.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::TelemetryEvent;
use crate::ports::{TelemetryCollector, TelemetrySink};

/// Telemetry sink backed by a background delivery task.
#[derive(Debug, Clone)]
pub struct TelemetryQueue {
    sender: mpsc::UnboundedSender<TelemetryEvent>,
}

impl TelemetryQueue {
    /// Create the queue and spawn its delivery task on the current runtime.
    ///
    /// The task ends once every clone of the returned queue is dropped and
    /// the remaining events have been delivered.
    pub fn spawn(collector: Arc<dyn TelemetryCollector>) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(drain(receiver, collector));
        (Self { sender }, handle)
    }

    /// True once the delivery task is gone; further events are dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl TelemetrySink for TelemetryQueue {
    fn capture(&self, event: TelemetryEvent) {
        if let Err(mpsc::error::SendError(event)) = self.sender.send(event) {
            tracing::debug!(
                target: "pantry.telemetry",
                id = event.operation.id(),
                "Telemetry worker stopped; event dropped"
            );
        }
    }
}

async fn drain(
    mut receiver: mpsc::UnboundedReceiver<TelemetryEvent>,
    collector: Arc<dyn TelemetryCollector>,
) {
    while let Some(event) = receiver.recv().await {
        if let Err(e) = collector.collect(&event).await {
            tracing::warn!(
                target: "pantry.telemetry",
                id = event.operation.id(),
                severity = event.severity.as_str(),
                error = %e,
                "Failed to deliver telemetry event"
            );
        }
    }
    tracing::debug!(target: "pantry.telemetry", "Telemetry queue closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ProviderError;
    use crate::telemetry::{Operation, Severity};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collected {
        events: Mutex<Vec<TelemetryEvent>>,
        fail_errors: bool,
    }

    #[async_trait]
    impl TelemetryCollector for Collected {
        async fn collect(&self, event: &TelemetryEvent) -> Result<(), ProviderError> {
            self.events.lock().unwrap().push(event.clone());
            if self.fail_errors && event.severity == Severity::Error {
                return Err(ProviderError::Unavailable {
                    provider: "analytics",
                    message: "down".to_string(),
                });
            }
            Ok(())
        }
    }

    fn event(severity: Severity, description: &str) -> TelemetryEvent {
        TelemetryEvent::new(
            severity,
            Operation::FetchAllUsers,
            Some("u1"),
            Some(description.to_string()),
        )
    }

    #[tokio::test]
    async fn test_events_delivered_in_capture_order() {
        let collector = Arc::new(Collected::default());
        let (queue, handle) = TelemetryQueue::spawn(collector.clone());

        queue.capture(event(Severity::Info, "first"));
        queue.capture(event(Severity::Success, "second"));
        drop(queue);
        handle.await.unwrap();

        let events = collector.events.lock().unwrap();
        let descriptions: Vec<_> = events
            .iter()
            .map(|e| e.description.clone().unwrap())
            .collect();
        assert_eq!(descriptions, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_collector_failure_does_not_stop_delivery() {
        let collector = Arc::new(Collected {
            fail_errors: true,
            ..Collected::default()
        });
        let (queue, handle) = TelemetryQueue::spawn(collector.clone());

        queue.capture(event(Severity::Error, "boom"));
        queue.capture(event(Severity::Info, "after"));
        drop(queue);
        handle.await.unwrap();

        assert_eq!(collector.events.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_capture_after_worker_stops_is_silent() {
        let collector = Arc::new(Collected::default());
        let (queue, handle) = TelemetryQueue::spawn(collector);
        handle.abort();
        let _ = handle.await;

        assert!(queue.is_closed());
        queue.capture(event(Severity::Info, "dropped"));
    }
}
