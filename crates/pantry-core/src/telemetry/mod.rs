//! Request lifecycle telemetry.
//!
//! Every callable operation records exactly one `Info` event when it starts
//! and exactly one terminal event (`Success` or `Error`) when it finishes.
//! Events flow through a [`crate::ports::TelemetrySink`]; in production that
//! is a [`TelemetryQueue`] feeding a [`crate::ports::TelemetryCollector`].

mod collector;
mod queue;
mod scope;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use collector::TracingCollector;
pub use queue::TelemetryQueue;
pub(crate) use scope::RequestTelemetry;

/// Lifecycle stage of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// Whether this event ends a request.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Info)
    }
}

/// Subsystem an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Db,
    Notif,
    Aikit,
}

impl EventSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Db => "db",
            Self::Notif => "notif",
            Self::Aikit => "aikit",
        }
    }
}

/// The callable operations that emit telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    FetchAllUsers,
    SendNotificationTo,
    AnalyzeImageContents,
}

impl Operation {
    /// Stable operation ID used by analytics dashboards.
    pub const fn id(self) -> &'static str {
        match self {
            Self::FetchAllUsers => "fetch_all_users",
            Self::SendNotificationTo => "send_notification_to",
            Self::AnalyzeImageContents => "analyze_image_contents",
        }
    }

    pub const fn source(self) -> EventSource {
        match self {
            Self::FetchAllUsers => EventSource::Db,
            Self::SendNotificationTo => EventSource::Notif,
            Self::AnalyzeImageContents => EventSource::Aikit,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// A single structured telemetry record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEvent {
    pub severity: Severity,
    #[serde(rename = "id")]
    pub operation: Operation,
    pub source: EventSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl TelemetryEvent {
    /// Build an event stamped with the current time.
    pub fn new(
        severity: Severity,
        operation: Operation,
        actor_user_id: Option<&str>,
        description: Option<String>,
    ) -> Self {
        Self {
            severity,
            operation,
            source: operation.source(),
            actor_user_id: actor_user_id.map(str::to_string),
            description,
            timestamp: Utc::now(),
        }
    }
}
