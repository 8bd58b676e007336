//! PostHog telemetry collector.

use async_trait::async_trait;
use pantry_core::{ProviderError, TelemetryCollector, TelemetryEvent};
use serde_json::{Value, json};

use crate::config::PostHogConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpBackend, ReqwestBackend, endpoint};

const PROVIDER: &str = "analytics";

/// Distinct ID for events without a signed-in actor.
const ANONYMOUS: &str = "anonymous";

/// PostHog collector using the reqwest backend.
pub type DefaultPostHogCollector = PostHogCollector<ReqwestBackend>;

/// Forwards telemetry events to a PostHog-compatible `/capture/` endpoint.
pub struct PostHogCollector<B: HttpBackend> {
    backend: B,
    config: PostHogConfig,
}

fn capture_body(api_key: &str, event: &TelemetryEvent) -> Value {
    json!({
        "api_key": api_key,
        "event": event.operation.id(),
        "distinct_id": event.actor_user_id.as_deref().unwrap_or(ANONYMOUS),
        "timestamp": event.timestamp.to_rfc3339(),
        "properties": {
            "eventType": event.severity.as_str(),
            "source": event.source.as_str(),
            "longDescription": event.description,
        },
    })
}

impl DefaultPostHogCollector {
    pub fn new(config: &PostHogConfig, user_agent: &str) -> ClientResult<Self> {
        let backend = ReqwestBackend::new(config.timeout, user_agent)?;
        Ok(Self::with_backend(config.clone(), backend))
    }
}

impl<B: HttpBackend> PostHogCollector<B> {
    pub(crate) const fn with_backend(config: PostHogConfig, backend: B) -> Self {
        Self { backend, config }
    }

    async fn capture(&self, event: &TelemetryEvent) -> ClientResult<()> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ClientError::MissingCredential {
                name: "POSTHOG_API_KEY",
            })?;
        let url = endpoint(&self.config.host, &["capture", ""])?;
        let _: Value = self
            .backend
            .post_json(&url, None, &capture_body(key, event))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<B: HttpBackend> TelemetryCollector for PostHogCollector<B> {
    async fn collect(&self, event: &TelemetryEvent) -> Result<(), ProviderError> {
        self.capture(event)
            .await
            .map_err(|e| e.into_provider(PROVIDER))
    }
}
