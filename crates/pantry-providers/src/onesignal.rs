//! OneSignal client: delivers user-to-user push notifications.

use async_trait::async_trait;
use pantry_core::{NotificationRequest, ProviderError, PushDelivery};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::OneSignalConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpBackend, ReqwestBackend, endpoint};

const PROVIDER: &str = "push";

/// OneSignal client using the reqwest backend.
pub type DefaultOneSignalClient = OneSignalClient<ReqwestBackend>;

/// Sends notifications addressed by external user ID.
pub struct OneSignalClient<B: HttpBackend> {
    backend: B,
    config: OneSignalConfig,
}

#[derive(Debug, Deserialize)]
struct CreateNotificationResponse {
    #[serde(default)]
    id: Option<String>,
    /// Either a list of messages or an object keyed by error kind.
    #[serde(default)]
    errors: Option<Value>,
}

impl CreateNotificationResponse {
    /// OneSignal answers 200 with an empty ID when no device matched.
    fn into_result(self) -> ClientResult<String> {
        let has_errors = match &self.errors {
            None | Some(Value::Null) => false,
            Some(Value::Array(list)) => !list.is_empty(),
            Some(Value::Object(map)) => !map.is_empty(),
            Some(_) => true,
        };
        match self.id.filter(|id| !id.is_empty()) {
            Some(id) if !has_errors => Ok(id),
            _ => Err(ClientError::invalid(format!(
                "notification not created: {}",
                self.errors.unwrap_or(Value::Null)
            ))),
        }
    }
}

/// Request body for `POST /api/v1/notifications`.
fn notification_body(app_id: &str, notification: &NotificationRequest) -> Value {
    json!({
        "app_id": app_id,
        "target_channel": "push",
        "include_aliases": { "external_id": [notification.recipient.as_str()] },
        "headings": { "en": notification.title() },
        "contents": { "en": notification.message },
        "data": {
            "inAppSymbol": notification.hints.symbol,
            "inAppColor": notification.hints.color,
            "inAppSize": notification.hints.size,
            "inAppHaptics": notification.hints.haptic_style,
        },
    })
}

impl DefaultOneSignalClient {
    pub fn new(config: &OneSignalConfig, user_agent: &str) -> ClientResult<Self> {
        let backend = ReqwestBackend::new(config.timeout, user_agent)?;
        Ok(Self::with_backend(config.clone(), backend))
    }
}

impl<B: HttpBackend> OneSignalClient<B> {
    pub(crate) const fn with_backend(config: OneSignalConfig, backend: B) -> Self {
        Self { backend, config }
    }

    async fn send(&self, notification: &NotificationRequest) -> ClientResult<String> {
        let app_id = self
            .config
            .app_id
            .as_deref()
            .ok_or(ClientError::MissingCredential {
                name: "ONESIGNAL_APP_ID",
            })?;
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ClientError::MissingCredential {
                name: "ONESIGNAL_API_KEY",
            })?;
        let url = endpoint(&self.config.base_url, &["api", "v1", "notifications"])?;

        let response: CreateNotificationResponse = self
            .backend
            .post_json(
                &url,
                Some(&format!("Key {key}")),
                &notification_body(app_id, notification),
            )
            .await?;
        response.into_result()
    }
}

#[async_trait]
impl<B: HttpBackend> PushDelivery for OneSignalClient<B> {
    async fn deliver(&self, notification: &NotificationRequest) -> Result<(), ProviderError> {
        let id = self
            .send(notification)
            .await
            .map_err(|e| e.into_provider(PROVIDER))?;
        tracing::debug!(
            notification_id = %id,
            recipient = %notification.recipient,
            "Push notification accepted"
        );
        Ok(())
    }
}
