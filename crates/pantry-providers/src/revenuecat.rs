//! RevenueCat client: resolves entitlements from subscriber records.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pantry_core::{ProviderError, PurchaseRecords};
use serde::Deserialize;

use crate::config::RevenueCatConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpBackend, ReqwestBackend, endpoint};

const PROVIDER: &str = "purchases";

/// RevenueCat client using the reqwest backend.
pub type DefaultRevenueCatClient = RevenueCatClient<ReqwestBackend>;

pub struct RevenueCatClient<B: HttpBackend> {
    backend: B,
    config: RevenueCatConfig,
}

#[derive(Debug, Deserialize)]
struct SubscriberResponse {
    subscriber: Subscriber,
}

#[derive(Debug, Deserialize)]
struct Subscriber {
    #[serde(default)]
    entitlements: HashMap<String, Entitlement>,
}

#[derive(Debug, Deserialize)]
struct Entitlement {
    /// Absent or null for lifetime purchases.
    #[serde(default)]
    expires_date: Option<String>,
}

impl Entitlement {
    fn is_active_at(&self, now: DateTime<Utc>) -> ClientResult<bool> {
        let Some(raw) = self.expires_date.as_deref() else {
            return Ok(true);
        };
        let expires = DateTime::parse_from_rfc3339(raw)
            .map_err(|e| ClientError::invalid(format!("bad expires_date {raw:?}: {e}")))?;
        Ok(expires.with_timezone(&Utc) > now)
    }
}

impl DefaultRevenueCatClient {
    pub fn new(config: &RevenueCatConfig, user_agent: &str) -> ClientResult<Self> {
        let backend = ReqwestBackend::new(config.timeout, user_agent)?;
        Ok(Self::with_backend(config.clone(), backend))
    }
}

impl<B: HttpBackend> RevenueCatClient<B> {
    pub(crate) const fn with_backend(config: RevenueCatConfig, backend: B) -> Self {
        Self { backend, config }
    }

    async fn lookup(&self, user_id: &str, entitlement: &str) -> ClientResult<bool> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ClientError::MissingCredential {
                name: "REVENUECAT_API_KEY",
            })?;
        let url = endpoint(&self.config.base_url, &["v1", "subscribers", user_id])?;

        let response: SubscriberResponse = match self
            .backend
            .get_json(&url, Some(&format!("Bearer {key}")))
            .await
        {
            Ok(response) => response,
            // Unknown subscribers have never purchased anything.
            Err(e) if e.status_code() == Some(404) => return Ok(false),
            Err(e) => return Err(e),
        };

        response
            .subscriber
            .entitlements
            .get(entitlement)
            .map_or(Ok(false), |held| held.is_active_at(Utc::now()))
    }
}

#[async_trait]
impl<B: HttpBackend> PurchaseRecords for RevenueCatClient<B> {
    async fn has_entitlement(
        &self,
        user_id: &str,
        entitlement: &str,
    ) -> Result<bool, ProviderError> {
        self.lookup(user_id, entitlement)
            .await
            .map_err(|e| e.into_provider(PROVIDER))
    }
}
