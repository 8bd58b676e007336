#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// Clients are generic over the crate-private HTTP backend; callers only use
// the Default* aliases through the core port traits.
#![allow(private_interfaces, private_bounds)]

mod config;
mod error;
mod firebase;
mod http;
mod onesignal;
mod openai;
mod posthog;
mod revenuecat;

use std::sync::Arc;

use pantry_core::{ProviderError, Providers, TelemetryCollector, TelemetrySink, TracingCollector};

// ============================================================================
// Public API
// ============================================================================

// Clients
pub use firebase::{
    DefaultFirestoreClient, DefaultIdentityToolkitClient, FirestoreClient, IdentityToolkitClient,
};
pub use onesignal::{DefaultOneSignalClient, OneSignalClient};
pub use openai::{DefaultOpenAiClient, OpenAiClient};
pub use posthog::{DefaultPostHogCollector, PostHogCollector};
pub use revenuecat::{DefaultRevenueCatClient, RevenueCatClient};

// Configuration
pub use config::{
    ConfigError, GoogleConfig, OneSignalConfig, OpenAiConfig, PostHogConfig, ProvidersConfig,
    RevenueCatConfig, USER_AGENT,
};

/// Build every REST-backed port from `config`.
///
/// Fails only on malformed base URLs or when an HTTP client cannot be
/// created. Missing credentials are reported per call instead.
pub fn build_providers(
    config: &ProvidersConfig,
    telemetry: Arc<dyn TelemetrySink>,
) -> Result<Providers, ProviderError> {
    check_url("identity", &config.google.identity_base_url)?;
    check_url("content", &config.google.firestore_base_url)?;
    check_url("purchases", &config.revenuecat.base_url)?;
    check_url("push", &config.onesignal.base_url)?;
    check_url("openai", &config.openai.base_url)?;

    let identities = DefaultIdentityToolkitClient::new(&config.google, USER_AGENT)
        .map_err(|e| e.into_provider("identity"))?;
    let content = DefaultFirestoreClient::new(&config.google, USER_AGENT)
        .map_err(|e| e.into_provider("content"))?;
    let purchases = DefaultRevenueCatClient::new(&config.revenuecat, USER_AGENT)
        .map_err(|e| e.into_provider("purchases"))?;
    let push = DefaultOneSignalClient::new(&config.onesignal, USER_AGENT)
        .map_err(|e| e.into_provider("push"))?;
    let openai = Arc::new(
        DefaultOpenAiClient::new(&config.openai, USER_AGENT)
            .map_err(|e| e.into_provider("openai"))?,
    );

    Ok(Providers {
        identities: Arc::new(identities),
        content: Arc::new(content),
        purchases: Arc::new(purchases),
        push: Arc::new(push),
        vision: openai.clone(),
        speech: openai,
        telemetry,
    })
}

/// Telemetry destination: PostHog when an API key is set, otherwise the
/// tracing stream.
pub fn build_collector(
    config: &PostHogConfig,
) -> Result<Arc<dyn TelemetryCollector>, ProviderError> {
    if !config.is_enabled() {
        return Ok(Arc::new(TracingCollector));
    }
    check_url("analytics", &config.host)?;
    let collector = DefaultPostHogCollector::new(config, USER_AGENT)
        .map_err(|e| e.into_provider("analytics"))?;
    Ok(Arc::new(collector))
}

fn check_url(provider: &'static str, url: &str) -> Result<(), ProviderError> {
    http::endpoint(url, &[])
        .map(drop)
        .map_err(|e| e.into_provider(provider))
}
