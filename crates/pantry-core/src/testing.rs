//! In-memory port implementations for tests.
//!
//! Available inside this crate's tests and, with the `test-utils` feature,
//! to downstream crates. Every fake records what it was asked so tests can
//! assert on call counts and payloads.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::{ContentItem, Identity, ImageData, NotificationRequest};
use crate::ports::{
    ContentStore, IdentityProvider, NoopTelemetry, ProviderError, Providers, PurchaseRecords,
    PushDelivery, SpeechModel, TelemetryCollector, TelemetrySink, VisionModel,
};
use crate::telemetry::{Severity, TelemetryEvent};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Identity provider over a fixed list.
#[derive(Debug, Default)]
pub struct InMemoryIdentities {
    identities: Vec<Identity>,
    failure: Option<ProviderError>,
}

impl InMemoryIdentities {
    pub const fn new(identities: Vec<Identity>) -> Self {
        Self {
            identities,
            failure: None,
        }
    }

    /// Every call fails with `failure`.
    pub const fn failing(failure: ProviderError) -> Self {
        Self {
            identities: Vec::new(),
            failure: Some(failure),
        }
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentities {
    async fn list_identities(&self) -> Result<Vec<Identity>, ProviderError> {
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(self.identities.clone()),
        }
    }

    async fn get_identity(&self, user_id: &str) -> Result<Identity, ProviderError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        self.identities
            .iter()
            .find(|identity| identity.user_id == user_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound {
                provider: "identity",
                id: user_id.to_string(),
            })
    }
}

/// Content store over a fixed list.
#[derive(Debug, Default)]
pub struct InMemoryContent {
    items: Vec<ContentItem>,
    failure: Option<ProviderError>,
}

impl InMemoryContent {
    pub const fn new(items: Vec<ContentItem>) -> Self {
        Self {
            items,
            failure: None,
        }
    }

    pub const fn failing(failure: ProviderError) -> Self {
        Self {
            items: Vec::new(),
            failure: Some(failure),
        }
    }
}

#[async_trait]
impl ContentStore for InMemoryContent {
    async fn list_items(&self) -> Result<Vec<ContentItem>, ProviderError> {
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(self.items.clone()),
        }
    }
}

/// Purchase records with a fixed set of premium users.
///
/// Any entitlement ID counts; lookups for users in the failing set error.
#[derive(Debug, Default)]
pub struct StaticEntitlements {
    premium: HashSet<String>,
    failing: HashSet<String>,
}

impl StaticEntitlements {
    pub fn premium(user_ids: &[&str]) -> Self {
        Self {
            premium: user_ids.iter().map(|id| (*id).to_string()).collect(),
            failing: HashSet::new(),
        }
    }

    pub fn failing_for(user_ids: &[&str]) -> Self {
        Self {
            premium: HashSet::new(),
            failing: user_ids.iter().map(|id| (*id).to_string()).collect(),
        }
    }
}

#[async_trait]
impl PurchaseRecords for StaticEntitlements {
    async fn has_entitlement(
        &self,
        user_id: &str,
        _entitlement: &str,
    ) -> Result<bool, ProviderError> {
        if self.failing.contains(user_id) {
            return Err(ProviderError::Unavailable {
                provider: "purchases",
                message: format!("lookup for {user_id} failed"),
            });
        }
        Ok(self.premium.contains(user_id))
    }
}

/// Push delivery that records every notification it accepts.
#[derive(Debug, Default)]
pub struct RecordingPush {
    delivered: Mutex<Vec<NotificationRequest>>,
    failure: Option<ProviderError>,
}

impl RecordingPush {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(failure: ProviderError) -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            failure: Some(failure),
        }
    }

    pub fn delivered(&self) -> Vec<NotificationRequest> {
        lock(&self.delivered).clone()
    }
}

#[async_trait]
impl PushDelivery for RecordingPush {
    async fn deliver(&self, notification: &NotificationRequest) -> Result<(), ProviderError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        lock(&self.delivered).push(notification.clone());
        Ok(())
    }
}

/// Vision model with a canned answer.
#[derive(Debug)]
pub struct ScriptedVision {
    answer: Result<String, ProviderError>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedVision {
    pub fn answering(answer: impl Into<String>) -> Self {
        Self {
            answer: Ok(answer.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(failure: ProviderError) -> Self {
        Self {
            answer: Err(failure),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

#[async_trait]
impl VisionModel for ScriptedVision {
    async fn describe(&self, _image: &ImageData, prompt: &str) -> Result<String, ProviderError> {
        lock(&self.prompts).push(prompt.to_string());
        self.answer.clone()
    }
}

/// Speech model with canned audio.
#[derive(Debug)]
pub struct ScriptedSpeech {
    audio: Result<Vec<u8>, ProviderError>,
    inputs: Mutex<Vec<String>>,
}

impl ScriptedSpeech {
    pub fn returning(audio: impl Into<Vec<u8>>) -> Self {
        Self {
            audio: Ok(audio.into()),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(failure: ProviderError) -> Self {
        Self {
            audio: Err(failure),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn inputs(&self) -> Vec<String> {
        lock(&self.inputs).clone()
    }
}

#[async_trait]
impl SpeechModel for ScriptedSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ProviderError> {
        lock(&self.inputs).push(text.to_string());
        self.audio.clone()
    }
}

/// Telemetry sink/collector that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TelemetryEvent> {
        lock(&self.events).clone()
    }

    pub fn severities(&self) -> Vec<Severity> {
        lock(&self.events).iter().map(|e| e.severity).collect()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn capture(&self, event: TelemetryEvent) {
        lock(&self.events).push(event);
    }
}

#[async_trait]
impl TelemetryCollector for RecordingTelemetry {
    async fn collect(&self, event: &TelemetryEvent) -> Result<(), ProviderError> {
        lock(&self.events).push(event.clone());
        Ok(())
    }
}

/// Builder for a [`Providers`] set made of fakes.
///
/// Defaults: no identities, no content, nobody premium, a recording push
/// provider, a vision model answering `"A grocery list."`, a speech model
/// returning three bytes of audio, and no telemetry.
pub struct TestProviders {
    providers: Providers,
}

impl Default for TestProviders {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProviders {
    pub fn new() -> Self {
        Self {
            providers: Providers {
                identities: Arc::new(InMemoryIdentities::default()),
                content: Arc::new(InMemoryContent::default()),
                purchases: Arc::new(StaticEntitlements::default()),
                push: Arc::new(RecordingPush::new()),
                vision: Arc::new(ScriptedVision::answering("A grocery list.")),
                speech: Arc::new(ScriptedSpeech::returning(b"ID3".to_vec())),
                telemetry: Arc::new(NoopTelemetry::new()),
            },
        }
    }

    #[must_use]
    pub fn with_identities(mut self, identities: Arc<dyn IdentityProvider>) -> Self {
        self.providers.identities = identities;
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: Arc<dyn ContentStore>) -> Self {
        self.providers.content = content;
        self
    }

    #[must_use]
    pub fn with_purchases(mut self, purchases: Arc<dyn PurchaseRecords>) -> Self {
        self.providers.purchases = purchases;
        self
    }

    #[must_use]
    pub fn with_push(mut self, push: Arc<dyn PushDelivery>) -> Self {
        self.providers.push = push;
        self
    }

    #[must_use]
    pub fn with_vision(mut self, vision: Arc<dyn VisionModel>) -> Self {
        self.providers.vision = vision;
        self
    }

    #[must_use]
    pub fn with_speech(mut self, speech: Arc<dyn SpeechModel>) -> Self {
        self.providers.speech = speech;
        self
    }

    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.providers.telemetry = telemetry;
        self
    }

    pub fn build(self) -> Providers {
        self.providers
    }
}
