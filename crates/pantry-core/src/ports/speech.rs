//! Text-to-speech model port.

use async_trait::async_trait;

use super::ProviderError;

/// Turns text into encoded audio (MP3 for the production adapter).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechModel: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ProviderError>;
}
