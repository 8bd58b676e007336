//! Vision-language model port.

use async_trait::async_trait;

use super::ProviderError;
use crate::domain::ImageData;

/// Answers a natural-language prompt about an image.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Returns the model's text answer. An empty string means the model
    /// produced nothing usable; the caller decides what that means.
    async fn describe(&self, image: &ImageData, prompt: &str) -> Result<String, ProviderError>;
}
