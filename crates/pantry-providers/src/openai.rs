//! OpenAI client: image understanding (chat completions) and text-to-speech.

use async_trait::async_trait;
use pantry_core::{ImageData, ProviderError, SpeechModel, VisionModel};
use serde::Deserialize;
use serde_json::json;

use crate::config::OpenAiConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpBackend, ReqwestBackend, endpoint};

const PROVIDER: &str = "openai";

/// OpenAI client using the reqwest backend.
pub type DefaultOpenAiClient = OpenAiClient<ReqwestBackend>;

/// One client serves both the vision and the speech port.
pub struct OpenAiClient<B: HttpBackend> {
    backend: B,
    config: OpenAiConfig,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl DefaultOpenAiClient {
    pub fn new(config: &OpenAiConfig, user_agent: &str) -> ClientResult<Self> {
        let backend = ReqwestBackend::new(config.timeout, user_agent)?;
        Ok(Self::with_backend(config.clone(), backend))
    }
}

impl<B: HttpBackend> OpenAiClient<B> {
    pub(crate) const fn with_backend(config: OpenAiConfig, backend: B) -> Self {
        Self { backend, config }
    }

    fn authorization(&self) -> ClientResult<String> {
        self.config
            .api_key
            .as_deref()
            .map(|key| format!("Bearer {key}"))
            .ok_or(ClientError::MissingCredential {
                name: "OPENAI_API_KEY",
            })
    }

    async fn complete(&self, image: &ImageData, prompt: &str) -> ClientResult<String> {
        let auth = self.authorization()?;
        let url = endpoint(&self.config.base_url, &["v1", "chat", "completions"])?;
        let body = json!({
            "model": self.config.vision_model,
            "max_tokens": self.config.max_tokens,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": image.data_url() } },
                ],
            }],
        });

        let completion: ChatCompletion = self.backend.post_json(&url, Some(&auth), &body).await?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::invalid("completion has no choices"))?;

        // A null message body is passed on as empty text.
        Ok(choice.message.content.unwrap_or_default())
    }

    async fn speak(&self, text: &str) -> ClientResult<Vec<u8>> {
        let auth = self.authorization()?;
        let url = endpoint(&self.config.base_url, &["v1", "audio", "speech"])?;
        let body = json!({
            "model": self.config.speech_model,
            "voice": self.config.voice,
            "input": text,
            "response_format": "mp3",
        });

        self.backend.post_bytes(&url, Some(&auth), &body).await
    }
}

#[async_trait]
impl<B: HttpBackend> VisionModel for OpenAiClient<B> {
    async fn describe(&self, image: &ImageData, prompt: &str) -> Result<String, ProviderError> {
        tracing::debug!(
            model = %self.config.vision_model,
            image_bytes = image.bytes.len(),
            media_type = image.media_type.mime(),
            "Requesting image description"
        );
        self.complete(image, prompt)
            .await
            .map_err(|e| e.into_provider(PROVIDER))
    }
}

#[async_trait]
impl<B: HttpBackend> SpeechModel for OpenAiClient<B> {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ProviderError> {
        let audio = self
            .speak(text)
            .await
            .map_err(|e| e.into_provider(PROVIDER))?;
        tracing::debug!(
            model = %self.config.speech_model,
            audio_bytes = audio.len(),
            "Synthesized speech"
        );
        Ok(audio)
    }
}
