//! Vision-to-text-to-speech pipeline (`analyzeImageContents`).

use std::sync::Arc;

use crate::domain::{ImageAnalysisParams, ImageAnalysisRequest, ImageAnalysisResult};
use crate::error::{OperationFailure, RequestError};
use crate::ports::{SpeechModel, TelemetrySink, VisionModel};
use crate::telemetry::{Operation, RequestTelemetry};

/// Answers an instruction about an image, optionally as audio.
pub struct AnalysisPipeline {
    vision: Arc<dyn VisionModel>,
    speech: Arc<dyn SpeechModel>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl AnalysisPipeline {
    pub fn new(
        vision: Arc<dyn VisionModel>,
        speech: Arc<dyn SpeechModel>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            vision,
            speech,
            telemetry,
        }
    }

    pub async fn analyze_image_contents(
        &self,
        caller: Option<&str>,
        params: ImageAnalysisParams,
    ) -> Result<ImageAnalysisResult, RequestError> {
        let scope = RequestTelemetry::start(
            Arc::clone(&self.telemetry),
            Operation::AnalyzeImageContents,
            caller,
            Some(format!(
                "Image Processing Command: {}, readOutLoud: {}",
                params.instruction.as_deref().unwrap_or("null"),
                params.wants_audio
            )),
        );

        let request = match ImageAnalysisRequest::from_params(params) {
            Ok(request) => request,
            Err(e) => {
                scope.fail(e.to_string());
                return Err(e);
            }
        };

        match self.run(&request).await {
            Ok(result) => {
                scope.succeed(Some(format!("With audio: {}", request.wants_audio())));
                Ok(result)
            }
            Err(failure) => {
                tracing::error!(error = %failure, "Image analysis failed");
                scope.fail(format!("Error analyzing image contents: {failure}"));
                Err(RequestError::Server)
            }
        }
    }

    async fn run(
        &self,
        request: &ImageAnalysisRequest,
    ) -> Result<ImageAnalysisResult, OperationFailure> {
        let image = request.decode_image()?;

        let message = self.vision.describe(&image, &request.prompt()).await?;
        if message.trim().is_empty() {
            return Err(OperationFailure::VisionProcessingFailed);
        }

        if !request.wants_audio() {
            return Ok(ImageAnalysisResult {
                message,
                audio: None,
            });
        }

        let audio = self.speech.synthesize(&message).await?;
        if audio.is_empty() {
            return Err(OperationFailure::SpeechSynthesisFailed);
        }

        Ok(ImageAnalysisResult {
            message,
            audio: Some(audio),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SPOKEN_ANSWER_PREFIX;
    use crate::ports::ProviderError;
    use crate::ports::speech::MockSpeechModel;
    use crate::ports::vision::MockVisionModel;
    use crate::telemetry::Severity;
    use crate::testing::RecordingTelemetry;

    // "hello" is not a real image; the pipeline treats unknown bytes as JPEG.
    const IMAGE: &str = "aGVsbG8=";

    fn params(image: Option<&str>, instruction: Option<&str>, wants_audio: bool) -> ImageAnalysisParams {
        ImageAnalysisParams {
            image_base64: image.map(str::to_string),
            instruction: instruction.map(str::to_string),
            wants_audio,
        }
    }

    fn pipeline(
        vision: MockVisionModel,
        speech: MockSpeechModel,
        telemetry: &Arc<RecordingTelemetry>,
    ) -> AnalysisPipeline {
        AnalysisPipeline::new(Arc::new(vision), Arc::new(speech), telemetry.clone())
    }

    #[tokio::test]
    async fn test_text_only_never_calls_speech() {
        let mut vision = MockVisionModel::new();
        vision
            .expect_describe()
            .withf(|image, prompt| image.bytes == b"hello" && prompt == "What is on this list?")
            .times(1)
            .returning(|_, _| Ok("Eggs and milk".to_string()));
        let mut speech = MockSpeechModel::new();
        speech.expect_synthesize().never();
        let telemetry = Arc::new(RecordingTelemetry::new());

        let result = pipeline(vision, speech, &telemetry)
            .analyze_image_contents(Some("u1"), params(Some(IMAGE), Some("What is on this list?"), false))
            .await
            .unwrap();

        assert_eq!(result.message, "Eggs and milk");
        assert_eq!(result.audio, None);
        assert_eq!(result.audio_base64(), None);
        assert_eq!(telemetry.severities(), vec![Severity::Info, Severity::Success]);
        assert_eq!(
            telemetry.events()[0].description.as_deref(),
            Some("Image Processing Command: What is on this list?, readOutLoud: false")
        );
    }

    #[tokio::test]
    async fn test_audio_path_decorates_prompt_and_returns_audio() {
        let mut vision = MockVisionModel::new();
        vision
            .expect_describe()
            .withf(|_, prompt| {
                prompt.starts_with(SPOKEN_ANSWER_PREFIX) && prompt.ends_with("Read it")
            })
            .times(1)
            .returning(|_, _| Ok("You need eggs.".to_string()));
        let mut speech = MockSpeechModel::new();
        speech
            .expect_synthesize()
            .withf(|text| text == "You need eggs.")
            .times(1)
            .returning(|_| Ok(vec![0x49, 0x44, 0x33]));
        let telemetry = Arc::new(RecordingTelemetry::new());

        let result = pipeline(vision, speech, &telemetry)
            .analyze_image_contents(None, params(Some(IMAGE), Some("Read it"), true))
            .await
            .unwrap();

        assert_eq!(result.message, "You need eggs.");
        assert_eq!(result.audio.as_deref(), Some(&[0x49, 0x44, 0x33][..]));
        assert_eq!(result.audio_base64().as_deref(), Some("SUQz"));
    }

    #[tokio::test]
    async fn test_missing_image_never_calls_vision() {
        let mut vision = MockVisionModel::new();
        vision.expect_describe().never();
        let mut speech = MockSpeechModel::new();
        speech.expect_synthesize().never();
        let telemetry = Arc::new(RecordingTelemetry::new());
        let pipeline = pipeline(vision, speech, &telemetry);

        let result = pipeline
            .analyze_image_contents(Some("u1"), params(Some(""), Some("x"), true))
            .await;

        assert_eq!(result, Err(RequestError::MissingImage));
        assert_eq!(telemetry.severities(), vec![Severity::Info, Severity::Error]);
        assert_eq!(
            telemetry.events()[1].description.as_deref(),
            Some("No Image Provided")
        );
    }

    #[tokio::test]
    async fn test_missing_instruction() {
        let mut vision = MockVisionModel::new();
        vision.expect_describe().never();
        let telemetry = Arc::new(RecordingTelemetry::new());

        let result = pipeline(vision, MockSpeechModel::new(), &telemetry)
            .analyze_image_contents(Some("u1"), params(Some(IMAGE), None, false))
            .await;

        assert_eq!(result, Err(RequestError::MissingInstruction));
        assert_eq!(
            telemetry.events()[0].description.as_deref(),
            Some("Image Processing Command: null, readOutLoud: false")
        );
    }

    #[tokio::test]
    async fn test_empty_vision_answer_fails() {
        let mut vision = MockVisionModel::new();
        vision
            .expect_describe()
            .returning(|_, _| Ok("   ".to_string()));
        let mut speech = MockSpeechModel::new();
        speech.expect_synthesize().never();
        let telemetry = Arc::new(RecordingTelemetry::new());

        let result = pipeline(vision, speech, &telemetry)
            .analyze_image_contents(Some("u1"), params(Some(IMAGE), Some("x"), true))
            .await;

        assert_eq!(result, Err(RequestError::Server));
        assert!(
            telemetry.events()[1]
                .description
                .as_deref()
                .unwrap()
                .contains("Error Processing Image Contents")
        );
    }

    #[tokio::test]
    async fn test_empty_audio_fails() {
        let mut vision = MockVisionModel::new();
        vision
            .expect_describe()
            .returning(|_, _| Ok("answer".to_string()));
        let mut speech = MockSpeechModel::new();
        speech.expect_synthesize().returning(|_| Ok(Vec::new()));
        let telemetry = Arc::new(RecordingTelemetry::new());

        let result = pipeline(vision, speech, &telemetry)
            .analyze_image_contents(Some("u1"), params(Some(IMAGE), Some("x"), true))
            .await;

        assert_eq!(result, Err(RequestError::Server));
        assert!(
            telemetry.events()[1]
                .description
                .as_deref()
                .unwrap()
                .contains("Error Processing Audio")
        );
    }

    #[tokio::test]
    async fn test_provider_error_message_reaches_telemetry_only() {
        let mut vision = MockVisionModel::new();
        vision.expect_describe().returning(|_, _| {
            Err(ProviderError::Rejected {
                provider: "openai",
                status: 500,
                message: "model overloaded".to_string(),
            })
        });
        let telemetry = Arc::new(RecordingTelemetry::new());

        let err = pipeline(vision, MockSpeechModel::new(), &telemetry)
            .analyze_image_contents(Some("u1"), params(Some(IMAGE), Some("x"), false))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Server Error");
        let events = telemetry.events();
        assert_eq!(events.len(), 2);
        assert!(events[1].description.as_deref().unwrap().contains("model overloaded"));
    }

    #[tokio::test]
    async fn test_undecodable_image_is_server_error() {
        let mut vision = MockVisionModel::new();
        vision.expect_describe().never();
        let telemetry = Arc::new(RecordingTelemetry::new());

        let result = pipeline(vision, MockSpeechModel::new(), &telemetry)
            .analyze_image_contents(Some("u1"), params(Some("***"), Some("x"), false))
            .await;

        assert_eq!(result, Err(RequestError::Server));
        assert_eq!(telemetry.severities(), vec![Severity::Info, Severity::Error]);
    }
}
