//! Request and response payloads for the callable operations.
//!
//! Field names match what the mobile app sends and decodes.

use pantry_core::{ImageAnalysisParams, ImageAnalysisResult};
use serde::{Deserialize, Serialize};

/// `fetchAllUsers` takes no input; any `data` is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchAllUsersRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendNotificationRequest {
    /// Recipient user ID.
    #[serde(rename = "userID", default, deserialize_with = "lenient::string")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImageRequest {
    #[serde(default, deserialize_with = "lenient::string")]
    pub image_base64: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub processing_command: Option<String>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub read_out_loud: Option<bool>,
}

impl From<AnalyzeImageRequest> for ImageAnalysisParams {
    fn from(req: AnalyzeImageRequest) -> Self {
        Self {
            image_base64: req.image_base64,
            instruction: req.processing_command,
            wants_audio: req.read_out_loud.unwrap_or(false),
        }
    }
}

/// Field decoders that read a value of the wrong JSON type as absent, so
/// the operation's own precondition checks produce the error.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn boolean<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(b) => Some(b),
            _ => None,
        })
    }
}

/// `{message, audio}`; `audio` is base64 MP3 or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzeImageResponse {
    pub message: String,
    pub audio: Option<String>,
}

impl From<ImageAnalysisResult> for AnalyzeImageResponse {
    fn from(result: ImageAnalysisResult) -> Self {
        let audio = result.audio_base64();
        Self {
            message: result.message,
            audio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_analyze_request_wire_names() {
        let req: AnalyzeImageRequest = serde_json::from_value(json!({
            "imageBase64": "aGk=",
            "processingCommand": "Read it",
            "readOutLoud": true
        }))
        .unwrap();
        let params = ImageAnalysisParams::from(req);

        assert_eq!(params.image_base64.as_deref(), Some("aGk="));
        assert_eq!(params.instruction.as_deref(), Some("Read it"));
        assert!(params.wants_audio);
    }

    #[test]
    fn test_read_out_loud_defaults_to_false() {
        let req: AnalyzeImageRequest = serde_json::from_value(json!({})).unwrap();
        assert!(!ImageAnalysisParams::from(req).wants_audio);
    }

    #[test]
    fn test_notification_request_wire_names() {
        let req: SendNotificationRequest =
            serde_json::from_value(json!({"userID": "bob", "message": "hi"})).unwrap();
        assert_eq!(req.user_id.as_deref(), Some("bob"));
        assert_eq!(req.message.as_deref(), Some("hi"));
    }

    #[test]
    fn test_mistyped_fields_read_as_absent() {
        let req: SendNotificationRequest =
            serde_json::from_value(json!({"userID": 42, "message": ["hi"]})).unwrap();
        assert_eq!(req, SendNotificationRequest::default());

        let req: AnalyzeImageRequest = serde_json::from_value(json!({
            "imageBase64": "aGk=",
            "processingCommand": {"text": "Read it"},
            "readOutLoud": "true"
        }))
        .unwrap();
        assert_eq!(req.image_base64.as_deref(), Some("aGk="));
        assert_eq!(req.processing_command, None);
        assert_eq!(req.read_out_loud, None);
    }

    #[test]
    fn test_response_keeps_null_audio() {
        let response = AnalyzeImageResponse::from(ImageAnalysisResult {
            message: "Eggs".to_string(),
            audio: None,
        });
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({"message": "Eggs", "audio": null})
        );

        let response = AnalyzeImageResponse::from(ImageAnalysisResult {
            message: "Eggs".to_string(),
            audio: Some(b"ID3".to_vec()),
        });
        assert_eq!(response.audio.as_deref(), Some("SUQz"));
    }
}
