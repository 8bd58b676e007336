//! Image analysis request/result types.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{OperationFailure, RequestError};

/// Prepended to the instruction when the answer will be read aloud, so the
/// vision model answers the way a person would speak.
pub const SPOKEN_ANSWER_PREFIX: &str = "You have to answer user's command as if you were \
speaking to a human. The following is a question/prompt and you must answer it as naturally as \
possible, but dont yap for too long. Be only verbose when asked directly or necessary in this \
context: ";

/// Raw, unvalidated analysis input as it arrives from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageAnalysisParams {
    pub image_base64: Option<String>,
    pub instruction: Option<String>,
    pub wants_audio: bool,
}

/// A validated analysis request: image and instruction are both present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAnalysisRequest {
    image_base64: String,
    instruction: String,
    wants_audio: bool,
}

impl ImageAnalysisRequest {
    /// Check preconditions in order: image first, then instruction.
    pub fn from_params(params: ImageAnalysisParams) -> Result<Self, RequestError> {
        let image_base64 = params
            .image_base64
            .filter(|image| !image.is_empty())
            .ok_or(RequestError::MissingImage)?;
        let instruction = params
            .instruction
            .filter(|instruction| !instruction.is_empty())
            .ok_or(RequestError::MissingInstruction)?;

        Ok(Self {
            image_base64,
            instruction,
            wants_audio: params.wants_audio,
        })
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub const fn wants_audio(&self) -> bool {
        self.wants_audio
    }

    /// Prompt sent to the vision model.
    pub fn prompt(&self) -> String {
        if self.wants_audio {
            format!("{SPOKEN_ANSWER_PREFIX}{}", self.instruction)
        } else {
            self.instruction.clone()
        }
    }

    /// Decode the transported image. Accepts bare base64 or a `data:` URL.
    pub fn decode_image(&self) -> Result<ImageData, OperationFailure> {
        let encoded = match self.image_base64.split_once(";base64,") {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => self.image_base64.as_str(),
        };
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| OperationFailure::InvalidImageEncoding(e.to_string()))?;
        if bytes.is_empty() {
            return Err(OperationFailure::InvalidImageEncoding(
                "decoded image is empty".to_string(),
            ));
        }
        Ok(ImageData::new(bytes))
    }
}

/// Image formats the vision model accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMediaType {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageMediaType {
    /// Detect the format from magic bytes. Unknown data is assumed to be JPEG,
    /// which is what the app uploads.
    pub fn sniff(bytes: &[u8]) -> Self {
        match bytes {
            [0x89, b'P', b'N', b'G', ..] => Self::Png,
            [b'G', b'I', b'F', b'8', ..] => Self::Gif,
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Self::Webp,
            _ => Self::Jpeg,
        }
    }

    pub const fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

/// Decoded image bytes plus their detected format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub media_type: ImageMediaType,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>) -> Self {
        let media_type = ImageMediaType::sniff(&bytes);
        Self { bytes, media_type }
    }

    /// `data:` URL suitable for inline image inputs.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type.mime(),
            STANDARD.encode(&self.bytes)
        )
    }
}

/// Outcome of a successful analysis.
///
/// `audio` is only ever present when the request asked for audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAnalysisResult {
    pub message: String,
    pub audio: Option<Vec<u8>>,
}

impl ImageAnalysisResult {
    /// Audio encoded for transport.
    pub fn audio_base64(&self) -> Option<String> {
        self.audio.as_ref().map(|audio| STANDARD.encode(audio))
    }
}
