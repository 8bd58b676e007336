//! Domain types for the pantry backend.
//!
//! These are transient, per-request values. Nothing here is persisted by the
//! core; the types exist for the duration of one callable invocation.

mod analysis;
mod directory;
mod notification;

pub use analysis::{
    ImageAnalysisParams, ImageAnalysisRequest, ImageAnalysisResult, ImageData, ImageMediaType,
    SPOKEN_ANSWER_PREFIX,
};
pub use directory::{ContentItem, DirectoryEntry, Identity, NO_DISPLAY_NAME, count_by_author};
pub use notification::{NotificationRequest, PresentationHints, RecipientId};

/// Treat an empty string the same as an absent one.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
