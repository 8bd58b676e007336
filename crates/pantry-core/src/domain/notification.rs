//! Push notification payload types.

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// A recipient user ID that is known to be non-empty.
///
/// The only way to obtain one is [`RecipientId::parse`], so every
/// [`NotificationRequest`] is addressed to somebody.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientId(String);

impl RecipientId {
    /// Validate a raw recipient field.
    pub fn parse(raw: Option<&str>) -> Result<Self, RequestError> {
        super::non_empty(raw)
            .map(|id| Self(id.to_string()))
            .ok_or(RequestError::MissingRecipient)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecipientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the app renders the notification when it arrives in the foreground.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationHints {
    /// SF Symbol name.
    pub symbol: String,
    /// Hex color, e.g. `#ae0000`.
    pub color: String,
    pub size: String,
    pub haptic_style: String,
}

impl Default for PresentationHints {
    fn default() -> Self {
        Self {
            symbol: "bolt.fill".to_string(),
            color: "#ae0000".to_string(),
            size: "compact".to_string(),
            haptic_style: "error".to_string(),
        }
    }
}

/// A user-to-user notification, ready for the push provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub recipient: RecipientId,
    pub sender: String,
    /// May be empty.
    pub message: String,
    pub hints: PresentationHints,
}

impl NotificationRequest {
    pub fn new(recipient: RecipientId, sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            recipient,
            sender: sender.into(),
            message: message.into(),
            hints: PresentationHints::default(),
        }
    }

    #[must_use]
    pub fn with_hints(mut self, hints: PresentationHints) -> Self {
        self.hints = hints;
        self
    }

    /// Notification title shown to the recipient.
    pub fn title(&self) -> String {
        format!("Message from {}", self.sender)
    }
}
