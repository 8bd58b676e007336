//! Google Firebase REST clients (Identity Toolkit and Firestore).

mod firestore;
mod identity;

pub use firestore::{DefaultFirestoreClient, FirestoreClient};
pub use identity::{DefaultIdentityToolkitClient, IdentityToolkitClient};

use crate::config::GoogleConfig;
use crate::error::{ClientError, ClientResult};

impl GoogleConfig {
    pub(crate) fn require_project(&self) -> ClientResult<&str> {
        self.project_id
            .as_deref()
            .ok_or(ClientError::MissingCredential {
                name: "GOOGLE_CLOUD_PROJECT",
            })
    }

    pub(crate) fn authorization(&self) -> ClientResult<String> {
        self.access_token
            .as_deref()
            .map(|token| format!("Bearer {token}"))
            .ok_or(ClientError::MissingCredential {
                name: "GOOGLE_ACCESS_TOKEN",
            })
    }

    /// Page size clamped to what the APIs accept.
    pub(crate) fn page_size(&self) -> u32 {
        self.page_size.clamp(1, 1000)
    }
}
