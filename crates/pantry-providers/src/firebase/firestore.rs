//! Firestore REST client: scans the content collection for author IDs.

use std::collections::HashMap;

use async_trait::async_trait;
use pantry_core::{ContentItem, ContentStore, ProviderError};
use serde::Deserialize;
use serde_json::Value;

use crate::config::GoogleConfig;
use crate::error::ClientResult;
use crate::http::{HttpBackend, ReqwestBackend, endpoint};

const PROVIDER: &str = "content";

/// Firestore client using the reqwest backend.
pub type DefaultFirestoreClient = FirestoreClient<ReqwestBackend>;

/// Reads every document of one collection, keeping only the author field.
pub struct FirestoreClient<B: HttpBackend> {
    backend: B,
    config: GoogleConfig,
}

#[derive(Debug, Deserialize)]
struct Document {
    /// Full resource name, `projects/.../documents/posts/<id>`.
    name: String,
    #[serde(default)]
    fields: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentPage {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl Document {
    fn into_item(self, author_field: &str) -> ContentItem {
        let id = self.name.rsplit('/').next().unwrap_or(&self.name);
        // Firestore wraps every value in a typed object; only strings name an author.
        let author = self
            .fields
            .get(author_field)
            .and_then(|value| value.get("stringValue"))
            .and_then(Value::as_str);
        ContentItem::new(id, author)
    }
}

impl DefaultFirestoreClient {
    pub fn new(config: &GoogleConfig, user_agent: &str) -> ClientResult<Self> {
        let backend = ReqwestBackend::new(config.timeout, user_agent)?;
        Ok(Self::with_backend(config.clone(), backend))
    }
}

impl<B: HttpBackend> FirestoreClient<B> {
    pub(crate) const fn with_backend(config: GoogleConfig, backend: B) -> Self {
        Self { backend, config }
    }

    async fn scan(&self) -> ClientResult<Vec<ContentItem>> {
        let project = self.config.require_project()?;
        let auth = self.config.authorization()?;
        let base = endpoint(
            &self.config.firestore_base_url,
            &[
                "v1",
                "projects",
                project,
                "databases",
                "(default)",
                "documents",
                &self.config.content_collection,
            ],
        )?;

        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut url = base.clone();
            {
                let mut query = url.query_pairs_mut();
                query
                    .append_pair("pageSize", &self.config.page_size().to_string())
                    .append_pair("mask.fieldPaths", &self.config.author_field);
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let page: DocumentPage = self.backend.get_json(&url, Some(&auth)).await?;
            let fetched = page.documents.len();
            items.extend(
                page.documents
                    .into_iter()
                    .map(|doc| doc.into_item(&self.config.author_field)),
            );

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) if fetched > 0 => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(
            collection = %self.config.content_collection,
            count = items.len(),
            "Scanned content collection"
        );
        Ok(items)
    }
}

#[async_trait]
impl<B: HttpBackend> ContentStore for FirestoreClient<B> {
    async fn list_items(&self) -> Result<Vec<ContentItem>, ProviderError> {
        self.scan().await.map_err(|e| e.into_provider(PROVIDER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use serde_json::json;

    const DOCS: &str = "projects/pantry-test/databases/(default)/documents/posts";

    fn config() -> GoogleConfig {
        GoogleConfig::new()
            .with_project_id("pantry-test")
            .with_access_token("ya29.token")
            .with_firestore_base_url("https://firestore.test")
    }

    #[tokio::test]
    async fn test_scans_all_pages_and_extracts_authors() {
        let backend = FakeBackend::new()
            .with_json(
                "/documents/posts",
                json!({
                    "documents": [
                        {"name": format!("{DOCS}/p1"), "fields": {"postUserID": {"stringValue": "u1"}}},
                        {"name": format!("{DOCS}/p2"), "fields": {"postUserID": {"integerValue": "7"}}}
                    ],
                    "nextPageToken": "next"
                }),
            )
            .with_json(
                "mask.fieldPaths=postUserID&pageToken=next",
                json!({
                    "documents": [
                        {"name": format!("{DOCS}/p3")}
                    ]
                }),
            );
        let client = FirestoreClient::with_backend(config(), backend);

        let items = client.list_items().await.unwrap();

        assert_eq!(
            items,
            vec![
                ContentItem::new("p1", Some("u1")),
                ContentItem::new("p2", None),
                ContentItem::new("p3", None),
            ]
        );
        let requests = client.backend.requests();
        assert_eq!(requests.len(), 2);
        let query: HashMap<_, _> = requests[0].url.query_pairs().into_owned().collect();
        assert_eq!(query.get("mask.fieldPaths").map(String::as_str), Some("postUserID"));
        assert_eq!(requests[0].url.path(), format!("/v1/{DOCS}"));
    }

    #[tokio::test]
    async fn test_custom_collection_and_author_field() {
        let backend = FakeBackend::new().with_json(
            "/documents/lists",
            json!({
                "documents": [
                    {"name": "projects/p/databases/(default)/documents/lists/l1",
                     "fields": {"owner": {"stringValue": "u9"}}}
                ]
            }),
        );
        let client = FirestoreClient::with_backend(
            config()
                .with_content_collection("lists")
                .with_author_field("owner"),
            backend,
        );

        let items = client.list_items().await.unwrap();
        assert_eq!(items, vec![ContentItem::new("l1", Some("u9"))]);
    }

    #[tokio::test]
    async fn test_permission_denied_is_rejected() {
        let backend = FakeBackend::new().with_response(
            "/documents/posts",
            CannedResponse::Status(403, "PERMISSION_DENIED".to_string()),
        );
        let client = FirestoreClient::with_backend(config(), backend);

        let err = client.list_items().await.unwrap_err();
        assert_eq!(
            err,
            ProviderError::Rejected {
                provider: "content",
                status: 403,
                message: "PERMISSION_DENIED".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_token_is_configuration_error() {
        let client = FirestoreClient::with_backend(
            GoogleConfig::new().with_project_id("p"),
            FakeBackend::new(),
        );

        let err = client.list_items().await.unwrap_err();
        assert!(err.to_string().contains("GOOGLE_ACCESS_TOKEN"));
    }
}
