//! Identity Toolkit client: lists and looks up Firebase Auth users.

use async_trait::async_trait;
use pantry_core::{Identity, IdentityProvider, ProviderError};
use serde::Deserialize;
use serde_json::json;

use crate::config::GoogleConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpBackend, ReqwestBackend, endpoint};

const PROVIDER: &str = "identity";

/// Identity Toolkit client using the reqwest backend.
pub type DefaultIdentityToolkitClient = IdentityToolkitClient<ReqwestBackend>;

/// Firebase Auth user listing via the Identity Toolkit REST API.
pub struct IdentityToolkitClient<B: HttpBackend> {
    backend: B,
    config: GoogleConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    local_id: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl From<UserRecord> for Identity {
    fn from(record: UserRecord) -> Self {
        Self {
            user_id: record.local_id,
            display_name: record.display_name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserPage {
    #[serde(default)]
    users: Vec<UserRecord>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl DefaultIdentityToolkitClient {
    pub fn new(config: &GoogleConfig, user_agent: &str) -> ClientResult<Self> {
        let backend = ReqwestBackend::new(config.timeout, user_agent)?;
        Ok(Self::with_backend(config.clone(), backend))
    }
}

impl<B: HttpBackend> IdentityToolkitClient<B> {
    pub(crate) const fn with_backend(config: GoogleConfig, backend: B) -> Self {
        Self { backend, config }
    }

    async fn list_all(&self) -> ClientResult<Vec<Identity>> {
        let project = self.config.require_project()?;
        let auth = self.config.authorization()?;
        let base = endpoint(
            &self.config.identity_base_url,
            &["v1", "projects", project, "accounts:batchGet"],
        )?;

        let mut identities = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut url = base.clone();
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("maxResults", &self.config.page_size().to_string());
                if let Some(token) = &page_token {
                    query.append_pair("nextPageToken", token);
                }
            }

            let page: UserPage = self.backend.get_json(&url, Some(&auth)).await?;
            let fetched = page.users.len();
            identities.extend(page.users.into_iter().map(Identity::from));

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) if fetched > 0 => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(count = identities.len(), "Listed identities");
        Ok(identities)
    }

    async fn lookup(&self, user_id: &str) -> ClientResult<Option<Identity>> {
        let project = self.config.require_project()?;
        let auth = self.config.authorization()?;
        let url = endpoint(
            &self.config.identity_base_url,
            &["v1", "projects", project, "accounts:lookup"],
        )?;

        let page: UserPage = self
            .backend
            .post_json(&url, Some(&auth), &json!({ "localId": [user_id] }))
            .await?;
        Ok(page
            .users
            .into_iter()
            .find(|record| record.local_id == user_id)
            .map(Identity::from))
    }
}

#[async_trait]
impl<B: HttpBackend> IdentityProvider for IdentityToolkitClient<B> {
    async fn list_identities(&self) -> Result<Vec<Identity>, ProviderError> {
        self.list_all()
            .await
            .map_err(|e| e.into_provider(PROVIDER))
    }

    async fn get_identity(&self, user_id: &str) -> Result<Identity, ProviderError> {
        match self.lookup(user_id).await {
            Ok(Some(identity)) => Ok(identity),
            Ok(None) => Err(ProviderError::NotFound {
                provider: PROVIDER,
                id: user_id.to_string(),
            }),
            Err(e @ ClientError::Status { status: 404, .. }) => {
                tracing::debug!(user_id, error = %e, "Identity lookup returned 404");
                Err(ProviderError::NotFound {
                    provider: PROVIDER,
                    id: user_id.to_string(),
                })
            }
            Err(e) => Err(e.into_provider(PROVIDER)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use serde_json::json;

    fn config() -> GoogleConfig {
        GoogleConfig::new()
            .with_project_id("pantry-test")
            .with_access_token("ya29.token")
            .with_identity_base_url("https://identity.test")
            .with_page_size(2)
    }

    #[tokio::test]
    async fn test_lists_every_page_in_order() {
        let backend = FakeBackend::new()
            .with_json(
                "accounts:batchGet",
                json!({
                    "users": [
                        {"localId": "u1", "displayName": "Ann"},
                        {"localId": "u2"}
                    ],
                    "nextPageToken": "p2"
                }),
            )
            .with_json(
                "accounts:batchGet?maxResults=2&nextPageToken=p2",
                json!({"users": [{"localId": "u3", "displayName": ""}]}),
            );
        let client = IdentityToolkitClient::with_backend(config(), backend);

        let identities = client.list_identities().await.unwrap();

        assert_eq!(
            identities,
            vec![
                Identity::new("u1", Some("Ann")),
                Identity::new("u2", None),
                Identity::new("u3", Some("")),
            ]
        );
        let requests = client.backend.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].auth.as_deref(), Some("Bearer ya29.token"));
        assert_eq!(
            requests[0].url.path(),
            "/v1/projects/pantry-test/accounts:batchGet"
        );
    }

    #[tokio::test]
    async fn test_empty_project_lists_nothing() {
        let backend = FakeBackend::new().with_json("accounts:batchGet", json!({}));
        let client = IdentityToolkitClient::with_backend(config(), backend);

        assert!(client.list_identities().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_sends_local_id() {
        let backend = FakeBackend::new().with_json(
            "accounts:lookup",
            json!({"users": [{"localId": "u1", "displayName": "Ann"}]}),
        );
        let client = IdentityToolkitClient::with_backend(config(), backend);

        let identity = client.get_identity("u1").await.unwrap();

        assert_eq!(identity.display_name.as_deref(), Some("Ann"));
        let requests = client.backend.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].body, Some(json!({"localId": ["u1"]})));
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let backend = FakeBackend::new().with_json("accounts:lookup", json!({}));
        let client = IdentityToolkitClient::with_backend(config(), backend);

        assert_eq!(
            client.get_identity("ghost").await,
            Err(ProviderError::NotFound {
                provider: "identity",
                id: "ghost".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_missing_project_is_configuration_error() {
        let client = IdentityToolkitClient::with_backend(GoogleConfig::new(), FakeBackend::new());

        let err = client.list_identities().await.unwrap_err();

        assert!(matches!(err, ProviderError::Configuration { .. }));
        assert!(client.backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_rejected() {
        let backend = FakeBackend::new().with_response(
            "accounts:batchGet",
            CannedResponse::Status(503, "backend error".to_string()),
        );
        let client = IdentityToolkitClient::with_backend(config(), backend);

        let err = client.list_identities().await.unwrap_err();
        assert!(matches!(err, ProviderError::Rejected { status: 503, .. }));
    }
}
