//! HTTP backend abstraction shared by every provider client.
//!
//! Clients are generic over [`HttpBackend`] so tests can substitute canned
//! responses. The production backend is a thin reqwest wrapper: one attempt
//! per call, non-2xx statuses become [`ClientError::Status`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{ClientError, ClientResult};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Minimal HTTP surface the provider clients need.
///
/// `auth` is the complete `Authorization` header value (for example
/// `Bearer abc` or `Key abc`), or `None` to send no such header.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// GET a URL and deserialize the JSON response.
    async fn get_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        auth: Option<&str>,
    ) -> ClientResult<T>;

    /// POST a JSON body and deserialize the JSON response.
    async fn post_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        auth: Option<&str>,
        body: &Value,
    ) -> ClientResult<T>;

    /// POST a JSON body and return the raw response bytes.
    async fn post_bytes(&self, url: &Url, auth: Option<&str>, body: &Value)
    -> ClientResult<Vec<u8>>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    /// Build a backend whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration, user_agent: &str) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    fn authorize(
        request: reqwest::RequestBuilder,
        auth: Option<&str>,
    ) -> reqwest::RequestBuilder {
        match auth {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &Url) -> ClientResult<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), url = %url, "Provider request failed");
        Err(ClientError::status(status.as_u16(), url.as_str(), &body))
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        auth: Option<&str>,
    ) -> ClientResult<T> {
        let request = Self::authorize(self.client.get(url.as_str()), auth);
        let response = self.send(request, url).await?;
        Ok(response.json().await?)
    }

    async fn post_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        auth: Option<&str>,
        body: &Value,
    ) -> ClientResult<T> {
        let request = Self::authorize(self.client.post(url.as_str()), auth).json(body);
        let response = self.send(request, url).await?;
        Ok(response.json().await?)
    }

    async fn post_bytes(
        &self,
        url: &Url,
        auth: Option<&str>,
        body: &Value,
    ) -> ClientResult<Vec<u8>> {
        let request = Self::authorize(self.client.post(url.as_str()), auth).json(body);
        let response = self.send(request, url).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Join `segments` onto `base`, percent-encoding each segment.
///
/// A trailing slash on `base` is ignored.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> ClientResult<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|()| ClientError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
