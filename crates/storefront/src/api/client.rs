//! HTTP client implementation.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, ApiErrorKind};
use crate::config::ApiConfig;

/// Maximum number of body characters included in log lines.
const LOG_BODY_CHARS: usize = 500;

/// Client for the upstream product API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built
    /// (e.g., TLS backend initialization failed).
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Issue a GET for `path` relative to the base URL and decode the body.
    ///
    /// # Errors
    ///
    /// Returns the upstream's error payload for non-success statuses, and a
    /// normalized [`ApiError`] for transport or decoding failures.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path, query)?;
        debug!(url = %url, "GET");

        let response = self
            .inner
            .client
            .get(url)
            .send()
            .await
            .map_err(ApiError::transport)?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await.map_err(ApiError::transport)?;

        if !status.is_success() {
            debug!(
                status = %status,
                body = %truncate(&body),
                "Upstream API returned non-success status"
            );
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        // The upstream answers unknown ids with an empty 200
        if body.trim().is_empty() {
            return Err(ApiError::new(
                ApiErrorKind::Remote { status: 404 },
                "Not Found",
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            debug!(
                error = %e,
                body = %truncate(&body),
                "Failed to decode upstream API response"
            );
            ApiError::decode(e)
        })
    }

    /// Build the request URL: base path + `path` segments + query pairs.
    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::transport(format!("cannot use {} as a base URL", self.inner.base_url)))?
            .pop_if_empty()
            .extend(path.split('/').filter(|s| !s.is_empty()));

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_CHARS).collect()
}
