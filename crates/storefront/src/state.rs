//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::StorefrontConfig;
use crate::hooks::ProductQueries;
use crate::query::QueryClientConfig;

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and is the single place the
/// query cache is injected: the server builds a fresh one at startup and the
/// test harness builds a pre-seeded one per test.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    queries: ProductQueries,
}

impl AppState {
    /// Create a new application state with an empty query cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let queries = ProductQueries::new(QueryClientConfig::from(config.cache));
        Self::with_queries(config, queries)
    }

    /// Create application state around an existing query cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_queries(
        config: StorefrontConfig,
        queries: ProductQueries,
    ) -> Result<Self, StateError> {
        let api = ApiClient::new(&config.api)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                queries,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the upstream API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the query cache.
    #[must_use]
    pub fn queries(&self) -> &ProductQueries {
        &self.inner.queries
    }
}
