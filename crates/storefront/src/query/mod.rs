//! Keyed query cache with fetch-state reporting.
//!
//! # Architecture
//!
//! - Values are stored in a `moka` future cache keyed by [`QueryKey`]
//! - A fetch for a key runs at most once until the entry expires or is
//!   invalidated; concurrent callers for the same key share that fetch
//! - Errors are never cached, so the next caller fetches again
//! - Entries can be seeded up front, which is how tests render pages
//!   without touching the network
//!
//! The client is cheap to clone and is shared through [`crate::state::AppState`].

mod state;

pub use state::{FetchState, FetchStatus};

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use moka::future::Cache;
use shopfront_core::QueryKey;
use tracing::{debug, instrument, warn};

use crate::api::ApiError;
use crate::config::CacheConfig;

/// Per-call query options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// A disabled query never fetches. It still reports cached data.
    pub enabled: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl QueryOptions {
    #[must_use]
    pub const fn enabled(enabled: bool) -> Self {
        Self { enabled }
    }
}

/// Query client construction options.
#[derive(Debug, Clone, Copy)]
pub struct QueryClientConfig {
    pub max_capacity: u64,
    pub time_to_live: Duration,
    /// Log fetch failures at debug instead of warn.
    pub quiet: bool,
}

impl Default for QueryClientConfig {
    fn default() -> Self {
        Self::from(CacheConfig::default())
    }
}

impl From<CacheConfig> for QueryClientConfig {
    fn from(config: CacheConfig) -> Self {
        Self {
            max_capacity: config.max_capacity,
            time_to_live: config.time_to_live,
            quiet: false,
        }
    }
}

/// Query cache shared by all request handlers.
pub struct QueryClient<V> {
    inner: Arc<QueryClientInner<V>>,
}

impl<V> Clone for QueryClient<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct QueryClientInner<V> {
    cache: Cache<QueryKey, V>,
    /// Number of callers currently waiting on a fetch, per key.
    in_flight: Mutex<HashMap<QueryKey, usize>>,
    quiet: bool,
}

impl<V> QueryClient<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty query client.
    #[must_use]
    pub fn new(config: QueryClientConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.time_to_live)
            .build();

        Self {
            inner: Arc::new(QueryClientInner {
                cache,
                in_flight: Mutex::new(HashMap::new()),
                quiet: config.quiet,
            }),
        }
    }

    /// Resolve the state of `key`, fetching with `fetcher` when needed.
    ///
    /// - cached: returns the data without calling `fetcher`
    /// - disabled: never calls `fetcher`; same as [`QueryClient::peek`]
    /// - otherwise: runs `fetcher` once, shared with concurrent callers
    #[instrument(skip(self, fetcher), fields(key = %key))]
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, options: QueryOptions, fetcher: F) -> FetchState<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, ApiError>>,
    {
        if !options.enabled {
            debug!("Query disabled, not fetching");
            return self.peek(key).await;
        }

        if let Some(value) = self.inner.cache.get(key).await {
            debug!("Cache hit for query");
            return FetchState::success(value);
        }

        let _guard = InFlightGuard::enter(&self.inner, key);

        match self.inner.cache.try_get_with(key.clone(), fetcher()).await {
            Ok(value) => FetchState::success(value),
            Err(err) => {
                let err = Arc::unwrap_or_clone(err);
                if self.inner.quiet {
                    debug!(error = %err, "Query fetch failed");
                } else {
                    warn!(error = %err, "Query fetch failed");
                }
                FetchState::failure(err)
            }
        }
    }

    /// Current state of `key` without fetching.
    pub async fn peek(&self, key: &QueryKey) -> FetchState<V> {
        if let Some(value) = self.inner.cache.get(key).await {
            return FetchState::success(value);
        }
        if self.is_fetching(key) {
            FetchState::fetching()
        } else {
            FetchState::idle()
        }
    }

    /// Whether a fetch for `key` is currently in flight.
    #[must_use]
    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Cached value for `key`, if any.
    pub async fn get_query_data(&self, key: &QueryKey) -> Option<V> {
        self.inner.cache.get(key).await
    }

    /// Store `value` under `key`, replacing any cached value.
    pub async fn set_query_data(&self, key: QueryKey, value: V) {
        debug!(key = %key, "Setting query data");
        self.inner.cache.insert(key, value).await;
    }

    /// Drop the cached value for `key` so the next fetch goes upstream.
    pub async fn invalidate(&self, key: &QueryKey) {
        debug!(key = %key, "Invalidating query");
        self.inner.cache.invalidate(key).await;
    }

    /// Drop every cached value whose key starts with `prefix`.
    pub async fn invalidate_prefix(&self, prefix: &QueryKey) {
        debug!(prefix = %prefix, "Invalidating queries by prefix");
        let matching: Vec<QueryKey> = self
            .inner
            .cache
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| (*key).clone())
            .collect();
        for key in matching {
            self.inner.cache.invalidate(&key).await;
        }
    }

    /// Drop every cached value.
    pub async fn clear(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    /// Number of cached entries after pending maintenance has run.
    pub async fn entry_count(&self) -> u64 {
        self.inner.cache.run_pending_tasks().await;
        self.inner.cache.entry_count()
    }
}

/// Marks a key as in flight for the guard's lifetime.
struct InFlightGuard<'a, V> {
    inner: &'a QueryClientInner<V>,
    key: QueryKey,
}

impl<'a, V> InFlightGuard<'a, V> {
    fn enter(inner: &'a QueryClientInner<V>, key: &QueryKey) -> Self {
        *inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.clone())
            .or_insert(0) += 1;
        Self {
            inner,
            key: key.clone(),
        }
    }
}

impl<V> Drop for InFlightGuard<'_, V> {
    fn drop(&mut self) {
        let mut in_flight = self
            .inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(count) = in_flight.get_mut(&self.key) {
            *count -= 1;
            if *count == 0 {
                in_flight.remove(&self.key);
            }
        }
    }
}
