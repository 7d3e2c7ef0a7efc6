//! Test support: a pre-seeded query cache and in-process page rendering.
//!
//! ```ignore
//! let page = TestHarness::new()
//!     .seed(query_keys::product(ProductId::new(1)), sample_product(1, "Shirt", 20))
//!     .render("/products/1")
//!     .await;
//!
//! assert_eq!(page.text_by_test_id("productTitle"), vec!["Shirt"]);
//! ```
//!
//! Every harness builds its own [`ProductQueries`], so seeded data never leaks
//! between tests. The API client points at an unroutable address unless
//! [`TestHarness::with_api_url`] says otherwise, which turns any accidental
//! network call into a visible error state.

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use regex::Regex;
use rust_decimal::Decimal;
use shopfront_core::{Product, ProductId, QueryKey, Rating};
use tower::ServiceExt;
use url::Url;

use crate::config::{InvalidIdPolicy, StorefrontConfig};
use crate::hooks::{CacheValue, ProductQueries};
use crate::query::QueryClientConfig;
use crate::routes;
use crate::state::AppState;

/// Base URL nothing listens on.
pub const UNROUTABLE_API_URL: &str = "http://127.0.0.1:9/";

/// Builder for an isolated storefront instance.
#[derive(Debug, Clone)]
pub struct TestHarness {
    config: StorefrontConfig,
    seeds: Vec<(QueryKey, CacheValue)>,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    #[must_use]
    pub fn new() -> Self {
        let base_url = Url::parse(UNROUTABLE_API_URL).expect("static URL is valid");
        Self {
            config: StorefrontConfig::with_api_url(base_url),
            seeds: Vec::new(),
        }
    }

    /// Pre-populate `key` before anything renders.
    #[must_use]
    pub fn seed(mut self, key: QueryKey, value: impl Into<CacheValue>) -> Self {
        self.seeds.push((key, value.into()));
        self
    }

    /// Point the API client at a test double.
    #[must_use]
    pub fn with_api_url(mut self, base_url: Url) -> Self {
        self.config.api.base_url = base_url;
        self
    }

    #[must_use]
    pub const fn with_invalid_id_policy(mut self, policy: InvalidIdPolicy) -> Self {
        self.config.invalid_id_policy = policy;
        self
    }

    #[must_use]
    pub const fn with_product_limit(mut self, limit: u32) -> Self {
        self.config.product_limit = limit;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// A fresh quiet query client holding the seeded entries.
    pub async fn client(&self) -> ProductQueries {
        let queries = ProductQueries::new(QueryClientConfig {
            quiet: true,
            ..QueryClientConfig::from(self.config.cache)
        });
        for (key, value) in &self.seeds {
            queries.set_query_data(key.clone(), value.clone()).await;
        }
        queries
    }

    /// Application state around a fresh seeded client.
    pub async fn state(&self) -> AppState {
        AppState::with_queries(self.config.clone(), self.client().await)
            .expect("failed to build test HTTP client")
    }

    /// The full application router around a fresh seeded client.
    pub async fn router(&self) -> Router {
        routes::app(self.state().await)
    }

    /// Render `uri` on a fresh router.
    pub async fn render(&self, uri: &str) -> RenderedPage {
        Self::render_on(&self.router().await, uri).await
    }

    /// Render `uri` on an existing router, sharing its query cache.
    pub async fn render_on(router: &Router, uri: &str) -> RenderedPage {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("failed to build request");
        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");

        RenderedPage {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// A rendered response with lookup helpers keyed on `data-testid`.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub status: StatusCode,
    pub body: String,
}

impl RenderedPage {
    /// Text directly inside each element with the given test id, trimmed.
    #[must_use]
    pub fn text_by_test_id(&self, test_id: &str) -> Vec<String> {
        let pattern = format!(r#"data-testid="{}"[^>]*>([^<]*)"#, regex::escape(test_id));
        let re = Regex::new(&pattern).expect("test id pattern is valid");
        re.captures_iter(&self.body)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .collect()
    }

    /// Number of elements carrying the given test id.
    #[must_use]
    pub fn count_by_test_id(&self, test_id: &str) -> usize {
        self.body
            .matches(&format!(r#"data-testid="{test_id}""#))
            .count()
    }

    /// Values of `attr` on each element with the given test id.
    #[must_use]
    pub fn attr_values(&self, test_id: &str, attr: &str) -> Vec<String> {
        let tag = Regex::new(&format!(
            r#"<[a-zA-Z][^>]*\sdata-testid="{}"[^>]*>"#,
            regex::escape(test_id)
        ))
        .expect("tag pattern is valid");
        let value = Regex::new(&format!(r#"\s{}="([^"]*)""#, regex::escape(attr)))
            .expect("attribute pattern is valid");

        tag.find_iter(&self.body)
            .filter_map(|t| value.captures(t.as_str()))
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.body.contains(needle)
    }
}

/// A product with predictable fields derived from `id` and `title`.
#[must_use]
pub fn sample_product(id: i64, title: &str, price: i64) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        price: Decimal::from(price),
        category: "clothing".to_string(),
        description: format!("{title} description"),
        image: format!("https://example.com/images/{id}.jpg"),
        rating: Some(Rating {
            rate: 4.5,
            count: 12,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::query_keys;

    #[tokio::test]
    async fn test_seeded_detail_renders_without_network() {
        let page = TestHarness::new()
            .seed(
                query_keys::product(ProductId::new(1)),
                sample_product(1, "Shirt", 20),
            )
            .render("/products/1")
            .await;

        assert_eq!(page.status, StatusCode::OK);
        assert!(page.contains("Shirt"));
        assert!(page.contains("20$"));
        assert_eq!(page.text_by_test_id("productTitle"), vec!["Shirt"]);
        assert_eq!(page.text_by_test_id("productPrice"), vec!["20$"]);
    }

    #[tokio::test]
    async fn test_seeded_list_renders_one_card_per_product() {
        let harness = TestHarness::new().with_product_limit(2).seed(
            query_keys::products(2),
            vec![sample_product(1, "Shirt", 20), sample_product(2, "Hat", 15)],
        );
        let page = harness.render("/products").await;

        assert_eq!(page.status, StatusCode::OK);
        assert_eq!(page.count_by_test_id("productCard"), 2);
        assert_eq!(
            page.text_by_test_id("productCardTitle"),
            vec!["Shirt - 20$", "Hat - 15$"]
        );
        assert_eq!(
            page.attr_values("productLink", "href"),
            vec!["/products/1", "/products/2"]
        );
        assert_eq!(page.attr_values("productLink", "title"), vec!["Shirt", "Hat"]);
        assert!(!page.contains("loading..."));
    }

    #[tokio::test]
    async fn test_home_is_the_listing() {
        let page = TestHarness::new()
            .with_product_limit(1)
            .seed(query_keys::products(1), vec![sample_product(7, "Mug", 9)])
            .render("/")
            .await;
        assert_eq!(page.text_by_test_id("productCardTitle"), vec!["Mug - 9$"]);
    }

    #[tokio::test]
    async fn test_harnesses_are_isolated() {
        let seeded = TestHarness::new().seed(
            query_keys::product(ProductId::new(1)),
            sample_product(1, "Shirt", 20),
        );
        assert_eq!(seeded.client().await.entry_count().await, 1);

        let fresh = TestHarness::new();
        assert_eq!(fresh.client().await.entry_count().await, 0);

        // Unseeded key falls through to the unroutable API
        let page = fresh.render("/products/1").await;
        assert_eq!(page.status, StatusCode::BAD_GATEWAY);
        assert_eq!(page.count_by_test_id("errorMessage"), 1);
        assert!(!page.contains("Shirt"));
    }

    #[tokio::test]
    async fn test_reject_policy_is_not_found() {
        let page = TestHarness::new().render("/products/abc").await;
        assert_eq!(page.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_placeholder_policy_renders_loading() {
        let page = TestHarness::new()
            .with_invalid_id_policy(InvalidIdPolicy::Placeholder)
            .render("/products/abc")
            .await;
        assert_eq!(page.status, StatusCode::OK);
        assert_eq!(page.count_by_test_id("loading"), 1);
    }

    #[tokio::test]
    async fn test_placeholder_policy_uses_bare_product_key() {
        let page = TestHarness::new()
            .with_invalid_id_policy(InvalidIdPolicy::Placeholder)
            .seed(query_keys::product_root(), sample_product(3, "Scarf", 30))
            .render("/products/abc")
            .await;
        assert_eq!(page.text_by_test_id("productTitle"), vec!["Scarf"]);
    }

    #[tokio::test]
    async fn test_zero_policy_reads_product_zero() {
        let page = TestHarness::new()
            .with_invalid_id_policy(InvalidIdPolicy::Zero)
            .seed(
                query_keys::product(ProductId::new(0)),
                sample_product(0, "Fallback", 5),
            )
            .render("/products/abc")
            .await;
        assert_eq!(page.status, StatusCode::OK);
        assert_eq!(page.text_by_test_id("productTitle"), vec!["Fallback"]);
        assert_eq!(page.text_by_test_id("productPrice"), vec!["5$"]);
    }

    #[tokio::test]
    async fn test_zero_policy_fetches_when_unseeded() {
        // The bare key is not the product 0 key, so this goes upstream
        let page = TestHarness::new()
            .with_invalid_id_policy(InvalidIdPolicy::Zero)
            .seed(query_keys::product_root(), sample_product(3, "Scarf", 30))
            .render("/products/abc")
            .await;
        assert_eq!(page.status, StatusCode::BAD_GATEWAY);
        assert!(!page.contains("Scarf"));
    }

    #[tokio::test]
    async fn test_health() {
        let page = TestHarness::new().render("/health").await;
        assert_eq!(page.status, StatusCode::OK);
        assert_eq!(page.body, "ok");
    }

    #[test]
    fn test_attr_values_ignores_other_elements() {
        let page = RenderedPage {
            status: StatusCode::OK,
            body: r#"<a href="/x" data-testid="a"></a><a href="/y" data-testid="b"></a>"#
                .to_string(),
        };
        assert_eq!(page.attr_values("a", "href"), vec!["/x"]);
        assert_eq!(page.count_by_test_id("b"), 1);
    }
}
