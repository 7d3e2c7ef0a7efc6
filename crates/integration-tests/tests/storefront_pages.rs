//! Integration tests for the storefront pages against a mock product API.
//!
//! Run with: cargo test -p shopfront-integration-tests

use axum::http::StatusCode;
use shopfront_core::{Product, ProductId};
use shopfront_integration_tests::MockUpstream;
use shopfront_storefront::hooks::query_keys;
use shopfront_storefront::testing::{TestHarness, sample_product};

fn catalog() -> Vec<Product> {
    vec![
        sample_product(1, "Shirt", 20),
        sample_product(2, "Hat", 15),
        sample_product(3, "Scarf", 30),
    ]
}

#[tokio::test]
async fn test_listing_fetches_from_upstream() {
    let upstream = MockUpstream::start(catalog()).await;
    let page = TestHarness::new()
        .with_api_url(upstream.base_url())
        .with_product_limit(2)
        .render("/products")
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.count_by_test_id("productCard"), 2);
    assert_eq!(
        page.text_by_test_id("productCardTitle"),
        vec!["Shirt - 20$", "Hat - 15$"]
    );
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn test_second_render_is_served_from_cache() {
    let upstream = MockUpstream::start(catalog()).await;
    let harness = TestHarness::new().with_api_url(upstream.base_url());
    let router = harness.router().await;

    let first = TestHarness::render_on(&router, "/products/2").await;
    let second = TestHarness::render_on(&router, "/products/2").await;

    assert_eq!(first.text_by_test_id("productTitle"), vec!["Hat"]);
    assert_eq!(second.text_by_test_id("productTitle"), vec!["Hat"]);
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn test_each_product_id_has_its_own_entry() {
    let upstream = MockUpstream::start(catalog()).await;
    let router = TestHarness::new()
        .with_api_url(upstream.base_url())
        .router()
        .await;

    let one = TestHarness::render_on(&router, "/products/1").await;
    let three = TestHarness::render_on(&router, "/products/3").await;

    assert_eq!(one.text_by_test_id("productTitle"), vec!["Shirt"]);
    assert_eq!(three.text_by_test_id("productTitle"), vec!["Scarf"]);
    assert_eq!(upstream.hits(), 2);
}

#[tokio::test]
async fn test_seeded_key_never_reaches_upstream() {
    let upstream = MockUpstream::start(catalog()).await;
    let page = TestHarness::new()
        .with_api_url(upstream.base_url())
        .seed(
            query_keys::product(ProductId::new(1)),
            sample_product(1, "Seeded shirt", 99),
        )
        .render("/products/1")
        .await;

    assert_eq!(page.text_by_test_id("productTitle"), vec!["Seeded shirt"]);
    assert_eq!(page.text_by_test_id("productPrice"), vec!["99$"]);
    assert_eq!(upstream.hits(), 0);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let upstream = MockUpstream::start(catalog()).await;
    let page = TestHarness::new()
        .with_api_url(upstream.base_url())
        .render("/products/42")
        .await;

    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert_eq!(page.text_by_test_id("errorMessage"), vec!["Not Found"]);
}

#[tokio::test]
async fn test_upstream_failure_renders_error_and_is_not_cached() {
    let upstream = MockUpstream::failing(StatusCode::INTERNAL_SERVER_ERROR, "db down").await;
    let router = TestHarness::new()
        .with_api_url(upstream.base_url())
        .router()
        .await;

    let page = TestHarness::render_on(&router, "/products").await;
    assert_eq!(page.status, StatusCode::BAD_GATEWAY);
    assert_eq!(page.text_by_test_id("errorMessage"), vec!["db down"]);
    assert_eq!(page.count_by_test_id("productCard"), 0);

    TestHarness::render_on(&router, "/products").await;
    assert_eq!(upstream.hits(), 2);
}

#[tokio::test]
async fn test_invalid_id_is_rejected_without_fetching() {
    let upstream = MockUpstream::start(catalog()).await;
    let page = TestHarness::new()
        .with_api_url(upstream.base_url())
        .render("/products/not-a-number")
        .await;

    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert_eq!(upstream.hits(), 0);
}

#[tokio::test]
async fn test_malformed_upstream_body_is_bad_gateway() {
    let upstream = MockUpstream::malformed(r#"{"id":"x"}"#).await;
    let page = TestHarness::new()
        .with_api_url(upstream.base_url())
        .render("/products/1")
        .await;

    assert_eq!(page.status, StatusCode::BAD_GATEWAY);
    assert_eq!(page.count_by_test_id("errorMessage"), 1);
    assert_eq!(page.count_by_test_id("productTitle"), 0);
}
