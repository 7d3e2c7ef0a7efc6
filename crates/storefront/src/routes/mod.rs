//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Product listing
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Product listing
//! GET  /products/{id}          - Product detail
//!
//! # JSON API
//! GET  /api/products           - Product list (`?limit=n`)
//! GET  /api/products/{id}      - Single product
//! ```

pub mod api;
pub mod products;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::from_fn,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(api::products::list))
        .route("/products/{id}", get(api::products::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page is the product listing
        .route("/", get(products::index))
        .route("/health", get(health))
        // Product routes
        .nest("/products", product_routes())
        // JSON API
        .nest("/api", api_routes())
}

/// Build the full application: routes, request tracing and request IDs.
///
/// Used by the binary and by the test harness so both exercise the same stack.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the upstream API.
async fn health() -> &'static str {
    "ok"
}
