//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! Nothing external is needed: [`MockUpstream`] serves the product API on an
//! ephemeral local port and counts the requests it receives, so tests can
//! assert exactly when the storefront went to the network.

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use shopfront_core::Product;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// How the mock answers every request.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Serve the catalog. Unknown ids get an empty 200, like the real API.
    Catalog(Vec<Product>),
    /// Answer everything with `status` and a `{ "error": message }` body.
    Fail { status: StatusCode, message: String },
    /// Answer everything with 200 and `body` verbatim.
    Malformed(String),
}

#[derive(Clone)]
struct MockState {
    behavior: Arc<Behavior>,
    hits: Arc<AtomicUsize>,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<usize>,
}

/// In-process stand-in for the upstream product API.
pub struct MockUpstream {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl MockUpstream {
    /// Serve `catalog` on an ephemeral port.
    pub async fn start(catalog: Vec<Product>) -> Self {
        Self::with_behavior(Behavior::Catalog(catalog)).await
    }

    /// Answer every request with a 200 whose body is `body`.
    pub async fn malformed(body: &str) -> Self {
        Self::with_behavior(Behavior::Malformed(body.to_string())).await
    }

    /// Fail every request with `status`.
    pub async fn failing(status: StatusCode, message: &str) -> Self {
        Self::with_behavior(Behavior::Fail {
            status,
            message: message.to_string(),
        })
        .await
    }

    pub async fn with_behavior(behavior: Behavior) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let state = MockState {
            behavior: Arc::new(behavior),
            hits: Arc::clone(&hits),
        };

        let app = Router::new()
            .route("/products", get(list_products))
            .route("/products/{id}", get(get_product))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock upstream");
        let addr = listener.local_addr().expect("mock upstream has an address");
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("mock upstream failed");
        });

        Self { addr, hits, task }
    }

    /// Base URL to hand to the storefront.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("mock address is a valid URL")
    }

    /// Requests received so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn malformed_body(body: &str) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

async fn list_products(State(state): State<MockState>, Query(query): Query<ListQuery>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    match state.behavior.as_ref() {
        Behavior::Catalog(catalog) => {
            let limit = query.limit.unwrap_or(catalog.len());
            Json(catalog.iter().take(limit).cloned().collect::<Vec<_>>()).into_response()
        }
        Behavior::Fail { status, message } => failure(*status, message),
        Behavior::Malformed(body) => malformed_body(body),
    }
}

async fn get_product(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    match state.behavior.as_ref() {
        Behavior::Catalog(catalog) => catalog
            .iter()
            .find(|p| p.id.to_string() == id)
            .map_or_else(
                || StatusCode::OK.into_response(),
                |p| Json(p.clone()).into_response(),
            ),
        Behavior::Fail { status, message } => failure(*status, message),
        Behavior::Malformed(body) => malformed_body(body),
    }
}
