//! JSON pass-through of product queries.
//!
//! These handlers share the page handlers' query cache, so a product fetched
//! for a page is served here without another upstream call. Upstream errors
//! are returned as the upstream's own `{ "error": ... }` body. Prices are
//! written as JSON numbers, so `15` comes back as `15.0`.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shopfront_core::{Product, ProductId};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::hooks::{GetProductArgs, GetProductsArgs, use_product, use_products};
use crate::query::FetchState;
use crate::state::AppState;

/// Upper bound accepted for `?limit=`.
const MAX_LIMIT: u32 = 100;

/// List query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}

/// `GET /api/products?limit=n`
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let limit = query.limit.unwrap_or(state.config().product_limit);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }

    let fetch = use_products(state.queries(), state.api(), GetProductsArgs::new(limit)).await;
    settle(fetch).map(Json)
}

/// `GET /api/products/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Product>> {
    let id: ProductId = raw_id
        .parse()
        .map_err(|e| AppError::BadRequest(format!("product {e}")))?;

    let fetch = use_product(state.queries(), state.api(), GetProductArgs::new(Some(id))).await;
    settle(fetch).map(Json)
}

/// An enabled query always settles; anything else is a bug.
fn settle<T>(fetch: FetchState<T>) -> Result<T> {
    match fetch.into_result() {
        Some(result) => result.map_err(AppError::from),
        None => Err(AppError::Internal(
            "query finished without data or error".to_string(),
        )),
    }
}
