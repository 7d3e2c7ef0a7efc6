//! Product service functions.

use shopfront_core::{Product, ProductId};
use tracing::instrument;

use crate::api::{ApiClient, ApiError};

/// Upstream collection path.
pub const PRODUCTS_PATH: &str = "products";

/// Parameters for [`get_products`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetProductsParams {
    pub limit: u32,
}

/// Parameters for [`get_product`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetProductParams {
    pub id: ProductId,
}

/// Fetch up to `limit` products.
///
/// `GET {base}/products?limit={limit}`
///
/// # Errors
///
/// Returns the upstream's error payload or a normalized transport/decode error.
#[instrument(skip(api))]
pub async fn get_products(
    api: &ApiClient,
    params: GetProductsParams,
) -> Result<Vec<Product>, ApiError> {
    api.get(PRODUCTS_PATH, &[("limit", params.limit.to_string())])
        .await
}

/// Fetch a single product.
///
/// `GET {base}/products/{id}`
///
/// # Errors
///
/// Returns the upstream's error payload or a normalized transport/decode error.
#[instrument(skip(api))]
pub async fn get_product(
    api: &ApiClient,
    params: GetProductParams,
) -> Result<Product, ApiError> {
    api.get(&format!("{PRODUCTS_PATH}/{}", params.id), &[]).await
}
