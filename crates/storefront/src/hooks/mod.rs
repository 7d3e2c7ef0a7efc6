//! Query hooks binding cache keys to product service functions.
//!
//! A hook resolves one query against the shared [`QueryClient`]: it returns the
//! cached value when present and otherwise calls the matching service
//! function once. Route handlers and views only ever see the resulting
//! [`FetchState`].

mod cache;
pub mod query_keys;

pub use cache::CacheValue;

use shopfront_core::{Product, ProductId, QueryKey};
use tracing::instrument;

use crate::api::{ApiClient, ApiError};
use crate::query::{FetchState, QueryClient, QueryOptions};
use crate::services::products::{self, GetProductParams, GetProductsParams};

/// Query client specialised to storefront cache values.
pub type ProductQueries = QueryClient<CacheValue>;

/// Arguments for [`use_products`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetProductsArgs {
    pub limit: u32,
    pub options: QueryOptions,
}

impl GetProductsArgs {
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            options: QueryOptions::default(),
        }
    }
}

/// Arguments for [`use_product`].
///
/// `id` is `None` until the route parameter is known; such a query is always
/// disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetProductArgs {
    pub id: Option<ProductId>,
    pub options: QueryOptions,
}

impl GetProductArgs {
    /// Enabled exactly when the id is known.
    #[must_use]
    pub const fn new(id: Option<ProductId>) -> Self {
        Self {
            id,
            options: QueryOptions::enabled(id.is_some()),
        }
    }
}

/// Fetch state of the product list.
#[instrument(skip(queries, api))]
pub async fn use_products(
    queries: &ProductQueries,
    api: &ApiClient,
    args: GetProductsArgs,
) -> FetchState<Vec<Product>> {
    let key = query_keys::products(args.limit);
    let params = GetProductsParams { limit: args.limit };

    queries
        .fetch(&key, args.options, || async move {
            products::get_products(api, params)
                .await
                .map(CacheValue::from)
        })
        .await
        .and_then(|value| value.into_products().ok_or_else(|| unexpected_shape(&key)))
}

/// Fetch state of a single product.
#[instrument(skip(queries, api))]
pub async fn use_product(
    queries: &ProductQueries,
    api: &ApiClient,
    args: GetProductArgs,
) -> FetchState<Product> {
    let Some(id) = args.id else {
        // Unknown id: report whatever sits under the bare key, never fetch
        let key = query_keys::product_root();
        return queries
            .fetch(&key, QueryOptions::enabled(false), || async {
                Err(unexpected_shape(&key))
            })
            .await
            .and_then(|value| value.into_product().ok_or_else(|| unexpected_shape(&key)));
    };

    let key = query_keys::product(id);

    queries
        .fetch(&key, args.options, || async move {
            products::get_product(api, GetProductParams { id })
                .await
                .map(CacheValue::from)
        })
        .await
        .and_then(|value| value.into_product().ok_or_else(|| unexpected_shape(&key)))
}

fn unexpected_shape(key: &QueryKey) -> ApiError {
    ApiError::decode(format!("cached value for '{key}' has an unexpected shape"))
}
