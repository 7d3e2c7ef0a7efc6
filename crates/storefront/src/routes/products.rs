//! Product route handlers.
//!
//! Both pages are pure consumers of query state: a handler resolves the
//! query through a hook, builds a template view from the [`FetchState`] and
//! renders it. Nothing else is read or written.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shopfront_core::Product;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb, upstream_status};
use crate::filters;
use crate::hooks::{GetProductArgs, GetProductsArgs, use_product, use_products};
use crate::query::FetchState;
use crate::state::AppState;

/// Product listing page template.
#[derive(Debug, Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub loading: bool,
    pub error: Option<String>,
    pub products: Vec<Product>,
    status: StatusCode,
}

impl ProductsIndexTemplate {
    /// Build the listing view from the list query's state.
    #[must_use]
    pub fn from_state(state: &FetchState<Vec<Product>>) -> Self {
        let error = state.error();
        Self {
            loading: state.is_pending(),
            error: error.map(|e| e.error.clone()),
            products: state.data().cloned().unwrap_or_default(),
            status: error.map_or(StatusCode::OK, upstream_status),
        }
    }
}

/// Product detail page template.
#[derive(Debug, Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub loading: bool,
    pub error: Option<String>,
    pub product: Option<Product>,
    status: StatusCode,
}

impl ProductShowTemplate {
    /// Build the detail view from the product query's state.
    #[must_use]
    pub fn from_state(state: &FetchState<Product>) -> Self {
        let error = state.error();
        Self {
            loading: state.is_pending(),
            error: error.map(|e| e.error.clone()),
            product: state.data().cloned(),
            status: error.map_or(StatusCode::OK, upstream_status),
        }
    }
}

/// Render a view with the status derived from its fetch state.
fn page<T: IntoResponse>(status: StatusCode, view: T) -> Response {
    (status, view).into_response()
}

/// Display product listing page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Response {
    let args = GetProductsArgs::new(state.config().product_limit);
    let fetch = use_products(state.queries(), state.api(), args).await;

    let view = ProductsIndexTemplate::from_state(&fetch);
    page(view.status, view)
}

/// Display product detail page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(raw_id): Path<String>) -> Result<Response> {
    let id = state
        .config()
        .invalid_id_policy
        .resolve(&raw_id)
        .map_err(|e| AppError::NotFound(format!("product {e}")))?;

    if let Some(id) = id {
        let id = id.to_string();
        add_breadcrumb("navigation", "Viewed product page", Some(&[("product_id", id.as_str())]));
    }

    let fetch = use_product(state.queries(), state.api(), GetProductArgs::new(id)).await;

    let view = ProductShowTemplate::from_state(&fetch);
    Ok(page(view.status, view))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shopfront_core::{ProductId, Rating};

    use super::*;
    use crate::api::ApiError;

    fn product(id: i64, title: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Decimal::from(price),
            category: "clothing".to_string(),
            description: format!("{title} description"),
            image: format!("https://example.com/{id}.jpg"),
            rating: Some(Rating {
                rate: 4.5,
                count: 12,
            }),
        }
    }

    #[test]
    fn test_index_loading_renders_placeholder_only() {
        let html = ProductsIndexTemplate::from_state(&FetchState::fetching())
            .render()
            .unwrap();
        assert!(html.contains("loading..."));
        assert!(!html.contains("data-testid=\"productCard\""));
    }

    #[test]
    fn test_index_renders_one_card_per_product() {
        let list = vec![product(1, "Shirt", 20), product(2, "Hat", 15)];
        let html = ProductsIndexTemplate::from_state(&FetchState::success(list))
            .render()
            .unwrap();

        assert_eq!(html.matches("data-testid=\"productCard\"").count(), 2);
        assert!(html.contains("Shirt - 20$"));
        assert!(html.contains("href=\"/products/2\""));
        assert!(html.contains("title=\"Hat\""));
        assert!(!html.contains("loading..."));
    }

    #[test]
    fn test_index_empty_list_renders_no_cards() {
        let view = ProductsIndexTemplate::from_state(&FetchState::success(Vec::new()));
        assert_eq!(view.status, StatusCode::OK);
        let html = view.render().unwrap();
        assert!(!html.contains("data-testid=\"productCard\""));
        assert!(!html.contains("loading..."));
    }

    #[test]
    fn test_index_error_renders_message() {
        let state = FetchState::failure(ApiError::from_response(500, r#"{"error":"db down"}"#));
        let view = ProductsIndexTemplate::from_state(&state);
        assert_eq!(view.status, StatusCode::BAD_GATEWAY);

        let html = view.render().unwrap();
        assert!(html.contains("db down"));
        assert!(!html.contains("data-testid=\"productCard\""));
    }

    #[test]
    fn test_show_renders_title_and_price() {
        let html = ProductShowTemplate::from_state(&FetchState::success(product(1, "Shirt", 20)))
            .render()
            .unwrap();

        assert!(html.contains("<h1 data-testid=\"productTitle\">Shirt</h1>"));
        assert!(html.contains("<p data-testid=\"productPrice\">20$</p>"));
        assert!(html.contains("(12 reviews)"));
    }

    #[test]
    fn test_show_disabled_renders_loading() {
        let html = ProductShowTemplate::from_state(&FetchState::idle())
            .render()
            .unwrap();
        assert!(html.contains("loading..."));
        assert!(!html.contains("productTitle"));
    }

    #[test]
    fn test_show_not_found_status() {
        let view = ProductShowTemplate::from_state(&FetchState::failure(ApiError::from_response(
            404, "",
        )));
        assert_eq!(view.status, StatusCode::NOT_FOUND);
        assert!(view.render().unwrap().contains("Not Found"));
    }

    #[test]
    fn test_titles_are_escaped() {
        let html = ProductShowTemplate::from_state(&FetchState::success(product(
            1,
            "<script>alert(1)</script>",
            1,
        )))
        .render()
        .unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
    }
}
