//! Request/response mappers over the upstream product API.
//!
//! # Services
//!
//! - `products` - Product list and single-product lookups
//!
//! Each function issues exactly one HTTP call through [`crate::api::ApiClient`]
//! and returns the parsed body or the forwarded [`crate::api::ApiError`].
//! There are no retries here, and caching belongs to the query layer.

pub mod products;
