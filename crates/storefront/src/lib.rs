//! Shopfront Storefront library.
//!
//! Server-rendered product listing and detail pages backed by an upstream
//! product API. Every read goes through a shared query cache, so a page is
//! rendered from cached data whenever the cache already holds its key.
//!
//! The crate is a library so the binary, the in-process [`testing`] harness
//! and the integration tests all drive the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod hooks;
pub mod middleware;
pub mod query;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
