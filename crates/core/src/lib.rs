//! Shopfront Core - Shared types library.
//!
//! This crate provides the domain types used by the Shopfront components:
//! - `storefront` - Server-rendered product listing and detail pages
//! - `integration-tests` - End-to-end tests against a mock product API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no caches.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product records, type-safe IDs, and query keys

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
