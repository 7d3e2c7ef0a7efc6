//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod product;
pub mod query_key;

pub use id::*;
pub use product::{Product, Rating};
pub use query_key::QueryKey;
