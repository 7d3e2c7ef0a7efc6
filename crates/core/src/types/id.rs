//! Newtype IDs for type-safe entity references.

use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing an ID from a route or query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("missing identifier")]
    Missing,
    #[error("invalid identifier '{value}': {source}")]
    Invalid {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Identifier of a product in the upstream catalog.
///
/// Serialized transparently as the bare integer, matching the upstream API.
///
/// # Example
///
/// ```rust
/// # use shopfront_core::ProductId;
/// let id: ProductId = "42".parse().unwrap();
/// assert_eq!(id.as_i64(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// Create a new ID from an i64 value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ProductId> for i64 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl FromStr for ProductId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(IdError::Missing);
        }
        trimmed
            .parse::<i64>()
            .map(Self)
            .map_err(|source| IdError::Invalid {
                value: trimmed.to_string(),
                source,
            })
    }
}
