//! Client for the upstream product API.
//!
//! # Architecture
//!
//! - Thin `reqwest` wrapper with a configured base URL
//! - Every failure is normalized to [`ApiError`], which serializes to the
//!   upstream's own error shape: `{ "error": "..." }`
//! - No retries and no caching here; caching belongs to [`crate::query`]
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//! let products: Vec<Product> = client.get("products", &[("limit", "10".into())]).await?;
//! ```

mod client;

pub use client::ApiClient;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Normalized error for any failed upstream call.
///
/// Only `error` is serialized, so forwarding this value reproduces the body
/// the upstream sent. The failure kind rides along for status mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{error}")]
pub struct ApiError {
    pub error: String,
    #[serde(skip)]
    kind: ApiErrorKind,
}

/// Where an [`ApiError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// No usable response: connect failure, timeout, broken body.
    Transport,
    /// The upstream answered with a non-success status.
    Remote { status: u16 },
    /// The response body did not match the expected shape.
    Decode,
}

/// Error body shape used by the upstream.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Build an error of the given kind.
    pub fn new(kind: ApiErrorKind, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind,
        }
    }

    /// Transport-level failure.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::new(ApiErrorKind::Transport, err.to_string())
    }

    /// Response body could not be decoded.
    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::new(ApiErrorKind::Decode, err.to_string())
    }

    /// Unwrap a non-success response into the upstream's error payload.
    ///
    /// A `{ "error": ... }` body is forwarded verbatim. Any other body is
    /// used as the message as-is, and an empty body falls back to the
    /// status reason phrase.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let error = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .ok()
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| {
                StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Request failed")
                    .to_string()
            });

        Self::new(ApiErrorKind::Remote { status }, error)
    }

    #[must_use]
    pub const fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    /// Upstream status, if the upstream answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self.kind {
            ApiErrorKind::Remote { status } => Some(status),
            ApiErrorKind::Transport | ApiErrorKind::Decode => None,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, ApiErrorKind::Remote { status: 404 })
    }
}
