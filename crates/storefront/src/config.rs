//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_API_URL` - Base URL of the upstream product API
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_PRODUCT_LIMIT` - Products shown on the listing page (default: 10)
//! - `STOREFRONT_HTTP_TIMEOUT_SECS` - Upstream request timeout (default: 10)
//! - `STOREFRONT_CACHE_TTL_SECS` - Query cache time-to-live (default: 300)
//! - `STOREFRONT_CACHE_CAPACITY` - Maximum cached queries (default: 1000)
//! - `STOREFRONT_INVALID_ID_POLICY` - `reject`, `zero` or `placeholder` (default: reject)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use shopfront_core::{IdError, ProductId};
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Upstream product API configuration
    pub api: ApiConfig,
    /// Query cache configuration
    pub cache: CacheConfig,
    /// Number of products requested by the listing page
    pub product_limit: u32,
    /// What the detail page does with an unparseable product id
    pub invalid_id_policy: InvalidIdPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Upstream product API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; request paths are appended to it
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Query cache configuration.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub max_capacity: u64,
    pub time_to_live: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1000,
            time_to_live: Duration::from_secs(300),
        }
    }
}

/// Handling of a product id route parameter that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidIdPolicy {
    /// Respond 404 without fetching.
    #[default]
    Reject,
    /// Fetch product 0, whatever the upstream makes of it.
    Zero,
    /// Keep the query disabled and render the loading placeholder
    /// (or seeded data for the bare product key).
    Placeholder,
}

impl InvalidIdPolicy {
    /// Turn a raw route parameter into the id to query.
    ///
    /// `Ok(None)` means the id is unknown and the query must stay disabled.
    ///
    /// # Errors
    ///
    /// Returns the parse error under [`InvalidIdPolicy::Reject`].
    pub fn resolve(self, raw: &str) -> Result<Option<ProductId>, IdError> {
        match (raw.parse::<ProductId>(), self) {
            (Ok(id), _) => Ok(Some(id)),
            (Err(_), Self::Zero) => Ok(Some(ProductId::new(0))),
            (Err(_), Self::Placeholder) => Ok(None),
            (Err(e), Self::Reject) => Err(e),
        }
    }
}

impl FromStr for InvalidIdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "zero" => Ok(Self::Zero),
            "placeholder" => Ok(Self::Placeholder),
            other => Err(format!(
                "unknown policy '{other}' (expected reject, zero or placeholder)"
            )),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvSource(lookup);

        let host = env.parse_or("STOREFRONT_HOST", "127.0.0.1")?;
        let port = env.parse_or("STOREFRONT_PORT", "3000")?;
        let api = ApiConfig {
            base_url: parse_base_url("STOREFRONT_API_URL", &env.required("STOREFRONT_API_URL")?)?,
            timeout: Duration::from_secs(env.parse_or("STOREFRONT_HTTP_TIMEOUT_SECS", "10")?),
        };
        let cache = CacheConfig {
            max_capacity: env.parse_or("STOREFRONT_CACHE_CAPACITY", "1000")?,
            time_to_live: Duration::from_secs(env.parse_or("STOREFRONT_CACHE_TTL_SECS", "300")?),
        };
        let product_limit: u32 = env.parse_or("STOREFRONT_PRODUCT_LIMIT", "10")?;
        if product_limit == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_PRODUCT_LIMIT".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let invalid_id_policy = env.parse_or("STOREFRONT_INVALID_ID_POLICY", "reject")?;

        Ok(Self {
            host,
            port,
            api,
            cache,
            product_limit,
            invalid_id_policy,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration with defaults for everything but the API URL.
    #[must_use]
    pub fn with_api_url(base_url: Url) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(10),
            },
            cache: CacheConfig::default(),
            product_limit: 10,
            invalid_id_policy: InvalidIdPolicy::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct EnvSource<F>(F);

impl<F: Fn(&str) -> Option<String>> EnvSource<F> {
    /// Get a variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.optional(key).unwrap_or_else(|| default.to_string());
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

/// Parse and validate an http(s) base URL.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}
