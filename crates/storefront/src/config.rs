//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `TOKOKU_HOST` - Bind address (default: 127.0.0.1)
//! - `TOKOKU_PORT` - Listen port (default: 3000)
//! - `TOKOKU_BASE_URL` - Public URL of the storefront (default: `http://localhost:3000`).
//!   An `https` URL turns on the secure cookie flag.
//! - `CATALOG_API_URL` - Base URL of the demo product API (default: `https://fakestoreapi.com`)
//! - `CATALOG_CACHE_TTL_SECS` - How long fetched products are cached (default: 300)
//! - `CATALOG_TIMEOUT_SECS` - Request timeout for the product fetch (default: 10)
//! - `CHECKOUT_DELAY_MS` - Simulated payment processing time (default: 1500)
//! - `LOGIN_RATE_LIMIT` - `true`/`false`, throttle `POST /login` per client IP (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_TRACES_SAMPLE_RATE` - Fraction of requests traced (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_API_URL: &str = "https://fakestoreapi.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
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
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Demo product API settings
    pub catalog: CatalogConfig,
    /// Simulated payment processing time
    pub checkout_delay: Duration,
    /// Whether `POST /login` is rate limited
    pub login_rate_limit: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Demo product API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL; products are fetched from `{api_url}/products`
    pub api_url: Url,
    /// Cache lifetime of a fetched product list
    pub cache_ttl: Duration,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: default_url("http://localhost:3000"),
            catalog: CatalogConfig::default(),
            checkout_delay: Duration::from_millis(1500),
            login_rate_limit: true,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: default_url(DEFAULT_CATALOG_API_URL),
            cache_ttl: Duration::from_secs(300),
            timeout: Duration::from_secs(10),
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
    /// Returns `ConfigError` if a variable is set to a value that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);
        let defaults = Self::default();

        let host = env.parse_or("TOKOKU_HOST", defaults.host)?;
        let port = env.parse_or("TOKOKU_PORT", defaults.port)?;
        let base_url = env.parse_or("TOKOKU_BASE_URL", defaults.base_url)?;
        let catalog = CatalogConfig {
            api_url: env.parse_or("CATALOG_API_URL", defaults.catalog.api_url)?,
            cache_ttl: Duration::from_secs(env.parse_or("CATALOG_CACHE_TTL_SECS", 300_u64)?),
            timeout: Duration::from_secs(env.parse_or("CATALOG_TIMEOUT_SECS", 10_u64)?),
        };
        let checkout_delay = Duration::from_millis(env.parse_or("CHECKOUT_DELAY_MS", 1500_u64)?);
        let login_rate_limit = env.parse_or("LOGIN_RATE_LIMIT", defaults.login_rate_limit)?;
        let sentry_traces_sample_rate = env.parse_or("SENTRY_TRACES_SAMPLE_RATE", 0.0_f32)?;
        if !(0.0..=1.0).contains(&sentry_traces_sample_rate) {
            return Err(ConfigError::InvalidEnvVar(
                "SENTRY_TRACES_SAMPLE_RATE".to_string(),
                "must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            base_url,
            catalog,
            checkout_delay,
            login_rate_limit,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

impl CatalogConfig {
    /// Full URL of the product list endpoint.
    #[must_use]
    pub fn products_url(&self) -> String {
        format!("{}/products", self.api_url.as_str().trim_end_matches('/'))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable. Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Parse a variable, falling back to `default` when it is unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

fn default_url(raw: &str) -> Url {
    // Only called with the literal defaults above.
    Url::parse(raw).unwrap_or_else(|_| unreachable!("default URL {raw} is valid"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(
            config.catalog.products_url(),
            "https://fakestoreapi.com/products"
        );
        assert_eq!(config.catalog.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.checkout_delay, Duration::from_millis(1500));
        assert!(config.login_rate_limit);
        assert!(!config.is_https());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("TOKOKU_HOST", "0.0.0.0"),
            ("TOKOKU_PORT", "8080"),
            ("TOKOKU_BASE_URL", "https://shop.example.com"),
            ("CATALOG_API_URL", "http://127.0.0.1:9999/"),
            ("CHECKOUT_DELAY_MS", "0"),
            ("LOGIN_RATE_LIMIT", "false"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert!(config.is_https());
        assert_eq!(config.catalog.products_url(), "http://127.0.0.1:9999/products");
        assert_eq!(config.checkout_delay, Duration::ZERO);
        assert!(!config.login_rate_limit);
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("TOKOKU_PORT", "  "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = load(&[("TOKOKU_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "TOKOKU_PORT"));

        let err = load(&[("TOKOKU_BASE_URL", "not a url")]).unwrap_err();
        assert!(err.to_string().contains("TOKOKU_BASE_URL"));

        assert!(load(&[("SENTRY_TRACES_SAMPLE_RATE", "1.5")]).is_err());
    }
}
