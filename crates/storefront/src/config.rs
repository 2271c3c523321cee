//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_DIR` - Directory for persisted state (default: ./data)
//! - `STOREFRONT_EPHEMERAL` - Keep state in memory only (default: false)
//! - `STOREFRONT_ALLOWED_ORIGIN` - Browser origin allowed by CORS
//! - `CATALOG_BASE_URL` - Product API base URL (default: <https://fakestoreapi.com>)
//! - `CATALOG_TIMEOUT_SECS` - Product API request timeout (default: 10)
//! - `CHECKOUT_DELAY_MS` - Simulated payment processing time (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com";

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
    /// Product catalog API configuration
    pub catalog: CatalogConfig,
    /// Where cart, wishlist, session and accounts are saved
    pub data_dir: PathBuf,
    /// Keep state in memory instead of `data_dir`
    pub ephemeral: bool,
    /// Simulated payment processing time at checkout
    pub checkout_delay: Duration,
    /// Origin allowed to call the API from a browser
    pub allowed_origin: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Product catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog API
    pub base_url: Url,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_url(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            catalog: CatalogConfig::default(),
            data_dir: PathBuf::from("data"),
            ephemeral: false,
            checkout_delay: Duration::from_millis(3000),
            allowed_origin: None,
            sentry_dsn: None,
            sentry_environment: None,
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
    /// Returns `ConfigError` if a variable is set to a value that cannot be
    /// parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_parsed_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = get_parsed_env("STOREFRONT_PORT", "3000")?;
        let data_dir = PathBuf::from(get_env_or_default("STOREFRONT_DATA_DIR", "data"));
        let ephemeral = get_parsed_env("STOREFRONT_EPHEMERAL", "false")?;
        let checkout_delay =
            Duration::from_millis(get_parsed_env("CHECKOUT_DELAY_MS", "3000")?);

        Ok(Self {
            host,
            port,
            catalog: CatalogConfig::from_env()?,
            data_dir,
            ephemeral,
            checkout_delay,
            allowed_origin: get_optional_env("STOREFRONT_ALLOWED_ORIGIN"),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    /// Load the catalog settings on their own, for tools that never bind a
    /// server.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for an unparseable URL or timeout.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = get_env_or_default("CATALOG_BASE_URL", DEFAULT_CATALOG_URL);
        let base_url = parse_base_url(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_BASE_URL".to_string(), e))?;
        let timeout_secs: u64 = get_parsed_env("CATALOG_TIMEOUT_SECS", "10")?;

        Ok(Self {
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn default_catalog_url() -> Url {
    Url::parse(DEFAULT_CATALOG_URL).expect("default catalog URL is valid")
}

/// Parse a catalog base URL. Only http(s) URLs that can carry path
/// segments are accepted.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.cannot_be_a_base() {
        return Err("URL cannot be a base".to_string());
    }
    Ok(url)
}

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable parsed as `T`, falling back to `default`.
fn get_parsed_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            port: 8080,
            ..StorefrontConfig::default()
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.checkout_delay, Duration::from_secs(3));
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(!config.ephemeral);
        assert_eq!(config.catalog.base_url.as_str(), "https://fakestoreapi.com/");
    }

    #[test]
    fn test_parse_base_url_accepts_http() {
        let url = parse_base_url("http://localhost:9000/api/").unwrap();
        assert_eq!(url.port(), Some(9000));
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        assert!(parse_base_url("ftp://example.com").is_err());
        assert!(parse_base_url("mailto:shop@example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), "too big".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid environment variable STOREFRONT_PORT: too big"
        );
    }
}
