//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `PLANTIFY_HOST` - Bind address (default: 127.0.0.1)
//! - `PLANTIFY_PORT` - Listen port (default: 3000)
//! - `PLANTIFY_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `PLANTIFY_CART_IDLE_MINUTES` - Minutes before an untouched cart is evicted (default: 1440)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Fraction of errors sent to Sentry (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Fraction of transactions traced (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

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
    /// How long a cart may go untouched before it is evicted
    pub cart_idle_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Error event sample rate
    pub sentry_sample_rate: f32,
    /// Performance tracing sample rate
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = parse_var("PLANTIFY_HOST", &get("PLANTIFY_HOST", "127.0.0.1"))?;
        let port = parse_var("PLANTIFY_PORT", &get("PLANTIFY_PORT", "3000"))?;
        let base_url = parse_var(
            "PLANTIFY_BASE_URL",
            &get("PLANTIFY_BASE_URL", "http://localhost:3000"),
        )?;
        let cart_idle_minutes: u64 = parse_var(
            "PLANTIFY_CART_IDLE_MINUTES",
            &get("PLANTIFY_CART_IDLE_MINUTES", "1440"),
        )?;
        if cart_idle_minutes == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "PLANTIFY_CART_IDLE_MINUTES".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let sentry_sample_rate = parse_rate("SENTRY_SAMPLE_RATE", &get("SENTRY_SAMPLE_RATE", "1.0"))?;
        let sentry_traces_sample_rate = parse_rate(
            "SENTRY_TRACES_SAMPLE_RATE",
            &get("SENTRY_TRACES_SAMPLE_RATE", "0.0"),
        )?;

        Ok(Self {
            host,
            port,
            base_url,
            cart_idle_timeout: Duration::from_secs(cart_idle_minutes.saturating_mul(60)),
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an environment value, naming the variable on failure.
fn parse_var<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a sample rate in `[0.0, 1.0]`.
fn parse_rate(key: &str, value: &str) -> Result<f32, ConfigError> {
    let rate: f32 = parse_var(key, value)?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}
