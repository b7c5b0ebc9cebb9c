//! Server configuration
//!
//! Everything is read from the process environment (optionally seeded from a
//! `.env` file) exactly once, when the server starts. Missing Stripe
//! credentials are not a startup failure: the error is kept in the config and
//! reported on every checkout request instead.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

pub const SECRET_KEY_VAR: &str = "STRIPE_SECRET_KEY";
pub const PUBLISHABLE_KEY_VAR: &str = "STRIPE_PUBLISHABLE_KEY";

pub const DEFAULT_CURRENCY: &str = "mxn";
pub const DEFAULT_LANDING_PATH: &str = "/tienda-online.html";
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Errors produced while reading the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    /// A variable is set but its value cannot be used.
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Secret and publishable keys for the Stripe account.
#[derive(Clone, PartialEq, Eq)]
pub struct StripeCredentials {
    pub secret_key: String,
    pub publishable_key: String,
}

// Keep the secret out of logs.
impl std::fmt::Debug for StripeCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeCredentials")
            .field("secret_key", &"<redacted>")
            .field("publishable_key", &self.publishable_key)
            .finish()
    }
}

/// Validated configuration for the checkout server.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Outcome of the one-time credential check.
    pub credentials: Result<StripeCredentials, ConfigError>,

    /// Three-letter ISO currency code, lowercase.
    pub currency: String,

    /// Path of the storefront page the payer returns to.
    pub landing_path: String,

    /// Base URL of the Stripe REST API.
    pub api_base: String,

    /// Timeout applied to each outbound Stripe call.
    pub request_timeout: Duration,

    /// Host name or IP address the HTTP server binds to.
    pub host: String,

    /// Port the HTTP server binds to.
    pub port: u16,
}

impl CheckoutConfig {
    /// Reads the process environment.
    ///
    /// Call [`load_env_file`] first so values from `.env` are visible here.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credentials = match (non_empty(SECRET_KEY_VAR), non_empty(PUBLISHABLE_KEY_VAR)) {
            (Some(secret_key), Some(publishable_key)) => Ok(StripeCredentials {
                secret_key: secret_key.trim().to_string(),
                publishable_key: publishable_key.trim().to_string(),
            }),
            (None, _) => Err(ConfigError::Missing(SECRET_KEY_VAR)),
            (_, None) => Err(ConfigError::Missing(PUBLISHABLE_KEY_VAR)),
        };

        let currency = match non_empty("CHECKOUT_CURRENCY") {
            Some(raw) => parse_currency(&raw)?,
            None => DEFAULT_CURRENCY.to_string(),
        };

        let landing_path = match non_empty("CHECKOUT_LANDING_PATH") {
            Some(raw) => parse_landing_path(&raw)?,
            None => DEFAULT_LANDING_PATH.to_string(),
        };

        let api_base = non_empty("STRIPE_API_BASE")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let timeout_secs = match non_empty("STRIPE_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                var: "STRIPE_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let host = non_empty("HOST")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match non_empty("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            credentials,
            currency,
            landing_path,
            api_base,
            request_timeout: Duration::from_secs(timeout_secs),
            host,
            port,
        })
    }

    /// Configuration with explicit credentials and defaults for the rest.
    pub fn with_credentials(secret_key: impl Into<String>, publishable_key: impl Into<String>) -> Self {
        Self {
            credentials: Ok(StripeCredentials {
                secret_key: secret_key.into(),
                publishable_key: publishable_key.into(),
            }),
            ..Self::default()
        }
    }
}

/// Seeds the process environment from the nearest `.env` file.
///
/// Variables already set in the environment win. Returns the file that was
/// read, if any. Runs before logging is set up, so `RUST_LOG` may come
/// from the file.
pub fn load_env_file() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Seeds the process environment from a specific file.
pub fn load_env_file_from(path: impl AsRef<Path>) -> Option<PathBuf> {
    let path = path.as_ref();
    dotenvy::from_path(path).ok().map(|()| path.to_path_buf())
}

impl Default for CheckoutConfig {
    /// Defaults with no credentials configured.
    fn default() -> Self {
        Self {
            credentials: Err(ConfigError::Missing(SECRET_KEY_VAR)),
            currency: DEFAULT_CURRENCY.to_string(),
            landing_path: DEFAULT_LANDING_PATH.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

fn parse_currency(raw: &str) -> Result<String, ConfigError> {
    let code = raw.trim().to_ascii_lowercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(ConfigError::Invalid {
            var: "CHECKOUT_CURRENCY",
            reason: format!("expected a 3-letter currency code, got {:?}", raw),
        })
    }
}

/// Paths already routed by the server.
const RESERVED_PATHS: [&str; 3] = ["/health", "/create-checkout-session", "/create-checkout-session.php"];

fn parse_landing_path(raw: &str) -> Result<String, ConfigError> {
    let path = raw.trim();
    let invalid = |reason: String| ConfigError::Invalid {
        var: "CHECKOUT_LANDING_PATH",
        reason,
    };

    if !path.starts_with('/') || path.starts_with("//") {
        return Err(invalid(format!("expected an absolute path, got {:?}", raw)));
    }
    // `:` and `*` start route captures; `?` and `#` would end up inside the redirect URLs.
    if let Some(c) = path
        .chars()
        .find(|c| matches!(c, ':' | '*' | '?' | '#' | '{' | '}') || c.is_whitespace())
    {
        return Err(invalid(format!("character {:?} is not allowed in {:?}", c, raw)));
    }
    if RESERVED_PATHS.contains(&path) {
        return Err(invalid(format!("{:?} is already served by the checkout API", path)));
    }
    Ok(path.to_string())
}
