//! Checkout State Management
//!
//! This module holds the application state shared by every request: the
//! validated configuration, the payment provider, and the location of the
//! storefront assets.

use crate::{
    config::CheckoutConfig,
    payment::{PaymentError, PaymentProvider, StripeClient},
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Core application state. Read-only after startup.
pub struct AppState {
    /// Configuration validated once at startup
    pub config: CheckoutConfig,

    /// Provider that creates hosted checkout sessions
    pub provider: Arc<dyn PaymentProvider>,

    /// Path to the directory containing the storefront pages
    pub assets_dir: PathBuf,
}

impl AppState {
    /// Creates the state around an explicit provider
    pub fn new(config: CheckoutConfig, provider: Arc<dyn PaymentProvider>) -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let assets_dir = Self::locate_assets_directory(&current_dir);

        tracing::info!(assets_dir = %assets_dir.display(), "using assets directory");

        Self {
            config,
            provider,
            assets_dir,
        }
    }

    /// Creates the state with a Stripe client built from the configuration.
    ///
    /// Without credentials the client is still built, but the endpoint
    /// refuses every request before reaching it.
    pub fn with_stripe(config: CheckoutConfig) -> Result<Self, PaymentError> {
        let secret_key = config
            .credentials
            .as_ref()
            .map(|c| c.secret_key.clone())
            .unwrap_or_default();
        let client = StripeClient::new(secret_key, config.api_base.clone(), config.request_timeout)?;

        Ok(Self::new(config, Arc::new(client)))
    }

    /// Overrides the assets directory
    pub fn with_assets_dir(mut self, assets_dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = assets_dir.into();
        self
    }

    /// Attempts to locate the assets directory using a multi-step strategy
    fn locate_assets_directory(current_dir: &Path) -> PathBuf {
        // 1. ./assets
        // 2. ../assets (if running from a subdir)
        // 3. Fallback to "assets" relative path

        if current_dir.join("assets").exists() {
            return current_dir.join("assets");
        }

        if let Some(parent) = current_dir.parent() {
            if parent.join("assets").exists() {
                return parent.join("assets");
            }
        }

        PathBuf::from("assets") // Fallback
    }

    /// Reads the storefront landing page the payer is redirected back to
    pub async fn load_landing_page(&self) -> Result<String, axum::http::StatusCode> {
        let file_name = Path::new(self.config.landing_path.trim_start_matches('/'))
            .file_name()
            .ok_or(axum::http::StatusCode::NOT_FOUND)?;
        let page_path = self.assets_dir.join(file_name);

        if !page_path.exists() {
            return Err(axum::http::StatusCode::NOT_FOUND);
        }

        tokio::fs::read_to_string(page_path)
            .await
            .map_err(|_| axum::http::StatusCode::INTERNAL_SERVER_ERROR)
    }
}
