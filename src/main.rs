use std::{process::ExitCode, sync::Arc};
use storefront_checkout::checkout::AppState;
use storefront_checkout::config::{load_env_file, CheckoutConfig};
use storefront_checkout::router::create_app_router;
use storefront_checkout::telemetry::setup_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    // `.env` first, so RUST_LOG can come from it
    let env_file = load_env_file();
    setup_tracing();
    match &env_file {
        Some(path) => tracing::info!(path = %path.display(), ".env loaded"),
        None => tracing::debug!("no .env file loaded"),
    }

    // Load and validate configuration once
    let config = match CheckoutConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = &config.credentials {
        tracing::warn!("{}; checkout requests will be answered with 500", e);
    }

    let host = config.host.clone();
    let port = config.port;

    // Initialize application state
    let state = match AppState::with_stripe(config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("failed to build the Stripe client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Build application router with all routes and middleware
    let app = create_app_router(state);

    // Host names such as `localhost` are resolved here
    let listener = match tokio::net::TcpListener::bind((host.as_str(), port)).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {}:{}: {}", host, port, e);
            return ExitCode::FAILURE;
        }
    };
    match listener.local_addr() {
        Ok(addr) => tracing::info!("Server running on http://{}", addr),
        Err(_) => tracing::info!("Server running on http://{}:{}", host, port),
    }

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
