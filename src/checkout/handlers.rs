//! REST API handlers for checkout
//!
//! This module implements the endpoint that turns a cart into a hosted
//! checkout session, plus the storefront landing page.

use super::{
    error::CheckoutError,
    helpers::*,
    models::SessionResponse,
    normalize::{decode_request, normalize_cart},
    state::SharedState,
};
use crate::payment::{PaymentMode, SessionRequest};
use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{HeaderMap, Uri},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};

/// Largest accepted checkout body, matching axum's default extractor limit
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Creates routes for checkout operations
pub fn routes(landing_path: &str) -> Router<SharedState> {
    Router::new()
        .route("/create-checkout-session", post(create_checkout_session))
        .route("/create-checkout-session.php", post(create_checkout_session))
        .route(landing_path, get(landing_page))
}

/// Endpoint: POST /create-checkout-session
/// Normalizes the cart and asks the provider for a one-time-payment session.
async fn create_checkout_session(
    State(state): State<SharedState>,
    headers: HeaderMap,
    uri: Uri,
    body: Body,
) -> Result<Json<SessionResponse>, CheckoutError> {
    // Checked before the body is read.
    let credentials = state
        .config
        .credentials
        .as_ref()
        .map_err(|e| CheckoutError::Configuration(e.clone()))?;

    let body = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| CheckoutError::InvalidRequest(format!("unreadable body: {}", e)))?;
    let items = decode_request(&body)?;
    let cart = normalize_cart(&items, &state.config.currency);
    if !cart.rejected.is_empty() {
        tracing::info!(
            received = items.len(),
            dropped = cart.rejected.len(),
            "dropped invalid cart items"
        );
    }
    if cart.line_items.is_empty() {
        return Err(CheckoutError::NoValidItems);
    }

    let origin = request_origin(&headers, &uri);
    let urls = redirect_urls(&origin, &state.config.landing_path);

    tracing::info!(
        origin = %origin,
        summary = %format_line_summary(&cart.line_items),
        "creating checkout session"
    );

    let request = SessionRequest {
        mode: PaymentMode::Payment,
        line_items: cart.line_items,
        success_url: urls.success_url,
        cancel_url: urls.cancel_url,
    };
    let session = state.provider.create_checkout_session(&request).await?;

    tracing::info!(
        session_id = %session.id,
        checkout_url = session.url.as_deref().unwrap_or("-"),
        "checkout session ready"
    );

    Ok(Json(SessionResponse {
        session_id: session.id,
        publishable_key: credentials.publishable_key.clone(),
    }))
}

/// Endpoint: GET <landing path>
/// Serves the storefront page from the assets directory.
async fn landing_page(State(state): State<SharedState>) -> impl IntoResponse {
    match state.load_landing_page().await {
        Ok(html) => Html(html).into_response(),
        Err(status) => (status, status.canonical_reason().unwrap_or_default()).into_response(),
    }
}
