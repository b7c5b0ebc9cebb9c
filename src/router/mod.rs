//! Routing module for the checkout server

use crate::checkout::state::SharedState;
use axum::{
    body::Body,
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
    routing::get,
    Router,
};
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tracing::Instrument;
use uuid::Uuid;

/// Header carrying the id assigned to each request
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Creates and configures the application router with all routes and middleware
pub fn create_app_router(state: SharedState) -> Router {
    // Middleware: CORS (the storefront may be served from another origin)
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .merge(crate::checkout::routes(&state.config.landing_path))
        .layer(axum::middleware::from_fn(log_requests))
        .layer(cors_layer)
        .with_state(state)
}

/// Endpoint: GET /health
async fn health() -> &'static str {
    "OK"
}

/// Middleware: tags the request with an id and logs its outcome
async fn log_requests(req: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().simple().to_string();
    let span = tracing::info_span!(
        "request",
        id = %request_id,
        method = %req.method(),
        uri = %req.uri()
    );
    let started = Instant::now();

    let mut res = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if res.status().is_server_error() {
            tracing::error!(status = res.status().as_u16(), elapsed_ms, "request failed");
        } else if !res.status().is_success() {
            tracing::warn!(status = res.status().as_u16(), elapsed_ms, "request rejected");
        } else {
            tracing::info!(status = res.status().as_u16(), elapsed_ms, "request served");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}
