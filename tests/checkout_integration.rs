//! Integration tests for the checkout endpoint
//!
//! These tests drive the full router with a recording provider in place of
//! Stripe and verify:
//! - Credential checks happen before the body is read
//! - Body decoding and lenient item filtering
//! - Redirect URLs derived from the inbound request
//! - Mapping of provider failures to responses

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt; // for `oneshot`

use storefront_checkout::checkout::AppState;
use storefront_checkout::config::CheckoutConfig;
use storefront_checkout::payment::{
    CheckoutSession, PaymentError, PaymentMode, PaymentProvider, SessionRequest,
};
use storefront_checkout::router::create_app_router;

/// Provider double that records every request and answers with a fixed outcome
struct RecordingProvider {
    calls: Mutex<Vec<SessionRequest>>,
    outcome: Result<CheckoutSession, PaymentError>,
}

impl RecordingProvider {
    fn succeeding(session_id: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            outcome: Ok(CheckoutSession {
                id: session_id.to_string(),
                url: Some(format!("https://checkout.stripe.test/{}", session_id)),
            }),
        })
    }

    fn failing(error: PaymentError) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            outcome: Err(error),
        })
    }

    fn calls(&self) -> Vec<SessionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProvider for RecordingProvider {
    async fn create_checkout_session(
        &self,
        request: &SessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        self.calls.lock().unwrap().push(request.clone());
        self.outcome.clone()
    }
}

/// Helper function to create a test app around a provider
fn create_test_app(config: CheckoutConfig, provider: Arc<RecordingProvider>) -> axum::Router {
    let state = Arc::new(AppState::new(config, provider));
    create_app_router(state)
}

fn configured() -> CheckoutConfig {
    CheckoutConfig::with_credentials("sk_test_123", "pk_test_456")
}

/// Helper function to post a raw body and get the JSON response
async fn post_checkout(app: &axum::Router, host: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/create-checkout-session")
        .header("host", host)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, body)
}

#[tokio::test]
async fn test_checkout_creates_session() {
    let provider = RecordingProvider::succeeding("cs_test_abc");
    let app = create_test_app(configured(), provider.clone());

    let cart = json!({
        "items": [
            { "name": "Red Shoes", "price": 19.99, "quantity": 2 },
            { "name": "Blue Hat", "price": 5, "quantity": 1 }
        ]
    });
    let (status, body) = post_checkout(&app, "tienda.example.mx", &cart.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessionId"], "cs_test_abc");
    assert_eq!(body["publishableKey"], "pk_test_456");

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    let request = &calls[0];
    assert_eq!(request.mode, PaymentMode::Payment);
    assert_eq!(request.line_items.len(), 2);
    assert_eq!(request.line_items[0].product_name, "Red Shoes");
    assert_eq!(request.line_items[0].unit_amount, 1999);
    assert_eq!(request.line_items[0].quantity, 2);
    assert_eq!(request.line_items[0].currency, "mxn");
    assert_eq!(request.line_items[1].unit_amount, 500);
}

#[tokio::test]
async fn test_redirect_urls_follow_request_origin() {
    let provider = RecordingProvider::succeeding("cs_test_1");
    let app = create_test_app(configured(), provider.clone());
    let cart = json!({ "items": [{ "name": "A", "price": 10, "quantity": 1 }] }).to_string();

    let (status, _) = post_checkout(&app, "shop-one.test:8443", &cart).await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .method("POST")
        .uri("/create-checkout-session")
        .header("host", "10.0.0.7:8000")
        .header("x-forwarded-proto", "https")
        .header("x-forwarded-host", "shop-two.test")
        .body(Body::from(cart.clone()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].success_url, "http://shop-one.test:8443/tienda-online.html?success=1");
    assert_eq!(calls[0].cancel_url, "http://shop-one.test:8443/tienda-online.html?canceled=1");
    assert_eq!(calls[1].success_url, "https://shop-two.test/tienda-online.html?success=1");
    assert_eq!(calls[1].cancel_url, "https://shop-two.test/tienda-online.html?canceled=1");
}

#[tokio::test]
async fn test_invalid_items_are_dropped_not_fatal() {
    let provider = RecordingProvider::succeeding("cs_test_2");
    let app = create_test_app(configured(), provider.clone());

    let cart = json!({
        "items": [
            { "name": "A", "price": 10, "quantity": 1 },
            { "name": "", "price": 10, "quantity": 1 }
        ]
    });
    let (status, _) = post_checkout(&app, "localhost", &cart.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].line_items.len(), 1);
    assert_eq!(calls[0].line_items[0].product_name, "A");
}

#[tokio::test]
async fn test_empty_cart_is_rejected_without_calling_provider() {
    let provider = RecordingProvider::succeeding("cs_unused");
    let app = create_test_app(configured(), provider.clone());

    let (status, body) = post_checkout(&app, "localhost", r#"{ "items": [] }"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No hay artículos válidos para procesar.");
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_cart_with_only_invalid_items_is_rejected() {
    let provider = RecordingProvider::succeeding("cs_unused");
    let app = create_test_app(configured(), provider.clone());

    let cart = json!({
        "items": [
            { "name": "A", "price": 0, "quantity": 1 },
            { "name": "B", "price": 10, "quantity": -1 },
            { "name": "   ", "price": 10, "quantity": 1 },
            { "price": 10, "quantity": 1 }
        ]
    });
    let (status, body) = post_checkout(&app, "localhost", &cart.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No hay artículos válidos para procesar.");
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let provider = RecordingProvider::succeeding("cs_unused");
    let app = create_test_app(configured(), provider.clone());

    for body in ["not json", "[]", "{}", r#"{ "items": "A" }"#] {
        let (status, response) = post_checkout(&app, "localhost", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(response["error"], "Solicitud inválida: no se recibieron artículos.");
    }
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_body_without_json_content_type_is_accepted() {
    let provider = RecordingProvider::succeeding("cs_test_3");
    let app = create_test_app(configured(), provider.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/create-checkout-session.php")
        .header("host", "localhost")
        .body(Body::from(r#"{ "items": [{ "name": "A", "price": "12.5", "quantity": "2" }] }"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let calls = provider.calls();
    assert_eq!(calls[0].line_items[0].unit_amount, 1250);
    assert_eq!(calls[0].line_items[0].quantity, 2);
}

#[tokio::test]
async fn test_missing_credentials_fail_before_body_is_parsed() {
    let provider = RecordingProvider::succeeding("cs_unused");
    let config = CheckoutConfig::default();
    assert!(config.credentials.is_err());
    let app = create_test_app(config, provider.clone());

    // Not even valid JSON: the configuration error must win.
    let (status, body) = post_checkout(&app, "localhost", "not json").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Configura STRIPE_SECRET_KEY y STRIPE_PUBLISHABLE_KEY en el entorno del servidor."
    );
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_missing_credentials_win_over_oversized_body() {
    let provider = RecordingProvider::succeeding("cs_unused");
    let app = create_test_app(CheckoutConfig::default(), provider.clone());

    let oversized = "x".repeat(3 * 1024 * 1024);
    let (status, body) = post_checkout(&app, "localhost", &oversized).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Configura STRIPE_SECRET_KEY y STRIPE_PUBLISHABLE_KEY en el entorno del servidor."
    );
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_oversized_body_is_a_json_client_error() {
    let provider = RecordingProvider::succeeding("cs_unused");
    let app = create_test_app(configured(), provider.clone());

    let oversized = format!(r#"{{ "items": [], "padding": "{}" }}"#, "x".repeat(3 * 1024 * 1024));
    let (status, body) = post_checkout(&app, "localhost", &oversized).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Solicitud inválida: no se recibieron artículos.");
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_missing_publishable_key_fails() {
    let provider = RecordingProvider::succeeding("cs_unused");
    let config = CheckoutConfig::from_lookup(|key| {
        (key == "STRIPE_SECRET_KEY").then(|| "sk_test_123".to_string())
    })
    .unwrap();
    let app = create_test_app(config, provider.clone());

    let cart = json!({ "items": [{ "name": "A", "price": 10, "quantity": 1 }] });
    let (status, _) = post_checkout(&app, "localhost", &cart.to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_provider_rejection_is_reported() {
    let provider = RecordingProvider::failing(PaymentError::Api {
        status: 400,
        message: "Invalid currency: zzz".to_string(),
    });
    let app = create_test_app(configured(), provider.clone());

    let cart = json!({ "items": [{ "name": "A", "price": 10, "quantity": 1 }] });
    let (status, body) = post_checkout(&app, "localhost", &cart.to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Stripe error: Invalid currency: zzz");
    assert_eq!(provider.calls().len(), 1);
}

#[tokio::test]
async fn test_unexpected_provider_failure_is_generic() {
    let provider = RecordingProvider::failing(PaymentError::InvalidResponse(
        "missing field `id` at line 1".to_string(),
    ));
    let app = create_test_app(configured(), provider);

    let cart = json!({ "items": [{ "name": "A", "price": 10, "quantity": 1 }] });
    let (status, body) = post_checkout(&app, "localhost", &cart.to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error interno al crear la sesión de pago.");
}

#[tokio::test]
async fn test_health_and_request_id() {
    let app = create_test_app(configured(), RecordingProvider::succeeding("cs_unused"));

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let request_id = response
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(request_id.len(), 32);

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body_bytes[..], b"OK");
}

#[tokio::test]
async fn test_landing_page_served_from_assets() {
    let assets_dir = std::env::temp_dir().join(format!("storefront-assets-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&assets_dir).unwrap();
    std::fs::write(assets_dir.join("tienda-online.html"), "<h1>Tienda</h1>").unwrap();

    let state = AppState::new(configured(), RecordingProvider::succeeding("cs_unused"))
        .with_assets_dir(&assets_dir);
    let app = create_app_router(Arc::new(state));

    let request = Request::builder()
        .method("GET")
        .uri("/tienda-online.html?success=1")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body_bytes[..], b"<h1>Tienda</h1>");

    std::fs::remove_dir_all(&assets_dir).unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/tienda-online.html")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
