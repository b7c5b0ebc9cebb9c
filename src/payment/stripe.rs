//! Stripe Checkout client
//!
//! Creates sessions through `POST /v1/checkout/sessions`. Stripe takes
//! form-encoded bodies with bracketed keys for nested fields, authenticated
//! with the secret key as the basic-auth user.

use super::{CheckoutSession, PaymentError, PaymentProvider, SessionRequest};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const CHECKOUT_SESSIONS_PATH: &str = "/v1/checkout/sessions";

/// Error envelope returned by Stripe on non-2xx responses.
#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<String>,
}

/// Stripe-backed [`PaymentProvider`].
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl StripeClient {
    /// Builds a client whose every call is bounded by `timeout`.
    pub fn new(
        secret_key: impl Into<String>,
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PaymentError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PaymentError::Connection(e.to_string()))?;

        Ok(Self {
            http,
            secret_key: secret_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn sessions_url(&self) -> String {
        format!("{}{}", self.api_base, CHECKOUT_SESSIONS_PATH)
    }
}

/// Flattens a session request into Stripe's form parameters.
///
/// Example keys: `line_items[0][price_data][unit_amount]`, `line_items[0][quantity]`.
pub fn session_form(request: &SessionRequest) -> Vec<(String, String)> {
    let mut params = vec![
        ("mode".to_string(), request.mode.as_str().to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
    ];

    for (i, item) in request.line_items.iter().enumerate() {
        let prefix = format!("line_items[{}]", i);
        params.push((
            format!("{}[price_data][currency]", prefix),
            item.currency.clone(),
        ));
        params.push((
            format!("{}[price_data][product_data][name]", prefix),
            item.product_name.clone(),
        ));
        params.push((
            format!("{}[price_data][unit_amount]", prefix),
            item.unit_amount.to_string(),
        ));
        params.push((format!("{}[quantity]", prefix), item.quantity.to_string()));
    }

    params
}

#[async_trait]
impl PaymentProvider for StripeClient {
    #[tracing::instrument(skip_all, fields(items = request.line_items.len()))]
    async fn create_checkout_session(
        &self,
        request: &SessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let response = self
            .http
            .post(self.sessions_url())
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&session_form(request))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let session = response.json::<CheckoutSession>().await?;
            tracing::debug!(session_id = %session.id, "checkout session created");
            return Ok(session);
        }

        let body = response.text().await?;
        let detail = serde_json::from_str::<StripeErrorBody>(&body)
            .ok()
            .map(|b| b.error);
        tracing::warn!(
            status = status.as_u16(),
            kind = ?detail.as_ref().and_then(|d| d.kind.as_deref()),
            code = ?detail.as_ref().and_then(|d| d.code.as_deref()),
            "stripe rejected checkout session"
        );

        let message = detail
            .and_then(|d| d.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

        Err(PaymentError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
