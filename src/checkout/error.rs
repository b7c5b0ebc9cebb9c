//! Error types for the checkout endpoint.

use super::models::ErrorResponse;
use crate::{config::ConfigError, payment::PaymentError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub const CONFIGURATION_MESSAGE: &str =
    "Configura STRIPE_SECRET_KEY y STRIPE_PUBLISHABLE_KEY en el entorno del servidor.";
pub const INVALID_REQUEST_MESSAGE: &str = "Solicitud inválida: no se recibieron artículos.";
pub const NO_VALID_ITEMS_MESSAGE: &str = "No hay artículos válidos para procesar.";
pub const INTERNAL_MESSAGE: &str = "Error interno al crear la sesión de pago.";
pub const PROVIDER_PREFIX: &str = "Stripe error: ";

/// Errors returned by the checkout endpoint. Each maps to one HTTP status.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Stripe credentials were not configured at startup.
    #[error("{}", CONFIGURATION_MESSAGE)]
    Configuration(#[source] ConfigError),

    /// The body is not a JSON object with an `items` array.
    #[error("{}", INVALID_REQUEST_MESSAGE)]
    InvalidRequest(String),

    /// Every item of the cart was dropped during normalization.
    #[error("{}", NO_VALID_ITEMS_MESSAGE)]
    NoValidItems,

    /// The provider rejected the session or could not be reached.
    #[error("{}{}", PROVIDER_PREFIX, .0)]
    Provider(String),

    /// Any other failure; the detail stays in the logs.
    #[error("{}", INTERNAL_MESSAGE)]
    Internal(String),
}

impl CheckoutError {
    pub fn status(&self) -> StatusCode {
        match self {
            CheckoutError::InvalidRequest(_) | CheckoutError::NoValidItems => StatusCode::BAD_REQUEST,
            CheckoutError::Configuration(_)
            | CheckoutError::Provider(_)
            | CheckoutError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PaymentError> for CheckoutError {
    fn from(e: PaymentError) -> Self {
        if e.is_provider_reported() {
            CheckoutError::Provider(e.to_string())
        } else {
            CheckoutError::Internal(e.to_string())
        }
    }
}

impl IntoResponse for CheckoutError {
    fn into_response(self) -> Response {
        match &self {
            CheckoutError::Configuration(e) => tracing::error!("checkout unavailable: {}", e),
            CheckoutError::InvalidRequest(detail) => tracing::info!("rejected checkout body: {}", detail),
            CheckoutError::NoValidItems => tracing::info!("rejected checkout: no valid items"),
            CheckoutError::Provider(detail) => tracing::warn!("provider error: {}", detail),
            CheckoutError::Internal(detail) => tracing::error!("internal checkout error: {}", detail),
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Why a single cart entry was dropped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ItemRejection {
    #[error("item is not an object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("name is blank or not text")]
    InvalidName,

    #[error("price is not a positive amount")]
    InvalidPrice,

    #[error("quantity is not a positive integer")]
    InvalidQuantity,
}
