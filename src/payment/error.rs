//! Error types for payment provider calls.

use thiserror::Error;

/// Errors that can occur while creating a checkout session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// The provider answered with an error (validation, authentication, ...).
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The provider could not be reached or did not answer in time.
    #[error("{0}")]
    Connection(String),

    /// The provider answered but the response could not be understood.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl PaymentError {
    /// Whether the error text comes from the provider and may be shown to the payer.
    pub fn is_provider_reported(&self) -> bool {
        matches!(self, PaymentError::Api { .. } | PaymentError::Connection(_))
    }
}

impl From<reqwest::Error> for PaymentError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            PaymentError::InvalidResponse(e.to_string())
        } else {
            PaymentError::Connection(e.to_string())
        }
    }
}
