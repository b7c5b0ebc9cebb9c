//! Payment Provider Models
//!
//! Data structures sent to and received from the hosted checkout provider.

use serde::Deserialize;

/// Checkout session mode. Only one-time payments are created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMode {
    Payment,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Payment => "payment",
        }
    }
}

/// A priced, quantified entry of a checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Three-letter currency code, lowercase
    pub currency: String,

    /// Display name of the product, never blank
    pub product_name: String,

    /// Unit price in minor units (cents), always positive
    pub unit_amount: i64,

    /// Number of units, always positive
    pub quantity: u32,
}

/// Everything needed to create one hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub mode: PaymentMode,
    pub line_items: Vec<LineItem>,
    pub success_url: String,
    pub cancel_url: String,
}

/// The session returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    /// Opaque session identifier
    pub id: String,

    /// Hosted payment page, when the provider returns one
    #[serde(default)]
    pub url: Option<String>,
}
