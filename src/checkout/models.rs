//! Checkout Domain Models
//!
//! This module contains the request and response shapes of the checkout
//! endpoint.

use crate::payment::LineItem;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ItemRejection;

// =============================================================================
// Checkout Domain Models
// =============================================================================

/// Body of `POST /create-checkout-session`
///
/// Entries stay untyped here; each one is decoded on its own so a bad entry
/// only drops itself.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Raw cart entries, expected as `{ name, price, quantity }`
    pub items: Vec<Value>,
}

/// Successful response: the session to redirect to and the key to do it with
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Opaque checkout session identifier
    pub session_id: String,

    /// Publishable key for the client-side SDK
    pub publishable_key: String,
}

/// Error body shared by every failure status
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Success and cancel URLs the hosted page sends the payer back to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectUrls {
    pub success_url: String,
    pub cancel_url: String,
}

/// Outcome of normalizing a raw cart
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedCart {
    /// Valid entries in input order
    pub line_items: Vec<LineItem>,

    /// Dropped entries, keyed by their index in the request
    pub rejected: Vec<(usize, ItemRejection)>,
}
