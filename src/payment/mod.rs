//! Payment Provider Module
//!
//! This module contains the seam between the checkout endpoint and the hosted
//! payment provider:
//! - Provider-bound models (LineItem, SessionRequest, CheckoutSession)
//! - The `PaymentProvider` trait and its error type
//! - The Stripe Checkout implementation over reqwest

pub mod error;
pub mod models;
pub mod provider;
pub mod stripe;

// Re-export commonly used types
pub use error::PaymentError;
pub use models::{CheckoutSession, LineItem, PaymentMode, SessionRequest};
pub use provider::PaymentProvider;
pub use stripe::StripeClient;
