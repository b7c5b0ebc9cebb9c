//! Checkout Domain Module
//!
//! This module contains the cart-to-session adapter, including:
//! - Domain models (request, responses, normalized cart)
//! - Cart normalization and minor-unit conversion
//! - Origin and redirect URL helpers
//! - Application state
//! - REST API handlers

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod models;
pub mod normalize;
pub mod state;

// Re-export commonly used types for convenience
pub use error::{CheckoutError, ItemRejection};
pub use handlers::routes;
pub use state::{AppState, SharedState};
