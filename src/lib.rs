//! Storefront Checkout Library
//!
//! This library provides a small storefront backend: an endpoint that turns
//! a shopping cart into a hosted Stripe Checkout session, and the substring
//! filter used by the storefront's product list.

// Domain modules
pub mod checkout;
pub mod filter;
pub mod payment;

// Infrastructure
pub mod config;
pub mod router;
pub mod telemetry;
