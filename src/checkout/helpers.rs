//! Checkout Helpers
//!
//! Small pure functions used by the handler: origin detection, redirect URL
//! construction, and log formatting.

use super::models::RedirectUrls;
use crate::payment::LineItem;
use axum::http::{header, HeaderMap, Uri};

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

/// Returns `scheme://host` of the inbound request.
///
/// Proxy headers win over the request line; missing pieces fall back to
/// `http` and `localhost`.
pub fn request_origin(headers: &HeaderMap, uri: &Uri) -> String {
    let scheme = first_header_value(headers, FORWARDED_PROTO)
        .or_else(|| uri.scheme_str().map(str::to_string))
        .unwrap_or_else(|| "http".to_string())
        .to_ascii_lowercase();

    let host = first_header_value(headers, FORWARDED_HOST)
        .or_else(|| first_header_value(headers, header::HOST.as_str()))
        .or_else(|| uri.authority().map(|a| a.as_str().to_string()))
        .unwrap_or_else(|| "localhost".to_string());

    format!("{}://{}", scheme, host)
}

fn first_header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Builds the success/cancel URLs on the landing page of `origin`.
pub fn redirect_urls(origin: &str, landing_path: &str) -> RedirectUrls {
    RedirectUrls {
        success_url: format!("{}{}?success=1", origin, landing_path),
        cancel_url: format!("{}{}?canceled=1", origin, landing_path),
    }
}

/// Produces a one-line summary of line items.
///
/// Example output: `"2x Café, 1x Té"`.
pub fn format_line_summary(items: &[LineItem]) -> String {
    items
        .iter()
        .map(|i| format!("{}x {}", i.quantity, i.product_name))
        .collect::<Vec<_>>()
        .join(", ")
}
