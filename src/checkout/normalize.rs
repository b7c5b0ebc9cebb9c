//! Cart normalization
//!
//! Turns the untrusted request body into provider-bound line items. The
//! body as a whole must be well formed; individual entries are filtered
//! leniently, so one bad entry never fails the batch.

use super::{
    error::{CheckoutError, ItemRejection},
    models::{CheckoutRequest, NormalizedCart},
};
use crate::payment::LineItem;
use serde_json::{Map, Value};

/// Parses the request body into its raw cart entries.
pub fn decode_request(body: &[u8]) -> Result<Vec<Value>, CheckoutError> {
    serde_json::from_slice::<CheckoutRequest>(body)
        .map(|request| request.items)
        .map_err(|e| CheckoutError::InvalidRequest(e.to_string()))
}

/// Normalizes every entry, keeping the valid ones in order.
pub fn normalize_cart(items: &[Value], currency: &str) -> NormalizedCart {
    let mut cart = NormalizedCart::default();

    for (index, raw) in items.iter().enumerate() {
        match normalize_item(raw, currency) {
            Ok(item) => cart.line_items.push(item),
            Err(rejection) => {
                tracing::debug!(index, %rejection, "dropping cart item");
                cart.rejected.push((index, rejection));
            }
        }
    }

    cart
}

/// Decodes a single `{ name, price, quantity }` entry.
pub fn normalize_item(raw: &Value, currency: &str) -> Result<LineItem, ItemRejection> {
    let fields = raw.as_object().ok_or(ItemRejection::NotAnObject)?;

    // All three must be present before any of them is inspected.
    let name = required(fields, "name")?;
    let price = required(fields, "price")?;
    let quantity = required(fields, "quantity")?;

    let product_name = parse_name(name).ok_or(ItemRejection::InvalidName)?;
    let price = parse_price(price).ok_or(ItemRejection::InvalidPrice)?;
    let quantity = parse_quantity(quantity).ok_or(ItemRejection::InvalidQuantity)?;

    let unit_amount = to_minor_units(price)
        .filter(|amount| *amount > 0)
        .ok_or(ItemRejection::InvalidPrice)?;

    Ok(LineItem {
        currency: currency.to_string(),
        product_name,
        unit_amount,
        quantity,
    })
}

/// Null counts as absent.
fn required<'a>(fields: &'a Map<String, Value>, key: &'static str) -> Result<&'a Value, ItemRejection> {
    fields
        .get(key)
        .filter(|v| !v.is_null())
        .ok_or(ItemRejection::MissingField(key))
}

fn parse_name(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        // `false` has no text and ends up blank.
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn parse_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (price.is_finite() && price > 0.0).then_some(price)
}

fn parse_quantity(value: &Value) -> Option<u32> {
    let quantity = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => truncate(n.as_f64()?)?,
        },
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(i) => i,
                Err(_) => truncate(s.parse::<f64>().ok()?)?,
            }
        }
        _ => return None,
    };
    u32::try_from(quantity).ok().filter(|q| *q > 0)
}

/// Drops the fractional part, so `2.9` counts as `2`.
fn truncate(value: f64) -> Option<i64> {
    (value.is_finite() && value.abs() < i64::MAX as f64).then_some(value.trunc() as i64)
}

/// Converts a price to minor units, rounding half away from zero.
///
/// Rounding works on the decimal digits of the price as written, so
/// `19.995` becomes `2000` even though `19.995 * 100.0` is
/// `1999.4999999999998` in binary floating point. Returns `None` for
/// non-finite, non-positive or out-of-range prices.
pub fn to_minor_units(price: f64) -> Option<i64> {
    if !price.is_finite() || price <= 0.0 {
        return None;
    }

    // Display for f64 is the shortest round-trip form and never uses an exponent.
    let text = price.to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let fraction = fraction.as_bytes();
    let digit = |i: usize| fraction.get(i).map_or(0, |b| i64::from(b - b'0'));

    let cents = whole
        .parse::<i64>()
        .ok()?
        .checked_mul(100)?
        .checked_add(digit(0) * 10 + digit(1))?;

    if digit(2) >= 5 {
        cents.checked_add(1)
    } else {
        Some(cents)
    }
}
