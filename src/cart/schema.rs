//! Stored cart schema
//!
//! Carts are persisted as a JSON object keyed by product id. Two entry shapes
//! exist in the wild:
//!
//! - legacy: a bare quantity, e.g. `{"p1": 3}`
//! - current: `{"p1": {"qty": 3, "size": "M"}}`, where `size` may be absent or `null`
//!
//! [`upgrade`] accepts both and always yields the current shape. It is applied
//! on every read, so stored legacy data is rewritten lazily on the next save.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::warn;

use crate::cart::{Cart, CartEntry};

/// Errors raised while reading a stored cart.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The stored value is not valid JSON.
    #[error("Stored cart is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The stored value is valid JSON but not an object.
    #[error("Stored cart is not a JSON object")]
    NotAnObject,
}

/// A single stored entry, in any known shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    /// Bare quantity
    Legacy(Number),

    /// Quantity plus size
    Current {
        qty: Number,

        #[serde(default)]
        size: Option<String>,
    },
}

impl StoredEntry {
    /// Normalize into a cart entry, or `None` if the quantity is not a whole number.
    fn into_entry(self) -> Option<CartEntry> {
        match self {
            Self::Legacy(qty) => Some(CartEntry::new(quantity(&qty)?, "")),
            Self::Current { qty, size } => {
                Some(CartEntry::new(quantity(&qty)?, size.unwrap_or_default()))
            }
        }
    }
}

/// Read a stored quantity. Integral floats such as `2.0` count as whole
/// numbers, negatives become zero and values past `u32::MAX` are clamped.
fn quantity(number: &Number) -> Option<u32> {
    let value = Decimal::from_str_exact(&number.to_string()).ok()?;

    if !value.is_integer() {
        return None;
    }

    if value.is_sign_negative() {
        return Some(0);
    }

    Some(u32::try_from(value).unwrap_or(u32::MAX))
}

/// Parse stored bytes into a normalized cart.
///
/// Zero-quantity entries are dropped so the result never holds an empty line.
/// Entries of an unknown shape are skipped; the rest of the cart survives.
///
/// # Errors
///
/// Returns a [`SchemaError`] if the value is not a JSON object.
pub fn upgrade(raw: &str) -> Result<Cart, SchemaError> {
    let value: Value = serde_json::from_str(raw)?;

    upgrade_value(value)
}

/// Normalize an already-parsed JSON value into a cart.
///
/// # Errors
///
/// Returns [`SchemaError::NotAnObject`] if the value is not an object.
pub fn upgrade_value(value: Value) -> Result<Cart, SchemaError> {
    let Value::Object(object) = value else {
        return Err(SchemaError::NotAnObject);
    };

    Ok(upgrade_object(object))
}

fn upgrade_object(object: Map<String, Value>) -> Cart {
    object
        .into_iter()
        .filter_map(|(id, value)| {
            let entry = StoredEntry::deserialize(value)
                .ok()
                .and_then(StoredEntry::into_entry);

            if entry.is_none() {
                warn!(%id, "skipping unreadable stored cart entry");
            }

            entry.map(|entry| (id, entry))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn legacy_quantity_is_upgraded() -> TestResult {
        let cart = upgrade(r#"{"p1": 3}"#)?;

        assert_eq!(cart.get("p1"), Some(&CartEntry::new(3, "")));

        Ok(())
    }

    #[test]
    fn missing_or_null_size_becomes_empty() -> TestResult {
        let cart = upgrade(r#"{"p1": {"qty": 2}, "p2": {"qty": 1, "size": null}}"#)?;

        assert_eq!(cart.get("p1"), Some(&CartEntry::new(2, "")));
        assert_eq!(cart.get("p2"), Some(&CartEntry::new(1, "")));

        Ok(())
    }

    #[test]
    fn mixed_shapes_keep_stored_order() -> TestResult {
        let cart = upgrade(r#"{"p4": {"qty": 1, "size": "L"}, "p1": 2, "p2": {"qty": 5, "size": "M"}}"#)?;

        let ids: Vec<&str> = cart.iter().map(|(id, _)| id).collect();

        assert_eq!(ids, ["p4", "p1", "p2"]);
        assert_eq!(cart.total_item_count(), 8);

        Ok(())
    }

    #[test]
    fn zero_quantities_are_dropped() -> TestResult {
        let cart = upgrade(r#"{"p1": 0, "p2": {"qty": 0, "size": "M"}, "p3": 1}"#)?;

        assert_eq!(cart.len(), 1);
        assert!(cart.contains("p3"));

        Ok(())
    }

    #[test]
    fn upgrade_is_idempotent() -> TestResult {
        let first = upgrade(r#"{"p1": 3, "p2": {"qty": 1}}"#)?;
        let second = upgrade(&serde_json::to_string(&first)?)?;

        assert_eq!(first, second);

        Ok(())
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(upgrade("{not json"), Err(SchemaError::Json(_))));
    }

    #[test]
    fn non_object_is_an_error() {
        assert!(matches!(upgrade("[1, 2]"), Err(SchemaError::NotAnObject)));
        assert!(matches!(upgrade("null"), Err(SchemaError::NotAnObject)));
    }

    #[test]
    fn integral_floats_are_whole_quantities() -> TestResult {
        let cart = upgrade(r#"{"p1": {"qty": 2, "size": "M"}, "p2": 1.0, "p3": {"qty": 3.0, "size": "L"}}"#)?;

        assert_eq!(cart.get("p1"), Some(&CartEntry::new(2, "M")));
        assert_eq!(cart.get("p2"), Some(&CartEntry::new(1, "")));
        assert_eq!(cart.get("p3"), Some(&CartEntry::new(3, "L")));
        assert_eq!(cart.total_item_count(), 6);

        Ok(())
    }

    #[test]
    fn unreadable_entries_are_skipped() -> TestResult {
        let cart = upgrade(
            r#"{"p1": "three", "p2": {"qty": 2, "size": "M"}, "p3": 1.5, "p4": {"size": "L"}, "p5": 4}"#,
        )?;

        let ids: Vec<&str> = cart.iter().map(|(id, _)| id).collect();

        assert_eq!(ids, ["p2", "p5"]);
        assert_eq!(cart.get("p5"), Some(&CartEntry::new(4, "")));

        Ok(())
    }

    #[test]
    fn negative_quantities_are_dropped() -> TestResult {
        let cart = upgrade(r#"{"p1": -1, "p2": {"qty": -3.0, "size": "M"}, "p3": 2}"#)?;

        assert_eq!(cart.len(), 1);
        assert!(cart.contains("p3"));

        Ok(())
    }

    #[test]
    fn oversized_quantity_is_clamped() -> TestResult {
        let cart = upgrade(r#"{"p1": 99999999999}"#)?;

        assert_eq!(cart.get("p1"), Some(&CartEntry::new(u32::MAX, "")));

        Ok(())
    }
}
