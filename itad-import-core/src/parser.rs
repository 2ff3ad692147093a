//! Parser for Epic Games Store order history exports.
//!
//! The export is either a single order object or an array of orders (the
//! paginated history response wraps the array in an `orders` field, which is
//! unwrapped too). Each order carries an `items` array; every item with a
//! non-empty `offerId` and `description` becomes one [`PurchaseRecord`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::ImportError;
use crate::record::{Price, PurchaseRecord};

/// Parse raw order JSON into purchase records, deduplicated by offer id.
///
/// Orders without an `items` array are skipped, as are items whose offer id
/// or description is missing or blank. The first occurrence of an offer id
/// wins and output follows input order.
pub fn parse_orders(raw: &str) -> Result<Vec<PurchaseRecord>, ImportError> {
    let data: Value = serde_json::from_str(raw)?;

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for order in order_list(&data) {
        let Some(items) = order.get("items").and_then(Value::as_array) else {
            log::debug!("Skipping order without an items array");
            continue;
        };

        let order_id = order
            .get("orderId")
            .and_then(Value::as_str)
            .map(str::to_string);
        let purchased_at = order
            .get("createdAtMillis")
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
            .and_then(DateTime::<Utc>::from_timestamp_millis);

        for item in items {
            let (Some(offer_id), Some(title)) =
                (trimmed_field(item, "offerId"), trimmed_field(item, "description"))
            else {
                continue;
            };
            if !seen.insert(offer_id.to_string()) {
                continue;
            }

            let minor = item
                .get("amount")
                .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64)))
                .unwrap_or(0);
            let currency = item
                .get("currency")
                .and_then(Value::as_str)
                .unwrap_or_default();

            records.push(PurchaseRecord {
                title: title.to_string(),
                offer_id: offer_id.to_string(),
                order_id: order_id.clone(),
                purchased_at,
                price: Price::new(minor, currency),
            });
        }
    }

    Ok(records)
}

/// Parse pasted input the way the input step does: blank text and exports
/// without any usable items are errors rather than empty lists.
pub fn load_purchases(raw: &str) -> Result<Vec<PurchaseRecord>, ImportError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ImportError::EmptyInput);
    }

    let records = parse_orders(text)?;
    if records.is_empty() {
        return Err(ImportError::EmptyResult);
    }

    log::debug!("Parsed {} purchase records", records.len());
    Ok(records)
}

/// Normalize the top-level value into a list of order objects.
fn order_list(data: &Value) -> Vec<&Value> {
    match data {
        Value::Array(orders) => orders.iter().collect(),
        Value::Object(map) if !map.contains_key("items") => match map.get("orders") {
            Some(Value::Array(orders)) => orders.iter().collect(),
            _ => vec![data],
        },
        _ => vec![data],
    }
}

fn trimmed_field<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    let value = item.get(key)?.as_str()?.trim();
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
#[path = "tests/parser_tests.rs"]
mod tests;
