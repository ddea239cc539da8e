//! Dashboard entities as stored in the database.
//!
//! All of these are read-only copies scoped to a single render pass. Collections
//! may be stored either as JSON objects keyed by push ids or as arrays; both are
//! decoded into a `Vec` that keeps the stored order.

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::{Number, Value};
use std::fmt;

/// `users/{uid}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserProfile {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u64,
}

/// `orders/{uid}/latest`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LatestOrder {
    #[serde(default, deserialize_with = "ordered_entries")]
    pub items: Vec<OrderItem>,
    pub total: Amount,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderHistoryEntry {
    pub total: Amount,
    pub timestamp: Timestamp,
}

/// `orders/{uid}/history`, in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderHistory(pub Vec<OrderHistoryEntry>);

impl OrderHistory {
    pub fn entries(&self) -> &[OrderHistoryEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for OrderHistory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ordered_entries(deserializer).map(OrderHistory)
    }
}

/// Monetary total. Numbers print the way a browser would print them, so `50`
/// stays `50` even when it was stored as `50.0`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(Number),
    Text(String),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(number) => write_number(f, number),
            Amount::Text(text) => f.write_str(text),
        }
    }
}

/// Order timestamp, displayed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp(pub String);

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(text) => Ok(Timestamp(text)),
            Value::Number(number) => Ok(Timestamp(number.to_string())),
            other => Err(D::Error::custom(format!(
                "expected a timestamp string, found {}",
                kind_of(&other)
            ))),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, number: &Number) -> fmt::Result {
    if number.is_i64() || number.is_u64() {
        return write!(f, "{number}");
    }
    match number.as_f64() {
        Some(value) => write_js_float(f, value),
        None => write!(f, "{number}"),
    }
}

/// Shortest round-trip digits, switching to exponent form outside
/// `[1e-6, 1e21)` the way `Number.prototype.toString` does.
fn write_js_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value == 0.0 {
        return f.write_str("0");
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return write!(f, "{value}");
    }
    let exponent_form = format!("{value:e}");
    match exponent_form.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            write!(f, "{mantissa}e+{exponent}")
        }
        _ => f.write_str(&exponent_form),
    }
}

/// Decode an object (values in key order as stored) or an array (skipping the
/// holes the database leaves in sparse arrays) into a list.
fn ordered_entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values: Vec<Value> = match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Object(map) => map.into_iter().map(|(_, value)| value).collect(),
        Value::Array(items) => items.into_iter().filter(|value| !value.is_null()).collect(),
        other => {
            return Err(D::Error::custom(format!(
                "expected an object or array, found {}",
                kind_of(&other)
            )))
        }
    };

    values
        .into_iter()
        .map(|value| serde_json::from_value(value).map_err(D::Error::custom))
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
