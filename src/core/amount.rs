//! Lenient decoding of numeric JSON values into [`Decimal`].
//!
//! Rule documents and period records arrive from a loosely typed backend:
//! amounts may be JSON numbers, numeric strings, `null`, or missing
//! entirely. Everything that cannot be read as a finite decimal decodes
//! as "absent" and the owning type substitutes its default.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Read a JSON value as a decimal amount.
///
/// Accepts numbers and numeric strings (surrounding whitespace ignored,
/// scientific notation allowed). Returns `None` for anything else,
/// including numbers outside the representable `Decimal` range.
///
/// # Examples
///
/// ```
/// use billing_rules::core::amount::decimal_from_value;
/// use rust_decimal_macros::dec;
/// use serde_json::json;
///
/// assert_eq!(decimal_from_value(&json!(0.125)), Some(dec!(0.125)));
/// assert_eq!(decimal_from_value(&json!(" 16000 ")), Some(dec!(16000)));
/// assert_eq!(decimal_from_value(&json!("abc")), None);
/// assert_eq!(decimal_from_value(&json!(null)), None);
/// ```
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
        .map(|d| d.normalize())
}

/// `deserialize_with` helper: optional decimal, malformed input becomes `None`.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(decimal_from_value))
}

/// `deserialize_with` helper: decimal defaulting to zero.
pub fn lenient_decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_decimal(deserializer)?.unwrap_or(Decimal::ZERO))
}
