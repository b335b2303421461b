//! Value coercions shared by scoring, filtering and sorting.
//!
//! Records are loosely typed, so the same field may hold `18`, `"18"` or
//! `"2024-01-01"` depending on where it came from. These helpers turn a JSON
//! value into the text, number or timestamp form a comparison needs, returning
//! `None` when the value has no such form.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Number, Value};

/// Formats a number the way JavaScript's `Number#toString` does.
///
/// Integral values print without a fraction (`5`, not `5.0`). Magnitudes of
/// `1e21` and above, or below `1e-6`, use exponent form (`1e+21`, `1.5e-7`).
/// Integers beyond 2^53 print their nearest double, so `u64::MAX` is
/// `18446744073709552000`.
pub fn number_text(number: &Number) -> String {
    number.as_f64().map(float_text).unwrap_or_default()
}

fn float_text(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let exponential = format!("{:e}", value);
    match exponential.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exponential,
    }
}

/// Returns the string form of a value.
///
/// Sequences join their elements with `,` (absent and `null` elements become
/// empty), mappings render as `[object Object]`, and `null` has no string form.
pub fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(number_text(n)),
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| to_text(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some("[object Object]".to_string()),
    }
}

/// Returns the numeric form of a value, or `None` when it is not a number.
///
/// Blank strings and `null` are `0`, booleans are `0`/`1`, and a single-element
/// sequence takes the numeric form of its element.
pub fn to_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_number(s)?,
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] => parse_number(&to_text(single).unwrap_or_default())?,
            _ => return None,
        },
        Value::Object(_) => return None,
    };
    (!number.is_nan()).then_some(number)
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    // Rust accepts "inf" and "nan" spellings that are not numbers in source data.
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Returns a value as epoch milliseconds, or `None` when it is not a date.
///
/// Numbers are taken as epoch milliseconds. Strings may be RFC 3339
/// timestamps, `YYYY-MM-DD` dates, or `YYYY-MM-DDTHH:MM[:SS[.fff]]` local
/// timestamps; dates and offset-less timestamps are read as UTC.
pub fn to_epoch_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Null => Some(0),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => {
            let millis = n.as_f64()?;
            millis.is_finite().then_some(millis.trunc() as i64)
        }
        Value::String(s) => parse_date(s.trim()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_date(text: &str) -> Option<i64> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, format) {
            return Some(timestamp.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp_millis())
}

/// Value equality with numbers compared by value (`1 == 1.0`).
pub fn json_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_eq(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| json_eq(x, y)))
        }
        _ => left == right,
    }
}

/// Orders two sort keys.
///
/// Values order by kind first: numbers (with booleans and `null` taken as
/// numbers) before strings before sequences and mappings. Numbers compare
/// numerically, strings lexicographically, and sequences and mappings compare
/// equal. This is a total order, so it is safe to hand to a sort.
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null | Value::Bool(_) | Value::Number(_) => 0,
            Value::String(_) => 1,
            Value::Array(_) | Value::Object(_) => 2,
        }
    }

    match (left, right) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => match rank(left).cmp(&rank(right)) {
            Ordering::Equal if rank(left) == 0 => {
                let a = to_number(left).unwrap_or_default();
                let b = to_number(right).unwrap_or_default();
                a.total_cmp(&b)
            }
            ordering => ordering,
        },
    }
}
