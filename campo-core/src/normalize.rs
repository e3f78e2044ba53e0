//! Year and metric normalization for raw backend records.
//!
//! The backend reports the campaign year as a number, a "YYYY" string, or a
//! full date. Metrics may be numbers or numeric strings. Anything that cannot
//! be read becomes `None`; nothing here returns an error.

use crate::observation::{RawObservation, YEAR_FIELD};
use campo_utils::dates::utc_year_of;
use campo_utils::numbers::{parse_decimal, parse_int_prefix};
use serde_json::Value;

/// Canonical campaign year of a record.
///
/// 1. Whole numbers are returned unchanged.
/// 2. Strings of at least 4 characters: the integer prefix of the first 4
///    is used when it has any digits, so `"12/31/2016"` is year 12.
/// 3. Otherwise the string is parsed as a date and its UTC year is used.
pub fn normalize_year(record: &RawObservation) -> Option<i32> {
    year_from_value(record.get(YEAR_FIELD)?)
}

/// Same as [`normalize_year`] for a bare JSON value.
pub fn year_from_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => whole_year(n),
        Value::String(s) => leading_year(s).or_else(|| utc_year_of(s)),
        _ => None,
    }
}

/// Numeric metric stored under `key`.
///
/// Strings are read up to the end of their leading number, so `"12.5%"` is
/// 12.5. Missing or null fields, strings without a leading number and
/// non-finite values are `None`. No range or sign checks are applied.
pub fn normalize_metric(record: &RawObservation, key: &str) -> Option<f64> {
    match record.get(key)? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

fn whole_year(n: &serde_json::Number) -> Option<i32> {
    if let Some(i) = n.as_i64() {
        return i32::try_from(i).ok();
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f as i32)
    } else {
        None
    }
}

fn leading_year(s: &str) -> Option<i32> {
    let head: String = s.chars().take(4).collect();
    if head.chars().count() != 4 {
        return None;
    }
    parse_int_prefix(&head).and_then(|year| i32::try_from(year).ok())
}
