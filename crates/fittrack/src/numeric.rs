//! Numeric coercion and rounding shared by every nutrition computation.

use serde::{Deserialize, Deserializer};

/// Coerce a loosely typed JSON value into a finite number.
///
/// Numbers pass through, strings are trimmed and parsed, everything else
/// (empty strings, null, booleans, objects) is `None`.
pub fn coerce_decimal(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        serde_json::Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// Parse user-entered text. Blank or non-numeric text is `None`.
pub fn parse_decimal(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Round half away from zero to one decimal place.
pub fn round1(v: f64) -> f64 {
    let r = (v * 10.0).round() / 10.0;
    // -0.0 prints badly and compares oddly in snapshots
    if r == 0.0 { 0.0 } else { r }
}

/// Round half away from zero to a whole number.
pub fn round0(v: f64) -> f64 {
    let r = v.round();
    if r == 0.0 { 0.0 } else { r }
}

/// Clamp into `[lo, hi]`. NaN clamps to `lo`.
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() {
        return lo;
    }
    v.clamp(lo, hi)
}

/// Render an optional decimal for display: `None` is empty, whole values drop the fraction.
pub fn format_decimal(v: Option<f64>) -> String {
    match v {
        None => String::new(),
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) => format!("{v}"),
    }
}

/// Serde helper: accept number, numeric string, empty string or null.
pub(crate) fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_decimal))
}
