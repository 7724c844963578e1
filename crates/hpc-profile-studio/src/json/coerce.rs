//! Lenient numeric coercion of JSON values.
//!
//! Profiler exports store some counts as numbers and others as strings
//! (`"processes": {"plain": "16"}`), so both spellings are accepted.

use super::path::{lookup, FieldPath};
use crate::utils::error::FieldError;
use serde_json::Value;

/// Read a value as `f64`, accepting numbers and numeric strings
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Read a value as `u64`, accepting integers, integral floats and numeric strings
pub fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))
        }
        _ => None,
    }
}

/// Read an array of numbers; `null` entries become `NaN`
pub fn number_array(value: &Value) -> Option<Vec<f64>> {
    value
        .as_array()?
        .iter()
        .map(|item| match item {
            Value::Null => Some(f64::NAN),
            other => as_f64(other),
        })
        .collect()
}

/// Resolve `path` and coerce the result to `f64`
pub fn path_f64(doc: &Value, path: &FieldPath) -> Result<f64, FieldError> {
    let value = lookup(doc, path)?;
    as_f64(value).ok_or_else(|| FieldError::WrongType {
        path: path.to_string(),
        expected: "a number",
    })
}

/// Resolve `path` and coerce the result to `u64`
pub fn path_u64(doc: &Value, path: &FieldPath) -> Result<u64, FieldError> {
    let value = lookup(doc, path)?;
    as_u64(value).ok_or_else(|| FieldError::WrongType {
        path: path.to_string(),
        expected: "a non-negative integer",
    })
}

/// Resolve `path` and coerce the result to an array of numbers
pub fn path_array(doc: &Value, path: &FieldPath) -> Result<Vec<f64>, FieldError> {
    let value = lookup(doc, path)?;
    number_array(value).ok_or_else(|| FieldError::WrongType {
        path: path.to_string(),
        expected: "an array of numbers",
    })
}
