//! Parameter mappings and their query-string encoding.
//!
//! Every endpoint receives its parameters as a flat list of query pairs, on
//! GET and POST alike. Values are flattened the same way common form
//! encoders do it: scalars become their text form, arrays repeat the key,
//! and `null` drops the key entirely.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Ordered parameter mapping sent with a request.
pub type Params = Map<String, Value>;

/// Convert a caller payload into a parameter mapping.
///
/// The payload must serialize to a JSON object; `null` (for example `()` or
/// `None`) is accepted as an empty mapping.
pub fn to_params<T: Serialize + ?Sized>(payload: &T) -> Result<Params, ApiError> {
    let value =
        serde_json::to_value(payload).map_err(|e| ApiError::InvalidParams(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Params::new()),
        other => Err(ApiError::InvalidParams(format!(
            "expected an object, got {}",
            kind(&other)
        ))),
    }
}

/// Single-entry mapping, for endpoints that wrap one argument under a key.
pub fn field<T: Serialize>(key: &str, value: T) -> Result<Params, ApiError> {
    let value =
        serde_json::to_value(value).map_err(|e| ApiError::InvalidParams(e.to_string()))?;
    let mut params = Params::new();
    params.insert(key.to_string(), value);
    Ok(params)
}

/// Flatten a mapping into query pairs, preserving key order.
pub fn encode_query(params: &Params) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_text(item) {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar_text(other) {
                    pairs.push((key.clone(), text));
                }
            }
        }
    }
    pairs
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested => Some(nested.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
