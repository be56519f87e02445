//! Parameter values shared by the query builder, the body builder and the
//! option validator.
//!
//! # Design
//! Parameter values are `serde_json::Value`, which already is the tagged
//! variant the API needs (null, bool, number, string, list, map). The crate
//! enables `preserve_order`, so a `Parameters` map iterates in insertion
//! order and nested structures encode deterministically.

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Ordered mapping of parameter names to values.
pub type Parameters = serde_json::Map<String, Value>;

/// Convert a serializable caller type into request parameters.
///
/// Fails with [`Error::Serialization`] if the value cannot be encoded or does
/// not encode to a JSON object.
pub fn params_from<T: Serialize + ?Sized>(value: &T) -> Result<Parameters> {
    match serde_json::to_value(value).map_err(|e| Error::Serialization(e.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Serialization(format!(
            "parameters must encode to an object, got {}",
            kind(&other)
        ))),
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
