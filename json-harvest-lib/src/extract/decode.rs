//! Field decoding from a partially walked JSON object.

use serde::Deserialize;
use serde::de::Error as _;
use serde_json::{Map, Value};

pub type Object = Map<String, Value>;

fn field<'a>(object: &'a Object, name: &str) -> Result<&'a Value, serde_json::Error> {
    object
        .get(name)
        .ok_or_else(|| serde_json::Error::custom(format!("missing field `{name}`")))
}

/// Decode a field as a JSON string
pub fn string(object: &Object, name: &str) -> Result<String, serde_json::Error> {
    String::deserialize(field(object, name)?)
}

/// Decode a field as a signed 64-bit integer
pub fn int(object: &Object, name: &str) -> Result<i64, serde_json::Error> {
    i64::deserialize(field(object, name)?)
}

/// Decode a field as an ordered sequence of JSON objects; `null` decodes as an empty sequence
pub fn objects<'a>(object: &'a Object, name: &str) -> Result<Vec<&'a Object>, serde_json::Error> {
    match field(object, name)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => Err(invalid_type(other, "a JSON object")),
            })
            .collect(),
        other => Err(invalid_type(other, "an array of JSON objects")),
    }
}

fn invalid_type(value: &Value, expected: &str) -> serde_json::Error {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    serde_json::Error::custom(format!("invalid type: {found}, expected {expected}"))
}
