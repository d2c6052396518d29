//! Document model
//!
//! The record stored under its `id`, and its JSON wire encoding.
//!
//! ## Encoding
//! ```text
//! {"id":"123","name":"example","value":"value"}
//! ```
//! All three members are required on decode; unknown members are ignored.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{KvDocError, Result};

/// A three-field record persisted under its id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Document {
    /// Store key. Not validated; the empty string is a legal key.
    pub id: String,

    pub name: String,

    pub value: String,
}

impl Document {
    pub fn new(id: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: value.into(),
        }
    }

    /// Replace the value, keeping id and name
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Encode to the stored JSON text
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| KvDocError::MalformedRecord(e.to_string()))
    }

    /// Decode stored JSON text back into a document
    pub fn decode(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| KvDocError::MalformedRecord(e.to_string()))?;
        Self::from_json(value)
    }

    /// Decode from raw bytes as returned by the store
    pub fn decode_bytes(bytes: &[u8]) -> Result<Self> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| KvDocError::MalformedRecord(e.to_string()))?;
        Self::from_json(value)
    }

    /// Only the field-tagged object form is a document. The derived
    /// deserializer would also take a three-element array.
    fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => serde_json::from_value(Value::Object(map))
                .map_err(|e| KvDocError::MalformedRecord(e.to_string())),
            other => Err(KvDocError::MalformedRecord(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id: {:?}, name: {:?}, value: {:?}}}",
            self.id, self.name, self.value
        )
    }
}
