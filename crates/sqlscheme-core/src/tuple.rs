//! The key/value carrier behind every record.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::Value;

/// A mapping from storage field to value.
///
/// Lookup order is irrelevant and values are opaque. A tuple is owned by
/// exactly one [`Record`](crate::record::Record).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tuple {
    values: HashMap<String, Value>,
}

impl Tuple {
    /// Create an empty tuple.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a plain JSON object row, e.g. `{"id": 2, "name": "Benny"}`.
    ///
    /// Each member is converted with [`Value::from_json`]; the output of
    /// [`Record::dump`](crate::record::Record::dump) loads back this way.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: serde_json::Value =
            serde_json::from_str(json).map_err(|e| Error::Row(e.to_string()))?;
        Self::from_json_value(&parsed)
    }

    /// Build a tuple from an already parsed JSON object.
    pub fn from_json_value(json: &serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(map) = json else {
            return Err(Error::Row(format!(
                "expected a JSON object, got {}",
                json_kind(json)
            )));
        };
        Ok(map
            .iter()
            .map(|(field, value)| (field.as_str(), Value::from_json(value)))
            .collect())
    }

    /// Get the stored value for a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Get the stored value for a field, or `fallback` when it is missing.
    pub fn fetch<'a>(&'a self, field: &str, fallback: &'a Value) -> &'a Value {
        self.values.get(field).unwrap_or(fallback)
    }

    /// Store a value under a field, replacing any previous value.
    pub fn store(&mut self, field: impl Into<String>, value: Value) {
        self.values.insert(field.into(), value);
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.values.remove(field)
    }

    /// Check if a field has a stored value.
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over stored field/value pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Tuple {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
