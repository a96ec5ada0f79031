// File: src/values.rs
// Purpose: Plain value map handed to submit callbacks

use std::collections::BTreeMap;

use quill_validation::FieldValue;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// Field name to value, stripped of validation state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    values: BTreeMap<String, FieldValue>,
}

impl FormValues {
    pub fn new(values: BTreeMap<String, FieldValue>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// String value of a field, if it holds one
    pub fn text(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(FieldValue::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Convert to a JSON object
    pub fn to_json(&self) -> JsonValue {
        let map: serde_json::Map<String, JsonValue> = self
            .values
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();

        JsonValue::Object(map)
    }

    /// Deserialize into a typed struct
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_json())
    }

    pub fn into_inner(self) -> BTreeMap<String, FieldValue> {
        self.values
    }
}
