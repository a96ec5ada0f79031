// File: src/value.rs
// Purpose: Dynamic field values held by forms and checked by rules

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value as JsonValue;

/// Value of a single form field
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<FieldValue>),
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// True for Null, whitespace-only strings and empty arrays
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::String(s) => s.trim().is_empty(),
            FieldValue::Array(items) => items.is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) | FieldValue::Object(_) => false,
        }
    }

    /// Text form used by pattern rules. Null reads as the empty string.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::String(s) => Cow::Borrowed(s.as_str()),
            other => Cow::Owned(other.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Length used by min/max length rules: characters for text, items for arrays
    pub fn length(&self) -> usize {
        match self {
            FieldValue::Array(items) => items.len(),
            FieldValue::Null => 0,
            other => other.as_text().chars().count(),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        JsonValue::from(self.clone())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => {
                // Format number nicely (remove .0 for integers)
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            FieldValue::String(s) => f.write_str(s),
            FieldValue::Array(arr) => {
                let items: Vec<String> = arr.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            FieldValue::Object(_) => f.write_str("[Object]"),
            FieldValue::Null => Ok(()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(arr: Vec<T>) -> Self {
        FieldValue::Array(arr.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

impl From<BTreeMap<String, FieldValue>> for FieldValue {
    fn from(obj: BTreeMap<String, FieldValue>) -> Self {
        FieldValue::Object(obj)
    }
}

impl From<JsonValue> for FieldValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => FieldValue::Null,
            JsonValue::Bool(b) => FieldValue::Bool(b),
            JsonValue::Number(n) => n.as_f64().map(FieldValue::Number).unwrap_or(FieldValue::Null),
            JsonValue::String(s) => FieldValue::String(s),
            JsonValue::Array(items) => {
                FieldValue::Array(items.into_iter().map(FieldValue::from).collect())
            }
            JsonValue::Object(map) => FieldValue::Object(
                map.into_iter().map(|(k, v)| (k, FieldValue::from(v))).collect(),
            ),
        }
    }
}

impl From<FieldValue> for JsonValue {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Null => JsonValue::Null,
            FieldValue::Bool(b) => JsonValue::Bool(b),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < i64::MAX as f64 {
                    JsonValue::from(n as i64)
                } else {
                    serde_json::Number::from_f64(n)
                        .map(JsonValue::Number)
                        .unwrap_or(JsonValue::Null)
                }
            }
            FieldValue::String(s) => JsonValue::String(s),
            FieldValue::Array(items) => {
                JsonValue::Array(items.into_iter().map(JsonValue::from).collect())
            }
            FieldValue::Object(map) => JsonValue::Object(
                map.into_iter().map(|(k, v)| (k, JsonValue::from(v))).collect(),
            ),
        }
    }
}
