//! # Value Model
//!
//! [`InputValue`] is what a request carries for a field: any JSON kind,
//! untouched. [`StoredValue`] is what a validator hands back for storage:
//! null, a boolean, or a string. Enumeration members are stored as strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A raw field value as submitted, tagged by JSON kind.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(Map<String, Value>),
}

impl InputValue {
    /// The JSON kind of this value, for diagnostics.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Boolean,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Array(_) => ValueKind::Array,
            Self::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<Value> for InputValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(a) => Self::Array(a),
            Value::Object(o) => Self::Object(o),
        }
    }
}

impl From<&Value> for InputValue {
    fn from(value: &Value) -> Self {
        Self::from(value.clone())
    }
}

/// JSON kind of an [`InputValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The canonical representation of an accepted field value.
///
/// Serializes as the bare JSON value (`null`, `true`, `"text"`), so an entry
/// read back from storage is byte-for-byte what the validator accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Null,
    Boolean(bool),
    String(String),
}

impl StoredValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<StoredValue> for Value {
    fn from(value: StoredValue) -> Self {
        match value {
            StoredValue::Null => Value::Null,
            StoredValue::Boolean(b) => Value::Bool(b),
            StoredValue::String(s) => Value::String(s),
        }
    }
}

impl From<bool> for StoredValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for StoredValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn input_value_keeps_json_kind() {
        assert_eq!(InputValue::from(json!(null)).kind(), ValueKind::Null);
        assert_eq!(InputValue::from(json!(true)).kind(), ValueKind::Boolean);
        assert_eq!(InputValue::from(json!(1)).kind(), ValueKind::Number);
        assert_eq!(InputValue::from(json!("1")).kind(), ValueKind::String);
        assert_eq!(InputValue::from(json!([1])).kind(), ValueKind::Array);
        assert_eq!(InputValue::from(json!({"a": 1})).kind(), ValueKind::Object);
    }

    #[test]
    fn stored_value_serializes_as_bare_json() {
        assert_eq!(serde_json::to_value(StoredValue::Null).unwrap(), json!(null));
        assert_eq!(serde_json::to_value(StoredValue::Boolean(false)).unwrap(), json!(false));
        assert_eq!(
            serde_json::to_value(StoredValue::from("Some\ntext")).unwrap(),
            json!("Some\ntext")
        );
    }

    #[test]
    fn stored_value_deserializes_from_bare_json() {
        let v: StoredValue = serde_json::from_str("null").unwrap();
        assert_eq!(v, StoredValue::Null);
        let v: StoredValue = serde_json::from_str("true").unwrap();
        assert_eq!(v.as_bool(), Some(true));
        let v: StoredValue = serde_json::from_str("\"\\\"quoted\\\"\"").unwrap();
        assert_eq!(v.as_str(), Some("\"quoted\""));
    }
}
