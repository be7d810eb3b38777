//! Loosely typed request fields.
//!
//! Request bodies are not deserialised straight into [`crate::Todo`]: the
//! server must report unknown fields and wrong value types as validation
//! messages, so decoding stops at a map of named values and the type checks
//! happen later.

use std::collections::BTreeMap;

use serde_json::Value;

/// A single decoded field value.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
    Number(serde_json::Number),
    Null,
    Array,
    Object,
    /// Element text from an XML body. XML carries no scalar types, so the
    /// value is interpreted by whoever reads the field.
    Untyped(String),
}

impl FieldValue {
    /// Type name used in validation messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "BOOLEAN",
            FieldValue::Text(_) | FieldValue::Untyped(_) => "STRING",
            FieldValue::Number(_) => "NUMERIC",
            FieldValue::Null => "NULL",
            FieldValue::Array => "ARRAY",
            FieldValue::Object => "OBJECT",
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            FieldValue::Untyped(text) => match text.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) | FieldValue::Untyped(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_id(&self) -> Option<u64> {
        match self {
            FieldValue::Number(number) => number
                .as_u64()
                .or_else(|| number.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
            FieldValue::Untyped(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// Raw rendering used when a value has to be quoted back in a message.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            FieldValue::Bool(value) => value.to_string(),
            FieldValue::Text(text) | FieldValue::Untyped(text) => text.clone(),
            FieldValue::Number(number) => number.to_string(),
            FieldValue::Null => "null".to_string(),
            FieldValue::Array => "[]".to_string(),
            FieldValue::Object => "{}".to_string(),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(value) => FieldValue::Bool(value),
            Value::String(text) => FieldValue::Text(text),
            Value::Number(number) => FieldValue::Number(number),
            Value::Null => FieldValue::Null,
            Value::Array(_) => FieldValue::Array,
            Value::Object(_) => FieldValue::Object,
        }
    }
}

/// Named fields of one decoded object, ordered by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldMap {
    fields: BTreeMap<String, FieldValue>,
}

impl FieldMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl From<serde_json::Map<String, Value>> for FieldMap {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        map.into_iter()
            .map(|(name, value)| (name, FieldValue::from(value)))
            .collect()
    }
}

impl From<BTreeMap<String, String>> for FieldMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter()
            .map(|(name, text)| (name, FieldValue::Untyped(text)))
            .collect()
    }
}
