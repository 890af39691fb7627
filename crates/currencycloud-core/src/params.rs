//! Request parameter shaping.
//!
//! Callers name parameters in camelCase; the service speaks snake_case.
//! Outgoing keys are snakeized, incoming response keys camelized, and
//! nested values flattened to `key[]` / `key[sub]` pairs for query strings
//! and form bodies.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, ValidationError};

/// Request parameters, keyed by the caller's camelCase names.
///
/// # Example
///
/// ```
/// use currencycloud_core::Params;
///
/// let params = Params::new().with("order", "created_at").with("pageSize", 10);
/// assert_eq!(
///     params.to_wire_pairs(),
///     vec![
///         ("order".to_string(), "created_at".to_string()),
///         ("page_size".to_string(), "10".to_string()),
///     ]
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build parameters from any serializable value.
    ///
    /// `null` (including `()` and `None`) yields empty parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Params`] if the value is not a JSON object.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        let value = serde_json::to_value(value).map_err(|e| ValidationError::Params {
            message: e.to_string(),
        })?;
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(ValidationError::Params {
                message: format!("expected an object, got {}", other),
            }
            .into()),
        }
    }

    /// Add a parameter, replacing any previous value under the same key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Snakeize keys and flatten into `(name, value)` pairs in wire form.
    pub fn to_wire_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.0 {
            flatten_into(&mut pairs, to_snake_case(key), value);
        }
        pairs
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn flatten_into(pairs: &mut Vec<(String, String)>, name: String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((name, b.to_string())),
        Value::Number(n) => pairs.push((name, n.to_string())),
        Value::String(s) => pairs.push((name, s.clone())),
        Value::Array(items) => {
            for item in items {
                flatten_into(pairs, format!("{}[]", name), item);
            }
        }
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_into(pairs, format!("{}[{}]", name, to_snake_case(key)), nested);
            }
        }
    }
}

/// Convert `pageSize` to `page_size`. Keys already in snake_case pass through.
pub fn to_snake_case(key: &str) -> String {
    if is_numeric(key) {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert `page_size` to `pageSize`. Dashes and spaces also split words.
pub fn to_camel_case(key: &str) -> String {
    if is_numeric(key) {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if matches!(c, '_' | '-' | ' ') {
            upper_next = true;
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    let mut chars = out.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => out,
    }
}

fn is_numeric(key: &str) -> bool {
    key.bytes().any(|b| b.is_ascii_digit()) && key.parse::<f64>().is_ok()
}

/// Recursively snakeize every object key in a JSON value.
pub fn snakeize(value: Value) -> Value {
    convert_keys(value, &to_snake_case)
}

/// Recursively camelize every object key in a JSON value.
pub fn camelize(value: Value) -> Value {
    convert_keys(value, &to_camel_case)
}

fn convert_keys(value: Value, convert: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (convert(&k), convert_keys(v, convert)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|v| convert_keys(v, convert))
                .collect(),
        ),
        other => other,
    }
}
