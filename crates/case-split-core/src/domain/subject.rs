//! Subject - the tagged record a case table is matched against.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::MatchError;

/// Subject is an insertion-ordered record of own keys.
///
/// Conventionally a subject owns exactly one key naming its variant
/// (`{"ok": 5}`), but nothing here enforces that. Key order matters for
/// subject-order scans, so the map keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subject(Map<String, Value>);

impl Subject {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Chainable insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a key. Re-inserting an existing key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reads a subject from an arbitrary JSON value.
    ///
    /// Falsy values (`null`, `false`, `0`, `""`) mean "no subject" and yield
    /// `None`, which callers treat like an omitted subject (see
    /// `dispatch::case_split`). Any other non-object owns no keys, so it fails
    /// the same way an unmatched record does.
    pub fn from_json(value: Value) -> Result<Option<Self>, MatchError> {
        match value {
            Value::Object(map) => Ok(Some(Self(map))),
            value if is_falsy(&value) => Ok(None),
            other => Err(MatchError::NoMatchingCase {
                subject: compact_json(&other),
            }),
        }
    }

    /// Builds a subject from a serde externally tagged enum.
    ///
    /// ```ignore
    /// #[derive(Serialize)]
    /// enum Reply { Ok(u32), Err(String), Pending }
    ///
    /// Subject::tagged(&Reply::Ok(5))?;    // {"Ok": 5}
    /// Subject::tagged(&Reply::Pending)?;  // {"Pending": null}
    /// ```
    pub fn tagged<T: Serialize + ?Sized>(value: &T) -> Result<Self, MatchError> {
        match serde_json::to_value(value).map_err(MatchError::Encode)? {
            Value::Object(map) => Ok(Self(map)),
            Value::String(unit_variant) => Ok(Self::new().with(unit_variant, Value::Null)),
            other => Err(MatchError::NotARecord(kind_of(&other))),
        }
    }

}

/// Compact JSON, e.g. `{"z":2}`. Integral floats are written as integers
/// (`{"n":1.0}` renders as `{"n":1}`).
impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.values().any(has_integral_float) {
            return f.write_str(&compact_json(&Value::Object(self.0.clone())));
        }
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Compact JSON with integral floats inside the `i64` range written as integers.
pub(crate) fn compact_json(value: &Value) -> String {
    if !has_integral_float(value) {
        return value.to_string();
    }
    let mut value = value.clone();
    normalize_integral_floats(&mut value);
    value.to_string()
}

fn integral_float(value: &Value) -> Option<i64> {
    let f = match value {
        Value::Number(n) if n.is_f64() => n.as_f64()?,
        _ => return None,
    };
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

fn has_integral_float(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().any(has_integral_float),
        Value::Object(map) => map.values().any(has_integral_float),
        other => integral_float(other).is_some(),
    }
}

fn normalize_integral_floats(value: &mut Value) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(normalize_integral_floats),
        Value::Object(map) => map.values_mut().for_each(normalize_integral_floats),
        other => {
            if let Some(i) = integral_float(other) {
                *other = Value::from(i);
            }
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
