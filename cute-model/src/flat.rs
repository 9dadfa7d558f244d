//! The flat, spreadsheet-friendly record form.
//!
//! Keys are `sys.*` metadata keys or field keys of the form
//! `<fieldId>.<locale>`, `<fieldId>.<locale>[]` (arrays) and
//! `<fieldId>.<locale>.lat` / `.lon` (locations).

use cute_types::CmsTimestamp;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Keys of the system metadata columns.
pub mod sys_key {
    pub const ID: &str = "sys.Id";
    pub const TYPE: &str = "sys.Type";
    pub const UPDATED_AT: &str = "sys.UpdatedAt";
    pub const VERSION: &str = "sys.Version";
    pub const PUBLISHED_VERSION: &str = "sys.PublishedVersion";
    pub const PUBLISHED_COUNTER: &str = "sys.PublishedCounter";
    pub const PUBLISHED_AT: &str = "sys.PublishedAt";
    pub const FIRST_PUBLISHED_AT: &str = "sys.FirstPublishedAt";
    pub const CONTENT_TYPE: &str = "sys.ContentType";
    pub const SPACE: &str = "sys.Space";
    pub const ENVIRONMENT: &str = "sys.Environment";
}

/// Every `sys.*` key, in column order.
pub const SYS_KEYS: [&str; 11] = [
    sys_key::ID,
    sys_key::TYPE,
    sys_key::UPDATED_AT,
    sys_key::VERSION,
    sys_key::PUBLISHED_VERSION,
    sys_key::PUBLISHED_COUNTER,
    sys_key::PUBLISHED_AT,
    sys_key::FIRST_PUBLISHED_AT,
    sys_key::CONTENT_TYPE,
    sys_key::SPACE,
    sys_key::ENVIRONMENT,
];

/// Returns true for system metadata keys.
pub fn is_sys_key(key: &str) -> bool {
    key.starts_with("sys.")
}

/// A nullable scalar cell value.
///
/// Serializes untagged, so a record round-trips through plain JSON. Dates
/// serialize as RFC 3339 strings and therefore read back as `String`;
/// decoders accept either.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlatValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    Date(CmsTimestamp),
}

impl FlatValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FlatValue::Null)
    }

    /// Null, or a string with no visible characters.
    pub fn is_blank(&self) -> bool {
        match self {
            FlatValue::Null => true,
            FlatValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlatValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Text form of the value; `None` when blank.
    pub fn to_text(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.to_string())
        }
    }

    /// Maps a JSON value read by an import adapter onto a cell value.
    /// Arrays and objects are kept as JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FlatValue::Null,
            Value::Bool(b) => FlatValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FlatValue::Integer(i),
                None => n.as_f64().map_or(FlatValue::Null, FlatValue::Number),
            },
            Value::String(s) => FlatValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => FlatValue::String(value.to_string()),
        }
    }

    /// The JSON form of the cell, for export adapters.
    pub fn to_json(&self) -> Value {
        match self {
            FlatValue::Null => Value::Null,
            FlatValue::Bool(b) => Value::Bool(*b),
            FlatValue::Integer(i) => Value::from(*i),
            FlatValue::Number(n) => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
            FlatValue::String(s) => Value::String(s.clone()),
            FlatValue::Date(d) => Value::String(d.to_rfc3339()),
        }
    }
}

impl fmt::Display for FlatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlatValue::Null => Ok(()),
            FlatValue::Bool(b) => write!(f, "{b}"),
            FlatValue::Integer(i) => write!(f, "{i}"),
            FlatValue::Number(n) => write!(f, "{n}"),
            FlatValue::String(s) => f.write_str(s),
            FlatValue::Date(d) => write!(f, "{d}"),
        }
    }
}

impl From<&str> for FlatValue {
    fn from(value: &str) -> Self {
        FlatValue::String(value.to_string())
    }
}

impl From<String> for FlatValue {
    fn from(value: String) -> Self {
        FlatValue::String(value)
    }
}

impl From<bool> for FlatValue {
    fn from(value: bool) -> Self {
        FlatValue::Bool(value)
    }
}

impl From<i64> for FlatValue {
    fn from(value: i64) -> Self {
        FlatValue::Integer(value)
    }
}

impl From<f64> for FlatValue {
    fn from(value: f64) -> Self {
        FlatValue::Number(value)
    }
}

impl From<CmsTimestamp> for FlatValue {
    fn from(value: CmsTimestamp) -> Self {
        FlatValue::Date(value)
    }
}

impl<T: Into<FlatValue>> From<Option<T>> for FlatValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FlatValue::Null, Into::into)
    }
}

static NULL: FlatValue = FlatValue::Null;

/// An insertion-ordered flat record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatRecord {
    values: IndexMap<String, FlatValue>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: IndexMap::with_capacity(capacity),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FlatValue> {
        self.values.get(key)
    }

    /// The value under `key`, or `Null` when the key is absent.
    pub fn value(&self, key: &str) -> &FlatValue {
        self.values.get(key).unwrap_or(&NULL)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Inserts or overwrites a value, keeping the original position of an
    /// existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FlatValue>) -> Option<FlatValue> {
        self.values.insert(key.into(), value.into())
    }

    /// Removes a key, preserving the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<FlatValue> {
        self.values.shift_remove(key)
    }

    pub fn retain(&mut self, keep: impl FnMut(&String, &mut FlatValue) -> bool) {
        self.values.retain(keep);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlatValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<FlatValue>> FromIterator<(K, V)> for FlatRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<FlatValue>> Extend<(K, V)> for FlatRecord {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.values.insert(k.into(), v.into());
        }
    }
}

impl IntoIterator for FlatRecord {
    type Item = (String, FlatValue);
    type IntoIter = indexmap::map::IntoIter<String, FlatValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
