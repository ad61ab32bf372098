//! Dynamic entity properties.
//!
//! Hosts persist small typed values on entities under string keys. The laying
//! scheduler keeps its entire durable state there, so these types are the
//! contract between the add-on and whatever storage the host uses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single dynamic property value.
///
/// Floats are stored because hosts allow them, but the add-on itself only
/// writes integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum PropertyValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// UTF-8 string value.
    String(String),
}

impl PropertyValue {
    /// Integer view of the value. Floats with no fractional part count as
    /// integers, which is how script hosts that only know `number` hand them
    /// back.
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            PropertyValue::Int(v) => Some(v),
            PropertyValue::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(v as i64),
            _ => None,
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

/// Ordered property storage for one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyMap {
    values: BTreeMap<String, PropertyValue>,
}

impl PropertyMap {
    /// Create an empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) -> Option<PropertyValue> {
        self.values.insert(key.into(), value)
    }

    /// Get a value.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    /// Remove a value.
    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.values.remove(key)
    }

    /// Iterate in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns true if the map holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }
}
