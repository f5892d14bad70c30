//! Dynamic Records - Ordered Name/Value Bags
//!
//! A record has no declared type. Its properties are kept in native
//! (insertion) order, which is the order shape extraction sees them in.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::config::{EmptyArrayPolicy, ExtractOptions};
use crate::error::{Result, ShapeError};
use crate::value::DynamicValue;

/// Anything that can enumerate its own properties as `(name, value)` pairs.
///
/// Shape extraction only ever talks to this trait, so host types can
/// expose their properties without going through [`DynamicRecord`].
pub trait PropertySource {
    fn properties(&self) -> Box<dyn Iterator<Item = (&str, &DynamicValue)> + '_>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicRecord {
    entries: Vec<(String, DynamicValue)>,
}

impl DynamicRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<DynamicValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a property. An existing name keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<DynamicValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&DynamicValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Diagnostic rendering: `{name=value, name=value}`.
    ///
    /// Not used for equality or hashing.
    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// Convert a JSON object into a record using default options.
    pub fn from_json(value: &Value) -> Result<Self> {
        Self::from_json_with(value, &ExtractOptions::default())
    }

    pub fn from_json_with(value: &Value, options: &ExtractOptions) -> Result<Self> {
        match value {
            Value::Object(_) => record_from_json(value, options, 0),
            other => Err(ShapeError::invalid(format!(
                "expected a JSON object, got {}",
                json_type_name(other)
            ))),
        }
    }
}

impl PropertySource for DynamicRecord {
    fn properties(&self) -> Box<dyn Iterator<Item = (&str, &DynamicValue)> + '_> {
        Box::new(self.entries.iter().map(|(n, v)| (n.as_str(), v)))
    }
}

impl fmt::Display for DynamicRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str("}")
    }
}

impl Serialize for DynamicRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<DynamicValue>> FromIterator<(K, V)> for DynamicRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (k, v) in iter {
            record.set(k, v);
        }
        record
    }
}

fn record_from_json(value: &Value, options: &ExtractOptions, depth: usize) -> Result<DynamicRecord> {
    if depth > options.max_depth {
        return Err(ShapeError::invalid(format!(
            "record nesting exceeds max depth {}",
            options.max_depth
        )));
    }
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(ShapeError::invalid(format!(
                "expected a JSON object, got {}",
                json_type_name(other)
            )))
        }
    };

    let mut record = DynamicRecord::new();
    for (name, v) in map {
        record.set(name.clone(), value_from_json(v, options, depth)?);
    }
    Ok(record)
}

fn value_from_json(value: &Value, options: &ExtractOptions, depth: usize) -> Result<DynamicValue> {
    if depth > options.max_depth {
        return Err(ShapeError::invalid(format!(
            "value nesting exceeds max depth {}",
            options.max_depth
        )));
    }
    Ok(match value {
        Value::Null => DynamicValue::Null,
        Value::Bool(b) => DynamicValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                DynamicValue::Int64(i)
            } else if let Some(u) = n.as_u64() {
                DynamicValue::UInt64(u)
            } else {
                DynamicValue::Float64(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => DynamicValue::Text(s.clone()),
        Value::Object(_) => DynamicValue::Record(record_from_json(value, options, depth + 1)?),
        Value::Array(items) if items.is_empty() => match options.empty_array {
            EmptyArrayPolicy::Records => DynamicValue::RecordList(Vec::new()),
            EmptyArrayPolicy::Values => DynamicValue::List(Vec::new()),
        },
        Value::Array(items) if items.iter().all(Value::is_object) => DynamicValue::RecordList(
            items
                .iter()
                .map(|item| record_from_json(item, options, depth + 1))
                .collect::<Result<_>>()?,
        ),
        Value::Array(items) => DynamicValue::List(
            items
                .iter()
                .map(|item| value_from_json(item, options, depth + 1))
                .collect::<Result<_>>()?,
        ),
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
