//! Typed output of a successful bind.

use serde::de::DeserializeOwned;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::binding::error::ValueKind;

/// A validated field value.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    /// An optional field that was absent or null.
    Absent,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Object(BoundObject),
    List(Vec<BoundObject>),
}

impl BoundValue {
    /// The kind this value serializes as.
    pub fn kind(&self) -> ValueKind {
        match self {
            BoundValue::Absent => ValueKind::Null,
            BoundValue::Bool(_) => ValueKind::Bool,
            BoundValue::Int(_) => ValueKind::Int,
            BoundValue::Float(_) => ValueKind::Float,
            BoundValue::String(_) => ValueKind::String,
            BoundValue::Object(_) => ValueKind::Object,
            BoundValue::List(_) => ValueKind::Array,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, BoundValue::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            BoundValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            BoundValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            BoundValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            BoundValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BoundObject> {
        match self {
            BoundValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[BoundObject]> {
        match self {
            BoundValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl Serialize for BoundValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BoundValue::Absent => serializer.serialize_none(),
            BoundValue::Bool(b) => serializer.serialize_bool(*b),
            BoundValue::Int(i) => serializer.serialize_i64(*i),
            BoundValue::Float(f) => serializer.serialize_f64(*f),
            BoundValue::String(s) => serializer.serialize_str(s),
            BoundValue::Object(obj) => obj.serialize(serializer),
            BoundValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// A validated object of some schema.
///
/// Holds exactly the fields its descriptor declares, in declaration order.
/// Keys present in the input but not declared are not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundObject {
    schema: String,
    fields: Vec<(String, BoundValue)>,
}

impl BoundObject {
    pub(crate) fn new(schema: impl Into<String>, fields: Vec<(String, BoundValue)>) -> Self {
        Self {
            schema: schema.into(),
            fields,
        }
    }

    /// Name of the schema this object was bound against.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn get(&self, field: &str) -> Option<&BoundValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(BoundValue::as_str)
    }

    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(BoundValue::as_i64)
    }

    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(BoundValue::as_f64)
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(BoundValue::as_bool)
    }

    pub fn get_object(&self, field: &str) -> Option<&BoundObject> {
        self.get(field).and_then(BoundValue::as_object)
    }

    pub fn get_list(&self, field: &str) -> Option<&[BoundObject]> {
        self.get(field).and_then(BoundValue::as_list)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &BoundValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert back to a generic JSON tree.
    pub fn to_json(&self) -> Value {
        // Serializing into a `Value` cannot fail: keys are strings and
        // non-finite floats become null.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Deserialize into a caller-defined type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_json())
    }
}

impl Serialize for BoundObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl From<BoundObject> for Value {
    fn from(obj: BoundObject) -> Self {
        obj.to_json()
    }
}
