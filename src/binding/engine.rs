//! Validation and binding of raw payloads against descriptors.
//!
//! # Responsibilities
//! - Decode raw bytes into a generic JSON tree
//! - Walk the descriptor in field order, checking each declared field
//! - Recurse into nested objects and lists of objects
//! - Stop at the first failure and report it with its field path
//!
//! # Design Decisions
//! - Pure: no state is written, so one `Binder` can serve many threads
//! - Keys not declared by the descriptor are ignored
//! - Null for a required field is a type mismatch, not a missing field
//! - Int to float widening is the only coercion, and is opt-in

use serde_json::{Map, Value};

use crate::binding::bound::{BoundObject, BoundValue};
use crate::binding::descriptor::{FieldType, ScalarType, SchemaDescriptor};
use crate::binding::error::{PathSegment, ValidationFailure, ValueKind};
use crate::observability::metrics;

/// Scalar coercion policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindOptions {
    /// Accept integers for float fields.
    pub widen_int_to_float: bool,
}

/// Binds raw payloads to descriptors under a fixed policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binder {
    options: BindOptions,
}

impl Binder {
    pub fn new(options: BindOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> BindOptions {
        self.options
    }

    /// Decode `raw` as JSON and bind it to `desc`.
    pub fn bind(&self, raw: &[u8], desc: &SchemaDescriptor) -> Result<BoundObject, ValidationFailure> {
        let result = decode(raw).and_then(|value| self.bind_tree(&value, desc));

        match &result {
            Ok(_) => metrics::record_bind("ok"),
            Err(failure) => {
                tracing::debug!(
                    schema = desc.name(),
                    kind = %failure.kind(),
                    field = ?failure.field(),
                    "Binding failed: {}",
                    failure
                );
                metrics::record_bind(failure.kind().as_str());
            }
        }
        result
    }

    /// Bind an already decoded tree to `desc`.
    pub fn bind_value(&self, value: &Value, desc: &SchemaDescriptor) -> Result<BoundObject, ValidationFailure> {
        self.bind_tree(value, desc)
    }

    fn bind_tree(&self, value: &Value, desc: &SchemaDescriptor) -> Result<BoundObject, ValidationFailure> {
        match value {
            Value::Object(map) => self.bind_object(map, desc),
            other => Err(ValidationFailure::malformed(format!(
                "root value must be an object, found {}",
                ValueKind::of(other)
            ))),
        }
    }

    fn bind_object(
        &self,
        map: &Map<String, Value>,
        desc: &SchemaDescriptor,
    ) -> Result<BoundObject, ValidationFailure> {
        let mut fields = Vec::with_capacity(desc.fields().len());

        for spec in desc.fields() {
            let value = match (map.get(spec.name()), spec.default()) {
                (None, None) => return Err(ValidationFailure::missing(spec.name())),
                (None, Some(default)) | (Some(Value::Null), Some(default)) => default.clone(),
                (Some(value), _) => self.bind_field(spec.name(), spec.ty(), value)?,
            };
            fields.push((spec.name().to_string(), value));
        }

        Ok(BoundObject::new(desc.name(), fields))
    }

    fn bind_field(&self, name: &str, ty: &FieldType, value: &Value) -> Result<BoundValue, ValidationFailure> {
        match ty {
            FieldType::Scalar(scalar) => self.bind_scalar(name, *scalar, value),
            FieldType::Nested(desc) => match value {
                Value::Object(map) => self
                    .bind_object(map, desc)
                    .map(BoundValue::Object)
                    .map_err(|f| f.nest(PathSegment::Field(name.to_string()))),
                other => Err(ValidationFailure::mismatch(
                    name,
                    ValueKind::Object,
                    ValueKind::of(other),
                )),
            },
            FieldType::ListOf(desc) => {
                let items = value.as_array().ok_or_else(|| {
                    ValidationFailure::mismatch(name, ValueKind::Array, ValueKind::of(value))
                })?;

                items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| match item {
                        Value::Object(map) => self
                            .bind_object(map, desc)
                            .map_err(|f| f.nest(PathSegment::Index(idx))),
                        other => Err(ValidationFailure::mismatch_at(
                            PathSegment::Index(idx),
                            ValueKind::Object,
                            ValueKind::of(other),
                        )),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(BoundValue::List)
                    .map_err(|f| f.nest(PathSegment::Field(name.to_string())))
            }
        }
    }

    fn bind_scalar(&self, name: &str, scalar: ScalarType, value: &Value) -> Result<BoundValue, ValidationFailure> {
        let actual = ValueKind::of(value);
        let bound = match (scalar, value) {
            (ScalarType::String, Value::String(s)) => Some(BoundValue::String(s.clone())),
            (ScalarType::Bool, Value::Bool(b)) => Some(BoundValue::Bool(*b)),
            (ScalarType::Int, Value::Number(n)) if actual == ValueKind::Int => match n.as_i64() {
                Some(i) => Some(BoundValue::Int(i)),
                None => return Err(ValidationFailure::out_of_range(name)),
            },
            (ScalarType::Float, Value::Number(n))
                if actual == ValueKind::Float || self.options.widen_int_to_float =>
            {
                n.as_f64().map(BoundValue::Float)
            }
            _ => None,
        };

        bound.ok_or_else(|| ValidationFailure::mismatch(name, scalar.value_kind(), actual))
    }
}

/// Bind with the strict default policy.
pub fn bind(raw: &[u8], desc: &SchemaDescriptor) -> Result<BoundObject, ValidationFailure> {
    Binder::default().bind(raw, desc)
}

fn decode(raw: &[u8]) -> Result<Value, ValidationFailure> {
    serde_json::from_slice(raw)
        .map_err(|e| ValidationFailure::malformed(format!("invalid JSON: {}", e)))
}
