//! Schema descriptors.
//!
//! A descriptor lists the fields of a target shape: name, declared type and
//! whether the field is optional. Descriptors are built once at startup,
//! either with [`SchemaBuilder`] or from configuration through
//! [`SchemaRegistry`](crate::binding::SchemaRegistry), and shared read-only
//! afterwards. Nested shapes are held behind `Arc`.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::binding::bound::BoundValue;
use crate::binding::error::ValueKind;

/// Errors raised while building descriptors.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("schema `{schema}` has a field with an empty name")]
    EmptyFieldName { schema: String },

    #[error("schema `{schema}` declares field `{field}` twice")]
    DuplicateField { schema: String, field: String },

    #[error("default for `{schema}.{field}` must be {expected}, found {found}")]
    InvalidDefault {
        schema: String,
        field: String,
        expected: String,
        found: ValueKind,
    },

    #[error("default for `{schema}.{field}` must be a string, number or boolean")]
    UnsupportedDefault { schema: String, field: String },

    #[error("schema `{schema}` field `{field}` refers to unknown type `{type_name}`")]
    UnknownType {
        schema: String,
        field: String,
        type_name: String,
    },

    #[error("schema `{0}` is defined twice")]
    DuplicateSchema(String),

    #[error("schema `{0}` refers to itself through nested fields")]
    Cycle(String),
}

/// Leaf types checked directly against the decoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Int,
    Float,
    Bool,
}

impl ScalarType {
    /// The decoded kind this scalar accepts without coercion.
    pub fn value_kind(&self) -> ValueKind {
        match self {
            ScalarType::String => ValueKind::String,
            ScalarType::Int => ValueKind::Int,
            ScalarType::Float => ValueKind::Float,
            ScalarType::Bool => ValueKind::Bool,
        }
    }
}

impl FromStr for ScalarType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" | "str" => Ok(ScalarType::String),
            "int" => Ok(ScalarType::Int),
            "float" => Ok(ScalarType::Float),
            "bool" => Ok(ScalarType::Bool),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value_kind(), f)
    }
}

/// Declared type of a field.
#[derive(Debug, Clone)]
pub enum FieldType {
    Scalar(ScalarType),
    Nested(Arc<SchemaDescriptor>),
    ListOf(Arc<SchemaDescriptor>),
}

impl FieldType {
    /// The decoded kind a present value must have.
    pub fn value_kind(&self) -> ValueKind {
        match self {
            FieldType::Scalar(scalar) => scalar.value_kind(),
            FieldType::Nested(_) => ValueKind::Object,
            FieldType::ListOf(_) => ValueKind::Array,
        }
    }
}

impl From<ScalarType> for FieldType {
    fn from(scalar: ScalarType) -> Self {
        FieldType::Scalar(scalar)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(scalar) => write!(f, "{}", scalar),
            FieldType::Nested(desc) => f.write_str(desc.name()),
            FieldType::ListOf(desc) => write!(f, "[{}]", desc.name()),
        }
    }
}

/// Nesting kind of a field, as seen by the binding engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    Nested,
    ListOfNested,
    Optional,
}

/// One declared field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    ty: FieldType,
    /// `Some` for optional fields: the value bound when absent or null.
    default: Option<BoundValue>,
}

impl FieldSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    pub fn kind(&self) -> FieldKind {
        if self.default.is_some() {
            return FieldKind::Optional;
        }
        match self.ty {
            FieldType::Scalar(_) => FieldKind::Scalar,
            FieldType::Nested(_) => FieldKind::Nested,
            FieldType::ListOf(_) => FieldKind::ListOfNested,
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// The value bound when an optional field is absent or null.
    pub fn default(&self) -> Option<&BoundValue> {
        self.default.as_ref()
    }
}

/// Compiled description of a target shape.
#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
    name: String,
    fields: Vec<FieldSpec>,
}

impl SchemaDescriptor {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order; the engine checks them in this order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Builder for [`SchemaDescriptor`].
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Add a required field of any type.
    pub fn field(mut self, name: impl Into<String>, ty: impl Into<FieldType>) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            ty: ty.into(),
            default: None,
        });
        self
    }

    /// Add a required scalar field.
    pub fn scalar(self, name: impl Into<String>, scalar: ScalarType) -> Self {
        self.field(name, FieldType::Scalar(scalar))
    }

    /// Add a required nested object field.
    pub fn nested(self, name: impl Into<String>, desc: Arc<SchemaDescriptor>) -> Self {
        self.field(name, FieldType::Nested(desc))
    }

    /// Add a required list-of-objects field.
    pub fn list_of(self, name: impl Into<String>, desc: Arc<SchemaDescriptor>) -> Self {
        self.field(name, FieldType::ListOf(desc))
    }

    /// Add an optional field; absent or null binds to `BoundValue::Absent`.
    pub fn optional(self, name: impl Into<String>, ty: impl Into<FieldType>) -> Self {
        self.optional_with_default(name, ty, BoundValue::Absent)
    }

    /// Add an optional field with an explicit default.
    pub fn optional_with_default(
        mut self,
        name: impl Into<String>,
        ty: impl Into<FieldType>,
        default: BoundValue,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            ty: ty.into(),
            default: Some(default),
        });
        self
    }

    /// Check field names and defaults, then freeze the descriptor.
    pub fn build(self) -> Result<SchemaDescriptor, SchemaError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyFieldName {
                    schema: self.name.clone(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            if let Some(default) = &field.default {
                check_default(&self.name, field, default)?;
            }
        }

        Ok(SchemaDescriptor {
            name: self.name,
            fields: self.fields,
        })
    }
}

fn check_default(schema: &str, field: &FieldSpec, default: &BoundValue) -> Result<(), SchemaError> {
    let fits = match (&field.ty, default) {
        (_, BoundValue::Absent) => true,
        (FieldType::Scalar(scalar), value) => scalar.value_kind() == value.kind(),
        (FieldType::Nested(desc), BoundValue::Object(obj)) => obj.schema() == desc.name(),
        (FieldType::ListOf(desc), BoundValue::List(items)) => {
            items.iter().all(|obj| obj.schema() == desc.name())
        }
        _ => false,
    };

    if fits {
        Ok(())
    } else {
        Err(SchemaError::InvalidDefault {
            schema: schema.to_string(),
            field: field.name.clone(),
            expected: field.ty.to_string(),
            found: default.kind(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inner() -> Arc<SchemaDescriptor> {
        Arc::new(
            SchemaDescriptor::builder("Inner")
                .scalar("name", ScalarType::String)
                .scalar("age", ScalarType::Int)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_field_kinds() {
        let desc = SchemaDescriptor::builder("Outer")
            .scalar("datetime", ScalarType::String)
            .nested("account", inner())
            .list_of("accounts", inner())
            .optional("age", ScalarType::Int)
            .build()
            .unwrap();

        let kinds: Vec<FieldKind> = desc.fields().iter().map(FieldSpec::kind).collect();
        assert_eq!(
            kinds,
            vec![
                FieldKind::Scalar,
                FieldKind::Nested,
                FieldKind::ListOfNested,
                FieldKind::Optional
            ]
        );
        assert!(desc.field("datetime").unwrap().is_required());
        assert_eq!(
            desc.field("age").unwrap().default(),
            Some(&BoundValue::Absent)
        );
        assert_eq!(desc.field("accounts").unwrap().ty().to_string(), "[Inner]");
        assert!(desc.field("nope").is_none());
    }

    #[test]
    fn test_duplicate_and_empty_names() {
        let err = SchemaDescriptor::builder("S")
            .scalar("a", ScalarType::Int)
            .scalar("a", ScalarType::String)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateField {
                schema: "S".into(),
                field: "a".into()
            }
        );

        let err = SchemaDescriptor::builder("S")
            .scalar("", ScalarType::Int)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::EmptyFieldName { .. }));
    }

    #[test]
    fn test_defaults_must_fit() {
        assert!(SchemaDescriptor::builder("S")
            .optional_with_default("age", ScalarType::Int, BoundValue::Int(0))
            .optional_with_default("tags", FieldType::ListOf(inner()), BoundValue::List(vec![]))
            .build()
            .is_ok());

        let err = SchemaDescriptor::builder("S")
            .optional_with_default("age", ScalarType::Int, BoundValue::String("0".into()))
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "default for `S.age` must be int, found string"
        );
    }

    #[test]
    fn test_scalar_names() {
        assert_eq!("str".parse::<ScalarType>(), Ok(ScalarType::String));
        assert_eq!("float".parse::<ScalarType>(), Ok(ScalarType::Float));
        assert!("list".parse::<ScalarType>().is_err());
    }
}
