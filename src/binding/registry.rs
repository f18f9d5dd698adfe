//! Named descriptors built from declarative configuration.
//!
//! Schemas refer to each other by name (`"Account"`, `"[Account]"`), so the
//! registry builds them bottom-up: a schema is compiled only after every
//! schema it nests. Unknown names and reference cycles are rejected here,
//! before anything is served.

use std::collections::HashMap;
use std::sync::Arc;

use crate::binding::bound::BoundValue;
use crate::binding::descriptor::{FieldType, ScalarType, SchemaDescriptor, SchemaError};
use crate::config::schema::{FieldConfig, SchemaConfig};

/// A parsed type reference from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TypeRef<'a> {
    Scalar(ScalarType),
    Nested(&'a str),
    ListOf(&'a str),
}

impl<'a> TypeRef<'a> {
    fn parse(text: &'a str) -> Self {
        let text = text.trim();
        if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            return TypeRef::ListOf(inner.trim());
        }
        match text.parse::<ScalarType>() {
            Ok(scalar) => TypeRef::Scalar(scalar),
            Err(()) => TypeRef::Nested(text),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Lookup table of compiled descriptors by schema name.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<SchemaDescriptor>>,
    order: Vec<String>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every schema in `configs`.
    pub fn from_config(configs: &[SchemaConfig]) -> Result<Self, SchemaError> {
        let mut by_name: HashMap<&str, &SchemaConfig> = HashMap::new();
        for config in configs {
            if by_name.insert(config.name.as_str(), config).is_some() {
                return Err(SchemaError::DuplicateSchema(config.name.clone()));
            }
        }

        let mut registry = Self::new();
        let mut marks: HashMap<&str, Mark> = HashMap::new();
        for config in configs {
            registry.compile(config, &by_name, &mut marks)?;
        }

        tracing::debug!(count = registry.len(), "Schemas compiled");
        Ok(registry)
    }

    /// Add a descriptor built in code.
    pub fn insert(&mut self, desc: SchemaDescriptor) -> Result<Arc<SchemaDescriptor>, SchemaError> {
        if self.schemas.contains_key(desc.name()) {
            return Err(SchemaError::DuplicateSchema(desc.name().to_string()));
        }
        let desc = Arc::new(desc);
        self.order.push(desc.name().to_string());
        self.schemas.insert(desc.name().to_string(), desc.clone());
        Ok(desc)
    }

    pub fn get(&self, name: &str) -> Option<Arc<SchemaDescriptor>> {
        self.schemas.get(name).cloned()
    }

    /// Schema names in the order they were compiled (dependencies first).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    fn compile<'c>(
        &mut self,
        config: &'c SchemaConfig,
        by_name: &HashMap<&'c str, &'c SchemaConfig>,
        marks: &mut HashMap<&'c str, Mark>,
    ) -> Result<Arc<SchemaDescriptor>, SchemaError> {
        match marks.get(config.name.as_str()) {
            Some(Mark::Done) => {
                if let Some(desc) = self.get(&config.name) {
                    return Ok(desc);
                }
            }
            Some(Mark::Visiting) => return Err(SchemaError::Cycle(config.name.clone())),
            None => {}
        }
        marks.insert(config.name.as_str(), Mark::Visiting);

        let mut builder = SchemaDescriptor::builder(config.name.clone());
        for field in &config.fields {
            let ty = match TypeRef::parse(&field.ty) {
                TypeRef::Scalar(scalar) => FieldType::Scalar(scalar),
                TypeRef::Nested(name) => {
                    FieldType::Nested(self.compile_nested(config, field, name, by_name, marks)?)
                }
                TypeRef::ListOf(name) => {
                    FieldType::ListOf(self.compile_nested(config, field, name, by_name, marks)?)
                }
            };

            builder = match default_value(config, field, &ty)? {
                Some(default) => builder.optional_with_default(field.name.clone(), ty, default),
                None if field.optional => builder.optional(field.name.clone(), ty),
                None => builder.field(field.name.clone(), ty),
            };
        }

        let desc = self.insert(builder.build()?)?;
        marks.insert(config.name.as_str(), Mark::Done);
        Ok(desc)
    }

    fn compile_nested<'c>(
        &mut self,
        schema: &SchemaConfig,
        field: &FieldConfig,
        name: &str,
        by_name: &HashMap<&'c str, &'c SchemaConfig>,
        marks: &mut HashMap<&'c str, Mark>,
    ) -> Result<Arc<SchemaDescriptor>, SchemaError> {
        let nested = by_name.get(name).copied().ok_or_else(|| SchemaError::UnknownType {
            schema: schema.name.clone(),
            field: field.name.clone(),
            type_name: field.ty.clone(),
        })?;
        self.compile(nested, by_name, marks)
    }
}

fn default_value(
    schema: &SchemaConfig,
    field: &FieldConfig,
    ty: &FieldType,
) -> Result<Option<BoundValue>, SchemaError> {
    let value = match &field.default {
        None => return Ok(None),
        Some(toml::Value::String(s)) => BoundValue::String(s.clone()),
        // `default = 0` on a float field
        Some(toml::Value::Integer(i)) if matches!(ty, FieldType::Scalar(ScalarType::Float)) => {
            BoundValue::Float(*i as f64)
        }
        Some(toml::Value::Integer(i)) => BoundValue::Int(*i),
        Some(toml::Value::Float(f)) => BoundValue::Float(*f),
        Some(toml::Value::Boolean(b)) => BoundValue::Bool(*b),
        Some(_) => {
            return Err(SchemaError::UnsupportedDefault {
                schema: schema.name.clone(),
                field: field.name.clone(),
            })
        }
    };
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::descriptor::FieldKind;

    fn field(name: &str, ty: &str) -> FieldConfig {
        FieldConfig {
            name: name.into(),
            ty: ty.into(),
            optional: false,
            default: None,
        }
    }

    fn schema(name: &str, fields: Vec<FieldConfig>) -> SchemaConfig {
        SchemaConfig {
            name: name.into(),
            fields,
        }
    }

    #[test]
    fn test_type_ref_parse() {
        assert_eq!(TypeRef::parse("int"), TypeRef::Scalar(ScalarType::Int));
        assert_eq!(TypeRef::parse("Account"), TypeRef::Nested("Account"));
        assert_eq!(TypeRef::parse("[ Account ]"), TypeRef::ListOf("Account"));
    }

    #[test]
    fn test_builds_dependencies_first() {
        // `Team` is declared before the schema it nests
        let configs = vec![
            schema(
                "Team",
                vec![field("accounts", "[Account]"), field("lead", "Account")],
            ),
            schema("Account", vec![field("name", "string"), field("age", "int")]),
        ];
        let registry = SchemaRegistry::from_config(&configs).unwrap();

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Account", "Team"]);
        let team = registry.get("Team").unwrap();
        assert_eq!(team.field("accounts").unwrap().kind(), FieldKind::ListOfNested);
        assert_eq!(team.field("lead").unwrap().kind(), FieldKind::Nested);
    }

    #[test]
    fn test_optional_and_defaults() {
        let mut age = field("age", "int");
        age.optional = true;
        let mut role = field("role", "string");
        role.default = Some(toml::Value::String("member".into()));

        let registry =
            SchemaRegistry::from_config(&[schema("User", vec![age, role])]).unwrap();
        let user = registry.get("User").unwrap();
        assert_eq!(user.field("age").unwrap().default(), Some(&BoundValue::Absent));
        assert_eq!(
            user.field("role").unwrap().default(),
            Some(&BoundValue::String("member".into()))
        );

        let mut score = field("score", "float");
        score.default = Some(toml::Value::Integer(0));
        let registry = SchemaRegistry::from_config(&[schema("Game", vec![score])]).unwrap();
        assert_eq!(
            registry.get("Game").unwrap().field("score").unwrap().default(),
            Some(&BoundValue::Float(0.0))
        );

        let mut bad = field("age", "int");
        bad.default = Some(toml::Value::String("ten".into()));
        let err = SchemaRegistry::from_config(&[schema("User", vec![bad])]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefault { .. }));
    }

    #[test]
    fn test_rejects_unknown_duplicate_and_cycles() {
        let err = SchemaRegistry::from_config(&[schema("A", vec![field("b", "B")])]).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { .. }));

        let err = SchemaRegistry::from_config(&[schema("A", vec![]), schema("A", vec![])])
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateSchema("A".into()));

        let err = SchemaRegistry::from_config(&[
            schema("A", vec![field("b", "B")]),
            schema("B", vec![field("a", "[A]")]),
        ])
        .unwrap_err();
        assert_eq!(err, SchemaError::Cycle("A".into()));
    }
}
