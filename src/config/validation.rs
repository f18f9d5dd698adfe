//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes name existing input schemas)
//! - Check every route pattern parses
//! - Detect repeated schema and field names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Route ambiguity is left to the router, which owns that rule

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::routing::PathPattern;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown log level `{0}`")]
    UnknownLogLevel(String),

    #[error("route #{index} has an empty handler")]
    EmptyHandler { index: usize },

    #[error("route `{handler}` pattern `{pattern}` must start with '/'")]
    RelativePattern { handler: String, pattern: String },

    #[error("route `{handler}` has an invalid pattern: {reason}")]
    InvalidPattern { handler: String, reason: String },

    #[error("route `{handler}` lists version {version} twice")]
    DuplicateVersion { handler: String, version: u32 },

    #[error("route `{handler}` expects unknown schema `{schema}`")]
    UnknownInput { handler: String, schema: String },

    #[error("schema #{index} has an empty name")]
    EmptySchemaName { index: usize },

    #[error("schema `{0}` is defined twice")]
    DuplicateSchema(String),

    #[error("schema `{schema}` field `{field}` has an empty type")]
    EmptyFieldType { schema: String, field: String },
}

/// Check `config` for problems serde cannot see.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    let mut schema_names = HashSet::new();
    for (index, schema) in config.schemas.iter().enumerate() {
        if schema.name.trim().is_empty() {
            errors.push(ValidationError::EmptySchemaName { index });
        } else if !schema_names.insert(schema.name.as_str()) {
            errors.push(ValidationError::DuplicateSchema(schema.name.clone()));
        }

        for field in &schema.fields {
            if field.ty.trim().is_empty() {
                errors.push(ValidationError::EmptyFieldType {
                    schema: schema.name.clone(),
                    field: field.name.clone(),
                });
            }
        }
    }

    for (index, route) in config.routes.iter().enumerate() {
        if route.handler.trim().is_empty() {
            errors.push(ValidationError::EmptyHandler { index });
        }

        if !route.pattern.starts_with('/') {
            errors.push(ValidationError::RelativePattern {
                handler: route.handler.clone(),
                pattern: route.pattern.clone(),
            });
        } else if let Err(e) = route.pattern.parse::<PathPattern>() {
            errors.push(ValidationError::InvalidPattern {
                handler: route.handler.clone(),
                reason: e.to_string(),
            });
        }

        let mut versions = HashSet::new();
        for &version in &route.versions {
            if !versions.insert(version) {
                errors.push(ValidationError::DuplicateVersion {
                    handler: route.handler.clone(),
                    version,
                });
            }
        }

        if let Some(schema) = &route.input {
            if !schema_names.contains(schema.as_str()) {
                errors.push(ValidationError::UnknownInput {
                    handler: route.handler.clone(),
                    schema: schema.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{FieldConfig, RouteConfig, SchemaConfig};

    fn route(handler: &str, pattern: &str) -> RouteConfig {
        RouteConfig {
            handler: handler.into(),
            pattern: pattern.into(),
            versions: vec![],
            input: None,
        }
    }

    #[test]
    fn test_valid_config() {
        let mut config = AppConfig::default();
        config.routes.push(route("index", "/"));
        config.routes.push(route("user", "/users/{digits:4}"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = AppConfig::default();
        config.observability.log_level = "loud".into();
        config.routes.push(route("", "users"));
        let mut bad = route("user", "/users/{digits:0}");
        bad.versions = vec![1, 1];
        bad.input = Some("Missing".into());
        config.routes.push(bad);
        config.schemas.push(SchemaConfig {
            name: "User".into(),
            fields: vec![FieldConfig {
                name: "name".into(),
                ty: " ".into(),
                optional: false,
                default: None,
            }],
        });
        config.schemas.push(SchemaConfig {
            name: "User".into(),
            fields: vec![],
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 8);
        assert!(errors.contains(&ValidationError::UnknownLogLevel("loud".into())));
        assert!(errors.contains(&ValidationError::EmptyHandler { index: 0 }));
        assert!(errors.contains(&ValidationError::DuplicateSchema("User".into())));
        assert!(errors.contains(&ValidationError::DuplicateVersion {
            handler: "user".into(),
            version: 1
        }));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidPattern { handler, .. } if handler == "user")));
    }
}
