//! Configuration schema definitions.
//!
//! Everything an application declares up front: log settings, the binding
//! policy, the route table and the named payload schemas. All types derive
//! Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

use crate::binding::BindOptions;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Binding policy shared by every route.
    pub binding: BindingConfig,

    /// Route definitions mapping path patterns to handlers.
    pub routes: Vec<RouteConfig>,

    /// Named payload schemas.
    pub schemas: Vec<SchemaConfig>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Scalar coercion policy for request payloads.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BindingConfig {
    /// Accept integers where a float is declared.
    pub widen_int_to_float: bool,
}

impl From<&BindingConfig> for BindOptions {
    fn from(config: &BindingConfig) -> Self {
        BindOptions {
            widen_int_to_float: config.widen_int_to_float,
        }
    }
}

/// Route configuration mapping a path pattern to a handler.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Handler identifier the route resolves to.
    pub handler: String,

    /// Path pattern, e.g. `/users/{digits:4}/profile`.
    pub pattern: String,

    /// API versions; each adds a leading `v{N}` segment. Empty registers the bare pattern.
    #[serde(default)]
    pub versions: Vec<u32>,

    /// Schema the handler expects as request body.
    #[serde(default)]
    pub input: Option<String>,
}

/// A named payload schema.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchemaConfig {
    pub name: String,

    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

/// One field of a [`SchemaConfig`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldConfig {
    pub name: String,

    /// `string`, `int`, `float`, `bool`, a schema name, or `[SchemaName]`.
    #[serde(rename = "type")]
    pub ty: String,

    /// Absent or null binds to nothing instead of failing.
    #[serde(default)]
    pub optional: bool,

    /// Value bound when the field is absent or null. Implies `optional`.
    #[serde(default)]
    pub default: Option<toml::Value>,
}
