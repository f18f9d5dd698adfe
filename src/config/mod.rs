//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → App::from_config (routes registered, schemas compiled)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a rebuild of the App
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::AppConfig;
pub use schema::BindingConfig;
pub use schema::FieldConfig;
pub use schema::ObservabilityConfig;
pub use schema::RouteConfig;
pub use schema::SchemaConfig;
pub use validation::{validate_config, ValidationError};
