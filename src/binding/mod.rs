//! Data binding subsystem.
//!
//! # Data Flow
//! ```text
//! Schema compilation (at startup):
//!     SchemaConfig[] or SchemaBuilder
//!     → registry.rs (resolve nested names, reject cycles)
//!     → descriptor.rs (check fields and defaults)
//!     → Arc<SchemaDescriptor>, immutable
//!
//! Request body:
//!     raw bytes + descriptor
//!     → engine.rs (decode JSON, walk fields in order)
//!     → bound.rs (BoundObject)      or error.rs (ValidationFailure)
//!     → data.rs (optional: deserialize into a caller struct)
//! ```
//!
//! # Design Decisions
//! - Descriptors are explicit values, built once; nothing is reflected per request
//! - First failure wins, by descriptor field order
//! - Undeclared keys are dropped, never rejected

pub mod bound;
pub mod data;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod registry;

pub use bound::{BoundObject, BoundValue};
pub use data::{ApiData, BindError, RawData, TypedBinder, MEDIA_TYPE_JSON, MEDIA_TYPE_PLAIN};
pub use descriptor::{
    FieldKind, FieldSpec, FieldType, ScalarType, SchemaBuilder, SchemaDescriptor, SchemaError,
};
pub use engine::{bind, BindOptions, Binder};
pub use error::{FailureKind, FieldPath, PathSegment, ValidationFailure, ValueKind};
pub use registry::SchemaRegistry;
