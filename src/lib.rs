//! Core of a small web framework: a URI router and a schema-driven JSON
//! binding engine.
//!
//! # Architecture Overview
//!
//! ```text
//!     request path ──▶ routing (Router<H>) ──▶ handler + path params
//!                                                   │
//!     request body ──▶ binding (Binder) ◀── input schema of the handler
//!                          │
//!                          ▼
//!                  BoundObject  or  ValidationFailure
//!
//!     config (TOML) ──▶ App: route table + schema registry + bind policy
//! ```

pub mod app;
pub mod binding;
pub mod config;
pub mod observability;
pub mod routing;

pub use app::{App, AppError, Dispatch, RouteTarget};
pub use binding::{bind, Binder, BoundObject, SchemaDescriptor, ValidationFailure};
pub use config::schema::AppConfig;
pub use routing::{PathPattern, Router};
