//! Application assembly.
//!
//! # Responsibilities
//! - Build the route table and the schema registry from an [`AppConfig`]
//! - Dispatch a request path and body: resolve the route, then bind the
//!   body against the schema that route declared as its input
//!
//! # Data Flow
//! ```text
//! AppConfig
//!     → SchemaRegistry::from_config (named descriptors)
//!     → Router<RouteTarget>::register_versioned (one entry per version)
//!     → App (immutable, shareable)
//!
//! (path, body)
//!     → Router::resolve_match → route target + params
//!     → Binder::bind (if the matched route declared an input schema)
//!     → Dispatch
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::binding::{BindOptions, Binder, BoundObject, SchemaDescriptor, SchemaError, SchemaRegistry, ValidationFailure};
use crate::config::{AppConfig, RouteConfig};
use crate::routing::{PathParams, PathPattern, PatternError, RouteMatch, Router, RouterError};

/// Errors raised while building or driving an [`App`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error("route `{handler}`: {source}")]
    Pattern {
        handler: String,
        #[source]
        source: PatternError,
    },

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("unknown schema `{0}`")]
    UnknownSchema(String),

    #[error("no route matches `{0}`")]
    NotFound(String),

    #[error("request for `{handler}` rejected: {source}")]
    Rejected {
        handler: String,
        #[source]
        source: ValidationFailure,
    },
}

/// What a registered route resolves to.
#[derive(Debug, Clone)]
pub struct RouteTarget {
    pub handler: String,
    /// Schema the request body must satisfy on this route.
    pub input: Option<Arc<SchemaDescriptor>>,
}

/// Outcome of a dispatched request.
#[derive(Debug)]
pub struct Dispatch<'a, 'p> {
    pub handler: &'a str,
    pub pattern: &'a PathPattern,
    pub params: PathParams<'p>,
    /// The bound body, for routes that declared an input schema.
    pub input: Option<BoundObject>,
}

/// Route table, schemas and binding policy of one application.
#[derive(Debug, Clone, Default)]
pub struct App {
    router: Router<RouteTarget>,
    schemas: SchemaRegistry,
    binder: Binder,
}

impl App {
    pub fn new(options: BindOptions) -> Self {
        Self {
            binder: Binder::new(options),
            ..Self::default()
        }
    }

    /// Compile schemas and register every configured route.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let mut app = Self::new(BindOptions::from(&config.binding));
        app.schemas = SchemaRegistry::from_config(&config.schemas)?;

        for route in &config.routes {
            app.add_route(route)?;
        }

        tracing::debug!(
            routes = app.router.len(),
            schemas = app.schemas.len(),
            "Application built"
        );
        Ok(app)
    }

    /// Register one configured route.
    pub fn add_route(&mut self, route: &RouteConfig) -> Result<(), AppError> {
        let pattern = route
            .pattern
            .parse::<PathPattern>()
            .map_err(|source| AppError::Pattern {
                handler: route.handler.clone(),
                source,
            })?;

        let input = match &route.input {
            Some(name) => Some(
                self.schemas
                    .get(name)
                    .ok_or_else(|| AppError::UnknownSchema(name.clone()))?,
            ),
            None => None,
        };

        let target = RouteTarget {
            handler: route.handler.clone(),
            input,
        };
        self.router
            .register_versioned(pattern, &route.versions, target)?;
        Ok(())
    }

    /// Resolve `path` to its route target.
    pub fn resolve<'a, 'p>(&'a self, path: &'p str) -> Option<RouteMatch<'a, 'p, RouteTarget>> {
        self.router.resolve_match(path)
    }

    /// Resolve `path`, then bind `body` if the matched route declared an input.
    pub fn dispatch<'a, 'p>(&'a self, path: &'p str, body: &[u8]) -> Result<Dispatch<'a, 'p>, AppError> {
        let found = self
            .resolve(path)
            .ok_or_else(|| AppError::NotFound(path.to_string()))?;

        let target = found.handler;
        let input = match &target.input {
            Some(desc) => Some(self.binder.bind(body, desc).map_err(|source| {
                AppError::Rejected {
                    handler: target.handler.clone(),
                    source,
                }
            })?),
            None => None,
        };

        Ok(Dispatch {
            handler: &target.handler,
            pattern: found.pattern,
            params: found.params,
            input,
        })
    }

    /// Bind `raw` against the named schema.
    pub fn bind(&self, schema: &str, raw: &[u8]) -> Result<BoundObject, AppError> {
        let desc = self
            .schemas
            .get(schema)
            .ok_or_else(|| AppError::UnknownSchema(schema.to_string()))?;
        self.binder.bind(raw, &desc).map_err(|source| AppError::Rejected {
            handler: schema.to_string(),
            source,
        })
    }

    /// Patterns registered for `handler`, in registration order.
    pub fn routes_for(&self, handler: &str) -> Vec<&PathPattern> {
        self.router
            .entries()
            .iter()
            .filter(|entry| entry.handler.handler == handler)
            .map(|entry| &entry.pattern)
            .collect()
    }

    pub fn router(&self) -> &Router<RouteTarget> {
        &self.router
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }
}
