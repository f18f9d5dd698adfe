//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store registered patterns with their handlers
//! - Reject patterns that could collide with an existing one
//! - Look up the handler for a request path
//! - Return the matched handler or an explicit no-match
//!
//! # Design Decisions
//! - Append-only during setup, read-only while serving (no locks)
//! - O(1) lookup for all-literal patterns via HashMap
//! - O(n) scan over flexible patterns, first registered wins
//! - No-match is `None`, never an error

use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;

use crate::observability::metrics;
use crate::routing::pattern::{split_path, PathPattern};

/// Errors raised while registering routes.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Some concrete path could match both patterns.
    #[error("duplicated route: `{pattern}` collides with registered `{existing}`")]
    DuplicateRoute { pattern: String, existing: String },
}

/// A registered pattern and its handler.
#[derive(Debug, Clone)]
pub struct RouteEntry<H> {
    pub pattern: PathPattern,
    pub handler: H,
}

/// Values captured at the flexible positions of a matched pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams<'p> {
    values: Vec<&'p str>,
}

impl<'p> PathParams<'p> {
    /// The raw value of the `index`-th flexible segment.
    pub fn get(&self, index: usize) -> Option<&'p str> {
        self.values.get(index).copied()
    }

    /// The `index`-th flexible segment decoded with `FromStr`.
    pub fn get_as<T: FromStr>(&self, index: usize) -> Option<T> {
        self.get(index).and_then(|v| v.parse().ok())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'p str> + '_ {
        self.values.iter().copied()
    }
}

/// Result of a successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'r, 'p, H> {
    pub handler: &'r H,
    pub pattern: &'r PathPattern,
    pub params: PathParams<'p>,
}

/// Routing table mapping path patterns to handlers.
#[derive(Debug, Clone)]
pub struct Router<H> {
    entries: Vec<RouteEntry<H>>,
    /// All-literal patterns, keyed by their segments.
    literal: HashMap<Vec<String>, usize>,
    /// Indices of patterns with at least one flexible segment.
    flexible: Vec<usize>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            literal: HashMap::new(),
            flexible: Vec::new(),
        }
    }
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `pattern` for `handler`.
    ///
    /// Fails without modifying the table if an already registered pattern
    /// is ambiguous with the new one.
    pub fn register(&mut self, pattern: PathPattern, handler: H) -> Result<(), RouterError> {
        self.check_duplicate(&pattern)?;
        self.insert(pattern, handler);
        Ok(())
    }

    /// Register `pattern` once per version, each under a leading `v{N}` segment.
    ///
    /// All versioned patterns are checked before any is inserted. An empty
    /// `versions` slice registers the bare pattern.
    pub fn register_versioned(
        &mut self,
        pattern: PathPattern,
        versions: &[u32],
        handler: H,
    ) -> Result<(), RouterError>
    where
        H: Clone,
    {
        if versions.is_empty() {
            return self.register(pattern, handler);
        }

        let patterns: Vec<PathPattern> = versions
            .iter()
            .map(|v| pattern.with_prefix(format!("v{}", v)))
            .collect();

        for (i, candidate) in patterns.iter().enumerate() {
            self.check_duplicate(candidate)?;
            if let Some(prev) = patterns[..i].iter().find(|p| p.is_ambiguous(candidate)) {
                return Err(duplicate(candidate, prev));
            }
        }

        for candidate in patterns {
            self.insert(candidate, handler.clone());
        }
        Ok(())
    }

    /// Look up the handler for `path`.
    pub fn resolve(&self, path: &str) -> Option<&H> {
        self.resolve_match(path).map(|m| m.handler)
    }

    /// Look up the handler for `path`, capturing flexible segment values.
    pub fn resolve_match<'r, 'p>(&'r self, path: &'p str) -> Option<RouteMatch<'r, 'p, H>> {
        let segments = split_path(path);

        let key: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
        let exact = self.literal.get(&key).map(|&idx| &self.entries[idx]);

        let found = exact.or_else(|| {
            self.flexible
                .iter()
                .map(|&idx| &self.entries[idx])
                .find(|entry| entry.pattern.matches(&segments))
        });

        metrics::record_resolution(found.is_some());

        let entry = match found {
            Some(entry) => entry,
            None => {
                tracing::trace!(path, "No route matched");
                return None;
            }
        };
        tracing::trace!(path, pattern = %entry.pattern, "Route matched");

        let values = entry
            .pattern
            .segments()
            .iter()
            .zip(segments)
            .filter(|(seg, _)| seg.is_flexible())
            .map(|(_, value)| value)
            .collect();

        Some(RouteMatch {
            handler: &entry.handler,
            pattern: &entry.pattern,
            params: PathParams { values },
        })
    }

    /// All patterns registered for `handler`, in registration order.
    pub fn search_by_handler(&self, handler: &H) -> Vec<&PathPattern>
    where
        H: PartialEq,
    {
        self.entries
            .iter()
            .filter(|entry| &entry.handler == handler)
            .map(|entry| &entry.pattern)
            .collect()
    }

    /// All registered patterns, in registration order.
    pub fn patterns(&self) -> impl Iterator<Item = &PathPattern> {
        self.entries.iter().map(|entry| &entry.pattern)
    }

    pub fn entries(&self) -> &[RouteEntry<H>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_duplicate(&self, pattern: &PathPattern) -> Result<(), RouterError> {
        match self.patterns().find(|existing| existing.is_ambiguous(pattern)) {
            Some(existing) => {
                tracing::warn!(
                    pattern = %pattern,
                    existing = %existing,
                    "Rejected duplicated route"
                );
                Err(duplicate(pattern, existing))
            }
            None => Ok(()),
        }
    }

    fn insert(&mut self, pattern: PathPattern, handler: H) {
        let idx = self.entries.len();
        match pattern.literal_key() {
            Some(key) => {
                self.literal.insert(key, idx);
            }
            None => self.flexible.push(idx),
        }
        tracing::debug!(pattern = %pattern, flexible = pattern.is_flexible(), "Route registered");
        metrics::record_route_registered();
        self.entries.push(RouteEntry { pattern, handler });
    }
}

fn duplicate(pattern: &PathPattern, existing: &PathPattern) -> RouterError {
    RouterError::DuplicateRoute {
        pattern: pattern.to_string(),
        existing: existing.to_string(),
    }
}
