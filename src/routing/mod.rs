//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration (at startup):
//!     "/users/{digits:4}"
//!     → pattern.rs (parse into literal / flexible segments)
//!     → router.rs (ambiguity check against every registered pattern)
//!     → append to table; flexible patterns also indexed for fallback
//!
//! Incoming path ("/users/0042")
//!     → router.rs (split into segments)
//!     → exact lookup over all-literal patterns
//!     → fallback scan over flexible patterns
//!         → location.rs (evaluate locator per segment)
//!     → Return: handler (+ captured params) or None
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable while serving
//! - Conservative collision check: a locator collides with anything
//! - Deterministic: same input always matches same route
//! - First registered flexible pattern wins

pub mod location;
pub mod pattern;
pub mod router;

pub use location::{Locator, LocatorError, Segment};
pub use pattern::{PathPattern, PatternError};
pub use router::{PathParams, RouteEntry, RouteMatch, Router, RouterError};
