//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / binding / app produce:
//!     → tracing events (registration, resolution, bind failures)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr)
//!     → metrics.rs Prometheus recorder, when the binary installs one
//! ```
//!
//! # Design Decisions
//! - Library code only emits; the binary decides where output goes
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
