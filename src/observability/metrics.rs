//! Metrics collection.
//!
//! # Metrics
//! - `culm_routes_registered_total` (counter): patterns added to a router
//! - `culm_route_resolutions_total` (counter): lookups by outcome (`hit`, `miss`)
//! - `culm_bind_total` (counter): bind calls by outcome (`ok` or failure kind)
//!
//! # Design Decisions
//! - Library code records through the facade only
//! - The binary may install a Prometheus recorder and render it on exit
//! - Updates are lock-free atomic increments

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install a process-wide Prometheus recorder (no listener).
///
/// The returned handle renders the text exposition format on demand.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record a pattern added to a router.
pub fn record_route_registered() {
    ::metrics::counter!("culm_routes_registered_total").increment(1);
}

/// Record a route lookup.
pub fn record_resolution(hit: bool) {
    let outcome = if hit { "hit" } else { "miss" };
    ::metrics::counter!("culm_route_resolutions_total", "outcome" => outcome).increment(1);
}

/// Record a bind call; `outcome` is `ok` or the failure kind.
pub fn record_bind(outcome: &'static str) {
    ::metrics::counter!("culm_bind_total", "outcome" => outcome).increment(1);
}
