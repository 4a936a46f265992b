//! RPC metrics.
//!
//! # Metrics
//! - `multichain_rpc_requests_total` (counter): calls by method and outcome
//! - `multichain_rpc_request_duration_seconds` (histogram): call latency by method
//!
//! Recorded through the `metrics` facade; installing an exporter is up to
//! the embedding application.

use std::time::Instant;

/// Record one completed RPC call. `outcome` is "ok" or an error kind.
pub fn record_rpc_call(method: &str, outcome: &'static str, started: Instant) {
    metrics::counter!(
        "multichain_rpc_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    metrics::histogram!(
        "multichain_rpc_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(started.elapsed().as_secs_f64());
}
