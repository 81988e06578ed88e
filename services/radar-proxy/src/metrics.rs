//! Prometheus counters and histograms for the proxy.
//!
//! These are no-ops until a recorder is installed (see `main`).

use ::metrics::{counter, histogram};
use std::time::Duration;

/// Upstream WMS operation, used as a metric label.
#[derive(Debug, Clone, Copy)]
pub enum UpstreamOp {
    GetMap,
    GetCapabilities,
}

impl UpstreamOp {
    fn label(self) -> &'static str {
        match self {
            UpstreamOp::GetMap => "getmap",
            UpstreamOp::GetCapabilities => "getcapabilities",
        }
    }
}

pub fn record_tile_request() {
    counter!("radar_proxy_tile_requests_total").increment(1);
}

pub fn record_frames_request() {
    counter!("radar_proxy_frames_requests_total").increment(1);
}

/// Record one upstream call and how it ended ("ok", "unavailable", "status", "invalid").
pub fn record_upstream(op: UpstreamOp, outcome: &'static str, elapsed: Duration) {
    counter!(
        "radar_proxy_upstream_requests_total",
        "operation" => op.label(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("radar_proxy_upstream_duration_seconds", "operation" => op.label())
        .record(elapsed.as_secs_f64());
}

pub fn record_cache_hit() {
    counter!("radar_proxy_frame_cache_hits_total").increment(1);
}

pub fn record_cache_miss() {
    counter!("radar_proxy_frame_cache_misses_total").increment(1);
}

/// Hazards overlay failed and the radar tile was served alone.
pub fn record_overlay_failure() {
    counter!("radar_proxy_overlay_failures_total").increment(1);
}
