//! Metrics collection for relay-service.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Calling it twice is a no-op.
pub fn init_metrics() -> Result<(), BuildError> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Record one outbound call and its latency.
pub fn record_upstream_call(upstream: &'static str, outcome: &'static str, elapsed: Duration) {
    counter!(
        "relay_upstream_requests_total",
        "upstream" => upstream,
        "outcome" => outcome
    )
    .increment(1);
    histogram!("relay_upstream_duration_seconds", "upstream" => upstream)
        .record(elapsed.as_secs_f64());
}
