// src/metrics.rs
use std::time::Duration;

use ::metrics::{counter, describe_counter, describe_histogram, histogram};
use shuttle_axum::axum::{routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the process-wide Prometheus recorder. Call once, from the binary.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;
        ensure_described();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// One-time metrics registration (so series show up on /metrics).
fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "devto_requests_total",
            "Calls made to the Dev.to API, by method and outcome."
        );
        describe_histogram!("devto_request_ms", "Dev.to API call latency in milliseconds.");
        describe_counter!(
            "devto_page_failures_total",
            "Listing pages skipped during aggregation because the fetch failed."
        );
        describe_counter!(
            "devto_fallback_scans_total",
            "Lookups that degraded to a scan of the caller's own articles."
        );
    });
}

pub(crate) fn record_request(method: &str, outcome: &str, elapsed: Duration) {
    counter!(
        "devto_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    histogram!("devto_request_ms").record(elapsed.as_secs_f64() * 1_000.0);
}

pub(crate) fn record_page_failure() {
    counter!("devto_page_failures_total").increment(1);
}

pub(crate) fn record_fallback_scan(kind: &'static str) {
    counter!("devto_fallback_scans_total", "kind" => kind).increment(1);
}
