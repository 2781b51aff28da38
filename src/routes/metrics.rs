use axum::extract::State;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Register descriptions for the relay's metrics.
pub fn describe() {
    metrics::describe_counter!(
        "agent_photo_process_total",
        "Processing calls by outcome (success or error kind)"
    );
    metrics::describe_histogram!(
        "agent_photo_provider_seconds",
        "Duration of the outbound vision provider call"
    );
}

/// GET /metrics — Prometheus text exposition of the relay's metrics.
pub async fn prometheus_metrics(State(handle): State<Arc<PrometheusHandle>>) -> String {
    handle.render()
}
