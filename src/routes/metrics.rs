use std::sync::Arc;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

/// GET /metrics — Prometheus text exposition of submission, polling and upstream latency metrics.
pub async fn prometheus_metrics(State(handle): State<Arc<PrometheusHandle>>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
}

/// Register descriptions for every metric the crate emits.
pub fn describe_metrics() {
    metrics::describe_counter!(
        "video_submissions_total",
        "Generation requests forwarded to the video service"
    );
    metrics::describe_counter!(
        "video_submissions_failed",
        "Generation requests the video service rejected or failed"
    );
    metrics::describe_counter!("status_polls_total", "Status queries issued by pollers");
    metrics::describe_counter!(
        "status_poll_failures_total",
        "Status queries that failed before a status was read"
    );
    metrics::describe_histogram!(
        "upstream_request_seconds",
        metrics::Unit::Seconds,
        "Latency of calls to the video service"
    );
}
