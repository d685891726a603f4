pub mod catalog;
pub mod error;
pub mod health;
pub mod metrics;
pub mod streaming;
pub mod video;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Full application router with middleware, as served by the binary.
pub fn app(state: AppState, prometheus: Arc<PrometheusHandle>) -> Router {
    api_routes()
        .with_state(state)
        .route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(prometheus),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(1024 * 1024)) // scripts are small
}

/// Browser-facing API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/generate-video", post(video::generate_video))
        .route("/api/check-status", get(video::check_status))
        .route("/api/list-avatars", get(catalog::list_avatars))
        .route("/api/list-voices", get(catalog::list_voices))
        .route("/api/create-token", post(streaming::create_token))
}
