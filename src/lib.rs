pub mod config;
pub mod modules;
pub mod services;

use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use modules::{api::api_routes, index::index_routes, metrics::metrics_routes, probes::probe_routes};
use services::metrics::{metrics_middleware, HttpMetricsCollector, MetricsRegistry, PathLabel};
use services::uptime::UptimeTracker;

/// Shared state handed to every handler
pub struct AppState {
    pub uptime: UptimeTracker,
    pub metrics: Arc<MetricsRegistry>,
    pub http_metrics: Arc<HttpMetricsCollector>,
}

impl AppState {
    pub fn new(uptime: UptimeTracker, metrics: Arc<MetricsRegistry>, path_label: PathLabel) -> Self {
        let http_metrics = Arc::new(HttpMetricsCollector::new(metrics.clone(), path_label));
        Self {
            uptime,
            metrics,
            http_metrics,
        }
    }
}

pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(index_routes())
        .merge(probe_routes())
        .merge(metrics_routes())
        .nest("/api", api_routes())
        .layer(middleware::from_fn_with_state(
            state.http_metrics.clone(),
            metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
