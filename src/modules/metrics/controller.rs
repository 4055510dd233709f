use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::AppState;

/// Handler for GET /metrics endpoint
/// Returns Prometheus metrics in text format
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render_exposition() {
        Ok(exposition) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, exposition.content_type)],
            exposition.body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to export metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to export metrics: {}", e),
            )
                .into_response()
        }
    }
}
