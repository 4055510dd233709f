use axum::{extract::State, Json};
use std::sync::Arc;

use crate::AppState;
use super::schema::{IndexResponse, ENDPOINTS, WELCOME_MESSAGE};

/// Handler for GET /
pub async fn index(State(state): State<Arc<AppState>>) -> Json<IndexResponse> {
    tracing::info!("Root endpoint called");

    Json(IndexResponse {
        message: WELCOME_MESSAGE,
        started_at: state.uptime.started_at_rfc3339(),
        uptime_seconds: state.uptime.uptime_seconds(),
        endpoints: ENDPOINTS,
    })
}
