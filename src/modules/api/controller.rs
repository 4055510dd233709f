use axum::{extract::State, Json};
use std::sync::Arc;

use crate::AppState;
use super::schema::{PingResponse, UptimeResponse};

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse { pong: true })
}

pub async fn uptime(State(state): State<Arc<AppState>>) -> Json<UptimeResponse> {
    Json(UptimeResponse {
        uptime_seconds: state.uptime.uptime_seconds(),
    })
}
