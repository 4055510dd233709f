use axum::{routing::get, Router};
use std::sync::Arc;

use crate::AppState;
use super::controller;

/// Mounted under `/api`
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(controller::ping))
        .route("/uptime", get(controller::uptime))
}
