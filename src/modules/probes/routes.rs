use axum::{routing::get, Router};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn probe_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(controller::healthz))
        .route("/readyz", get(controller::readyz))
}
