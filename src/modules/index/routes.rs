use axum::{routing::get, Router};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn index_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(controller::index))
}
