use axum::Json;

use super::schema::{ProbeResponse, LIVENESS_MESSAGE, READY};

/// Handler for GET /healthz
pub async fn healthz() -> Json<ProbeResponse> {
    Json(ProbeResponse {
        status: LIVENESS_MESSAGE,
    })
}

/// Handler for GET /readyz
/// The service has no downstream dependencies, so it is ready once serving.
pub async fn readyz() -> Json<ProbeResponse> {
    Json(ProbeResponse { status: READY })
}
