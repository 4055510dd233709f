use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::collectors::{HttpMetricsCollector, MetricsTimer, PathLabel};

/// Middleware to collect HTTP request metrics.
///
/// Records only once `next` has produced a response. A handler that panics,
/// or a request future dropped before completion (client disconnect, timeout),
/// leaves no sample behind. Recording errors are logged and never alter the
/// response.
pub async fn metrics_middleware(
    State(collector): State<Arc<HttpMetricsCollector>>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    let path = path_label(&req, collector.path_label());

    let timer = MetricsTimer::new();
    let response = next.run(req).await;
    let duration = timer.elapsed_secs();

    let status = response.status().as_u16();
    if let Err(e) = collector.record_request(&path, &method, status, duration) {
        tracing::warn!(error = %e, %path, %method, status, "failed to record request metrics");
    }

    response
}

fn path_label(req: &Request, mode: PathLabel) -> String {
    match mode {
        PathLabel::Raw => req.uri().path().to_string(),
        PathLabel::Template => match req.extensions().get::<MatchedPath>() {
            Some(matched) => matched.as_str().to_string(),
            None => normalize_path(req.uri().path()),
        },
    }
}

/// Normalize path to reduce cardinality
/// Converts /api/swap/123 -> /api/swap/:id
fn normalize_path(path: &str) -> String {
    let normalized: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| if is_id_like(segment) { ":id" } else { segment })
        .collect();

    format!("/{}", normalized.join("/"))
}

/// Check if a segment looks like an ID
fn is_id_like(segment: &str) -> bool {
    // UUID pattern
    if segment.len() == 36 && segment.chars().filter(|c| *c == '-').count() == 4 {
        return true;
    }

    // All digits (numeric ID)
    if segment.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    // Hex hash (40+ chars), optionally 0x-prefixed
    let hex = segment.strip_prefix("0x").unwrap_or(segment);
    if hex.len() >= 40 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return true;
    }

    false
}
