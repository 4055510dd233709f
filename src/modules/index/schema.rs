use serde::Serialize;

pub const WELCOME_MESSAGE: &str =
    "Hello Batman! This app will be containerized, then deployed with Kubernetes + ArgoCD later.";

pub const ENDPOINTS: &[&str] = &["/healthz", "/readyz", "/metrics", "/api/ping", "/api/uptime"];

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub started_at: String,
    pub uptime_seconds: u64,
    pub endpoints: &'static [&'static str],
}
