use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub pong: bool,
}

#[derive(Debug, Serialize)]
pub struct UptimeResponse {
    pub uptime_seconds: u64,
}
