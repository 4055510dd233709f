use serde::Serialize;

pub const LIVENESS_MESSAGE: &str = "We Are Aight My G";
pub const READY: &str = "ready";

#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    pub status: &'static str,
}
