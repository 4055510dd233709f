pub mod metrics;
pub mod uptime;
