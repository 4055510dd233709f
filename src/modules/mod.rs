pub mod api;
pub mod index;
pub mod metrics;
pub mod probes;
