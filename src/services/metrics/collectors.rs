use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use super::registry::{MetricsError, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};
use super::MetricsRegistry;

/// How the `path` label is derived from a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathLabel {
    /// Matched route template; unmatched paths are normalized
    #[default]
    Template,
    /// The request path exactly as received
    Raw,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown path label mode: {0} (expected \"template\" or \"raw\")")]
pub struct UnknownPathLabel(String);

impl FromStr for PathLabel {
    type Err = UnknownPathLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "template" => Ok(Self::Template),
            "raw" => Ok(Self::Raw),
            other => Err(UnknownPathLabel(other.to_string())),
        }
    }
}

/// Collector for HTTP request metrics
pub struct HttpMetricsCollector {
    metrics: Arc<MetricsRegistry>,
    path_label: PathLabel,
}

impl HttpMetricsCollector {
    pub fn new(metrics: Arc<MetricsRegistry>, path_label: PathLabel) -> Self {
        Self {
            metrics,
            path_label,
        }
    }

    pub fn path_label(&self) -> PathLabel {
        self.path_label
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// One counter increment and one latency observation per completed request.
    /// Both are attempted even if the first fails; the first error is returned.
    pub fn record_request(
        &self,
        path: &str,
        method: &str,
        status: u16,
        duration_secs: f64,
    ) -> Result<(), MetricsError> {
        let status = status.to_string();

        let counted = self
            .metrics
            .increment_counter(HTTP_REQUESTS_TOTAL, &[path, method, status.as_str()]);

        let observed = self
            .metrics
            .observe_histogram(HTTP_REQUEST_DURATION_SECONDS, &[path], duration_secs);

        counted.and(observed)
    }
}

/// Timer helper for measuring durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for MetricsTimer {
    fn default() -> Self {
        Self::new()
    }
}
