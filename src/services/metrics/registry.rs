use prometheus::{
    proto, CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    TEXT_FORMAT,
};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),
    #[error("Metric {name} is not a {expected}")]
    WrongType { name: String, expected: &'static str },
    #[error("Metric {name} expects {expected} label values, got {got}")]
    Cardinality {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("Metric already registered: {0}")]
    AlreadyRegistered(String),
    #[error("Invalid observation for {name}: {value}")]
    InvalidValue { name: String, value: f64 },
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Rendered scrape output and the content type to serve it with.
#[derive(Debug, Clone)]
pub struct Exposition {
    pub content_type: &'static str,
    pub body: String,
}

/// Count and sum of one histogram series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramSnapshot {
    pub count: u64,
    pub sum: f64,
}

#[derive(Clone)]
enum Family {
    Counter(CounterVec),
    Histogram(HistogramVec),
}

/// Metrics registry for the service.
///
/// Families are looked up by name so callers only deal in label values.
/// Series inside a family are created lazily by prometheus on first use and
/// are never removed.
pub struct MetricsRegistry {
    registry: Registry,
    families: RwLock<HashMap<String, Family>>,
}

impl MetricsRegistry {
    /// Registry with the HTTP request families already registered
    pub fn new() -> Result<Arc<Self>, MetricsError> {
        let metrics = Self::empty();

        metrics.register_counter(
            HTTP_REQUESTS_TOTAL,
            "Total HTTP requests",
            &["path", "method", "status"],
        )?;

        metrics.register_histogram(
            HTTP_REQUEST_DURATION_SECONDS,
            "Request latency",
            &["path"],
            None,
        )?;

        Ok(metrics)
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            registry: Registry::new(),
            families: RwLock::new(HashMap::new()),
        })
    }

    pub fn register_counter(
        &self,
        name: &str,
        help: &str,
        label_names: &[&str],
    ) -> Result<(), MetricsError> {
        let counter = CounterVec::new(Opts::new(name, help), label_names)?;
        self.register_family(name, Family::Counter(counter))
    }

    /// `buckets` of `None` keeps prometheus' default latency buckets.
    pub fn register_histogram(
        &self,
        name: &str,
        help: &str,
        label_names: &[&str],
        buckets: Option<Vec<f64>>,
    ) -> Result<(), MetricsError> {
        let mut opts = HistogramOpts::new(name, help);
        if let Some(buckets) = buckets {
            opts = opts.buckets(buckets);
        }
        let histogram = HistogramVec::new(opts, label_names)?;
        self.register_family(name, Family::Histogram(histogram))
    }

    fn register_family(&self, name: &str, family: Family) -> Result<(), MetricsError> {
        let mut families = self.families.write().unwrap_or_else(PoisonError::into_inner);
        if families.contains_key(name) {
            return Err(MetricsError::AlreadyRegistered(name.to_string()));
        }

        let collector: Box<dyn prometheus::core::Collector> = match &family {
            Family::Counter(counter) => Box::new(counter.clone()),
            Family::Histogram(histogram) => Box::new(histogram.clone()),
        };
        self.registry
            .register(collector)
            .map_err(|e| registration_error(name, e))?;

        families.insert(name.to_string(), family);
        Ok(())
    }

    /// Register the standard `process_*` metrics (cpu, memory, fds, start time)
    #[cfg(target_os = "linux")]
    pub fn register_process_collector(&self) -> Result<(), MetricsError> {
        let collector = prometheus::process_collector::ProcessCollector::for_self();
        self.registry
            .register(Box::new(collector))
            .map_err(|e| registration_error("process", e))
    }

    #[cfg(not(target_os = "linux"))]
    pub fn register_process_collector(&self) -> Result<(), MetricsError> {
        tracing::debug!("process metrics are only available on linux, skipping");
        Ok(())
    }

    fn family(&self, name: &str) -> Result<Family, MetricsError> {
        self.families
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| MetricsError::UnknownMetric(name.to_string()))
    }

    /// Add 1 to the series for `label_values`, creating it at 0 first if needed
    pub fn increment_counter(&self, name: &str, label_values: &[&str]) -> Result<(), MetricsError> {
        let Family::Counter(counter) = self.family(name)? else {
            return Err(MetricsError::WrongType {
                name: name.to_string(),
                expected: "counter",
            });
        };

        counter
            .get_metric_with_label_values(label_values)
            .map_err(|e| series_error(name, e))?
            .inc();
        Ok(())
    }

    pub fn observe_histogram(
        &self,
        name: &str,
        label_values: &[&str],
        value: f64,
    ) -> Result<(), MetricsError> {
        let Family::Histogram(histogram) = self.family(name)? else {
            return Err(MetricsError::WrongType {
                name: name.to_string(),
                expected: "histogram",
            });
        };

        if !value.is_finite() || value < 0.0 {
            return Err(MetricsError::InvalidValue {
                name: name.to_string(),
                value,
            });
        }

        histogram
            .get_metric_with_label_values(label_values)
            .map_err(|e| series_error(name, e))?
            .observe(value);
        Ok(())
    }

    /// Export metrics in Prometheus text format
    pub fn render_exposition(&self) -> Result<Exposition, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;

        Ok(Exposition {
            content_type: TEXT_FORMAT,
            body: String::from_utf8(buffer)?,
        })
    }

    pub fn export(&self) -> Result<String, MetricsError> {
        self.render_exposition().map(|exposition| exposition.body)
    }

    /// Current value of a counter series, `None` if it was never observed.
    /// Reads from a gather so it never creates the series.
    pub fn counter_value(&self, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
        self.find_series(name, labels)
            .map(|metric| metric.get_counter().get_value())
    }

    pub fn histogram_snapshot(
        &self,
        name: &str,
        labels: &[(&str, &str)],
    ) -> Option<HistogramSnapshot> {
        self.find_series(name, labels).map(|metric| {
            let histogram = metric.get_histogram();
            HistogramSnapshot {
                count: histogram.get_sample_count(),
                sum: histogram.get_sample_sum(),
            }
        })
    }

    fn find_series(&self, name: &str, labels: &[(&str, &str)]) -> Option<proto::Metric> {
        self.registry
            .gather()
            .iter()
            .find(|family| family.get_name() == name)?
            .get_metric()
            .iter()
            .find(|metric| labels_match(metric.get_label(), labels))
            .cloned()
    }

    /// Get the underlying registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

fn labels_match(pairs: &[proto::LabelPair], wanted: &[(&str, &str)]) -> bool {
    pairs.len() == wanted.len()
        && wanted.iter().all(|(key, value)| {
            pairs
                .iter()
                .any(|pair| pair.get_name() == *key && pair.get_value() == *value)
        })
}

fn registration_error(name: &str, err: prometheus::Error) -> MetricsError {
    match err {
        prometheus::Error::AlreadyReg => MetricsError::AlreadyRegistered(name.to_string()),
        other => MetricsError::Prometheus(other),
    }
}

fn series_error(name: &str, err: prometheus::Error) -> MetricsError {
    match err {
        prometheus::Error::InconsistentCardinality { expect, got } => MetricsError::Cardinality {
            name: name.to_string(),
            expected: expect,
            got,
        },
        other => MetricsError::Prometheus(other),
    }
}
