use observability_app::services::metrics::{MetricsError, MetricsRegistry};
use std::sync::Arc;
use std::thread;

use crate::common::{find_line, request_count, validate_exposition, LATENCY, REQUESTS};

// =============================================================================
// INTEGRATION TESTS - METRICS REGISTRY
// =============================================================================

#[test]
fn test_metrics_registry_initialization() {
    let metrics = MetricsRegistry::new();
    assert!(metrics.is_ok(), "Failed to initialize metrics registry");
}

#[test]
fn test_http_metrics_recording() {
    let metrics = MetricsRegistry::new().unwrap();

    metrics
        .increment_counter(REQUESTS, &["/api/ping", "GET", "200"])
        .unwrap();

    let output = metrics.export().unwrap();
    assert!(output.contains("http_requests_total"));
    assert!(output.contains("method=\"GET\""));
    assert!(output.contains("path=\"/api/ping\""));
    assert!(output.contains("status=\"200\""));
}

#[test]
fn test_histogram_buckets() {
    let metrics = MetricsRegistry::new().unwrap();

    for duration in [0.004, 0.02, 0.3, 2.0, 12.0] {
        metrics.observe_histogram(LATENCY, &["/"], duration).unwrap();
    }

    let output = metrics.export().unwrap();

    assert!(output.contains("le=\"0.005\""));
    assert!(output.contains("le=\"0.1\""));
    assert!(output.contains("le=\"1\""));
    assert!(output.contains("le=\"10\""));
    assert!(output.contains("le=\"+Inf\""));
    assert!(output.contains("http_request_duration_seconds_sum{path=\"/\"}"));
    assert!(output.contains("http_request_duration_seconds_count{path=\"/\"} 5"));

    // 12s only lands in +Inf, buckets are cumulative
    let inf = find_line(&output, "http_request_duration_seconds_bucket", &["le=\"+Inf\""]).unwrap();
    assert!(inf.ends_with(" 5"));
    let ten = find_line(&output, "http_request_duration_seconds_bucket", &["le=\"10\""]).unwrap();
    assert!(ten.ends_with(" 4"));
}

#[test]
fn test_metrics_export_format() {
    let metrics = MetricsRegistry::new().unwrap();

    metrics
        .increment_counter(REQUESTS, &["/healthz", "GET", "200"])
        .unwrap();
    metrics.observe_histogram(LATENCY, &["/healthz"], 0.002).unwrap();

    let exposition = metrics.render_exposition().unwrap();
    assert_eq!(exposition.content_type, "text/plain; version=0.0.4");

    let output = exposition.body;
    assert!(output.contains("# HELP http_requests_total Total HTTP requests"));
    assert!(output.contains("# TYPE http_requests_total counter"));
    assert!(output.contains("# HELP http_request_duration_seconds Request latency"));
    assert!(output.contains("# TYPE http_request_duration_seconds histogram"));
    assert_eq!(validate_exposition(&output), Ok(()));
}

#[test]
fn test_multiple_label_combinations() {
    let metrics = MetricsRegistry::new().unwrap();

    metrics.increment_counter(REQUESTS, &["/", "GET", "200"]).unwrap();
    metrics.increment_counter(REQUESTS, &["/", "POST", "405"]).unwrap();
    metrics.increment_counter(REQUESTS, &["/nope", "GET", "404"]).unwrap();

    assert_eq!(request_count(&metrics, "/", "GET", "200"), 1.0);
    assert_eq!(request_count(&metrics, "/", "POST", "405"), 1.0);
    assert_eq!(request_count(&metrics, "/nope", "GET", "404"), 1.0);
    assert_eq!(request_count(&metrics, "/nope", "GET", "200"), 0.0);
}

#[test]
fn test_counter_increment() {
    let metrics = MetricsRegistry::new().unwrap();

    for _ in 0..3 {
        metrics
            .increment_counter(REQUESTS, &["/api/uptime", "GET", "200"])
            .unwrap();
    }

    let output = metrics.export().unwrap();
    let metric_line = find_line(&output, REQUESTS, &["/api/uptime", "GET", "200"])
        .expect("Metric not found");

    assert!(metric_line.ends_with(" 3"));
}

#[test]
fn test_rescrape_is_stable() {
    let metrics = MetricsRegistry::new().unwrap();
    metrics.increment_counter(REQUESTS, &["/", "GET", "200"]).unwrap();
    metrics.observe_histogram(LATENCY, &["/"], 0.01).unwrap();

    let first = metrics.export().unwrap();
    let second = metrics.export().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_separate_registries_are_isolated() {
    let a = MetricsRegistry::new().unwrap();
    let b = MetricsRegistry::new().unwrap();

    a.increment_counter(REQUESTS, &["/", "GET", "200"]).unwrap();

    assert_eq!(request_count(&a, "/", "GET", "200"), 1.0);
    assert_eq!(request_count(&b, "/", "GET", "200"), 0.0);
}

#[test]
fn test_custom_families() {
    let metrics = MetricsRegistry::empty();
    metrics
        .register_counter("jobs_total", "Jobs processed", &["queue"])
        .unwrap();
    metrics
        .register_histogram("job_seconds", "Job duration", &["queue"], Some(vec![0.5, 1.0]))
        .unwrap();

    metrics.increment_counter("jobs_total", &["default"]).unwrap();
    metrics.observe_histogram("job_seconds", &["default"], 0.75).unwrap();

    let output = metrics.export().unwrap();
    assert!(output.contains("jobs_total{queue=\"default\"} 1"));
    assert!(output.contains("job_seconds_bucket{queue=\"default\",le=\"0.5\"} 0"));
    assert!(output.contains("job_seconds_bucket{queue=\"default\",le=\"1\"} 1"));
    assert!(!output.contains("http_requests_total"));

    assert!(matches!(
        metrics.increment_counter(REQUESTS, &["/", "GET", "200"]),
        Err(MetricsError::UnknownMetric(_))
    ));
}

#[test]
fn test_concurrent_increments_are_not_lost() {
    let metrics: Arc<MetricsRegistry> = MetricsRegistry::new().unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let metrics = metrics.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    // Threads race to create the same fresh series
                    let path = format!("/p/{}", i % 10);
                    metrics.increment_counter(REQUESTS, &[path.as_str(), "GET", "200"]).unwrap();
                    metrics.observe_histogram(LATENCY, &[path.as_str()], 0.001).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for i in 0..10 {
        let path = format!("/p/{}", i);
        assert_eq!(request_count(&metrics, &path, "GET", "200"), 400.0);
    }

    let output = metrics.export().unwrap();
    let series = output
        .lines()
        .filter(|line| line.starts_with("http_requests_total{"))
        .count();
    assert_eq!(series, 10, "each label set must map to exactly one series");
}

#[cfg(target_os = "linux")]
#[test]
fn test_process_collector() {
    let metrics = MetricsRegistry::new().unwrap();
    metrics.register_process_collector().unwrap();

    let output = metrics.export().unwrap();
    assert!(output.contains("process_start_time_seconds"));
    assert!(output.contains("process_resident_memory_bytes"));

    assert!(matches!(
        metrics.register_process_collector(),
        Err(MetricsError::AlreadyRegistered(_))
    ));
}
