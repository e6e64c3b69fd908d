use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all Cover Studio metrics
const PREFIX: &str = "cover_studio";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.01, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Upload Metrics
    pub static ref UPLOADS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_uploads_total"), "Audio uploads by outcome"),
        &["outcome"]
    ).expect("Failed to create uploads_total metric");

    // Model Call Metrics
    pub static ref ANALYSIS_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_analysis_requests_total"), "Audio analysis calls by outcome"),
        &["outcome"]
    ).expect("Failed to create analysis_requests_total metric");

    pub static ref COVER_GENERATIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_cover_generations_total"), "Cover image generation calls"),
        &["style", "outcome"]
    ).expect("Failed to create cover_generations_total metric");

    // Process Metrics
    pub static ref PROCESS_MEMORY_BYTES: Gauge = Gauge::new(
        format!("{PREFIX}_process_memory_bytes"),
        "Process memory usage in bytes"
    ).expect("Failed to create process_memory_bytes metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(UPLOADS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(ANALYSIS_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(COVER_GENERATIONS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(PROCESS_MEMORY_BYTES.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Map a request path to a bounded label value.
pub fn categorize_endpoint(path: &str) -> &'static str {
    match path {
        "/analyze" => "analyze",
        "/generate-covers" => "generate_covers",
        "/health" => "health",
        _ => "static",
    }
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let endpoint = categorize_endpoint(path);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, endpoint])
        .observe(duration.as_secs_f64());
}

/// Record the outcome of receiving an upload
pub fn record_upload(outcome: &str) {
    UPLOADS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Record the outcome of an analysis call
pub fn record_analysis(outcome: &str) {
    ANALYSIS_REQUESTS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Record the outcome of a single cover generation call
pub fn record_cover_generation(style: &str, outcome: &str) {
    COVER_GENERATIONS_TOTAL
        .with_label_values(&[style, outcome])
        .inc();
}

/// Update process memory usage
pub fn update_memory_usage() {
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            for line in status.lines() {
                if line.starts_with("VmRSS:") {
                    // RSS in kB
                    if let Some(kb_str) = line.split_whitespace().nth(1) {
                        if let Ok(kb) = kb_str.parse::<f64>() {
                            PROCESS_MEMORY_BYTES.set(kb * 1024.0);
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    update_memory_usage();

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_default();
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
