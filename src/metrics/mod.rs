//! Prometheus metrics for crawl jobs
//!
//! Tracks job submissions, terminal outcomes, in-flight crawls and crawl
//! duration.
//!
//! # Usage
//!
//! Call `init_metrics()` at application startup to register all metrics.
//! If initialization fails, metrics operations become no-ops.

use prometheus::{
    register_counter, register_counter_vec, register_gauge, register_histogram_vec, Counter,
    CounterVec, Encoder, Gauge, HistogramVec, TextEncoder,
};
use std::sync::OnceLock;

use crate::models::JobStatus;

// ============================================================================
// Metrics Storage
// ============================================================================

/// Container for all job metrics
struct JobMetrics {
    submitted: Counter,
    completed: CounterVec,
    running: Gauge,
    duration: HistogramVec,
}

/// Global storage for job metrics
static JOB_METRICS: OnceLock<JobMetrics> = OnceLock::new();

/// Flag to track if initialization was attempted
static METRICS_INIT_ATTEMPTED: OnceLock<bool> = OnceLock::new();

// ============================================================================
// Initialization
// ============================================================================

/// Initialize all Prometheus metrics
///
/// Safe to call more than once; only the first call registers anything.
///
/// # Example
///
/// ```ignore
/// if let Err(e) = crawl_jobs::metrics::init_metrics() {
///     tracing::warn!("Metrics initialization failed: {}", e);
/// }
/// ```
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if METRICS_INIT_ATTEMPTED.set(true).is_err() {
        return Ok(());
    }

    let metrics = JobMetrics {
        submitted: register_counter!(
            "crawl_jobs_submitted_total",
            "Total number of submitted crawl jobs"
        )?,
        completed: register_counter_vec!(
            "crawl_jobs_completed_total",
            "Total number of crawl jobs reaching a terminal state",
            &["status"]
        )?,
        running: register_gauge!(
            "crawl_jobs_running",
            "Number of crawl jobs currently running"
        )?,
        duration: register_histogram_vec!(
            "crawl_job_duration_seconds",
            "Crawl job duration in seconds",
            &["status"],
            vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]
        )?,
    };

    JOB_METRICS
        .set(metrics)
        .map_err(|_| "Job metrics already initialized")?;

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Record a newly submitted job
pub fn record_job_submitted() {
    if let Some(m) = JOB_METRICS.get() {
        m.submitted.inc();
    }
}

/// Publish the number of jobs currently running
///
/// Set from the registry on each scrape.
pub fn set_running_jobs(count: usize) {
    if let Some(m) = JOB_METRICS.get() {
        m.running.set(count as f64);
    }
}

/// Record a job reaching a terminal state
pub fn record_job_completed(status: JobStatus, duration_secs: f64) {
    let Some(m) = JOB_METRICS.get() else {
        return;
    };

    m.completed.with_label_values(&[status.as_str()]).inc();
    m.duration
        .with_label_values(&[status.as_str()])
        .observe(duration_secs);
}
