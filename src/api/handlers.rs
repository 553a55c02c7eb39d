//! REST API handlers
//!
//! This module defines the API routes and handlers for the job service.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::jobs::{RegistryError, RegistryStats};
use crate::metrics;
use crate::models::{CreateJobRequest, CreateJobResponse, JobId, JobRecord};

use super::server::AppState;

// ============================================================================
// API Response Types
// ============================================================================

/// Error body returned with every non-2xx response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub jobs: RegistryStats,
}

/// Handler-level failures
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid JSON: expected an object with a start_url field")]
    NotAnObject,

    #[error("start_url is required")]
    MissingStartUrl,

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Failed to encode metrics: {0}")]
    Metrics(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson(_) | Self::NotAnObject | Self::MissingStartUrl => {
                StatusCode::BAD_REQUEST
            }
            Self::JobNotFound(_) => StatusCode::NOT_FOUND,
            Self::Registry(_) | Self::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(prometheus_metrics))
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/{id}", get(get_job))
        .with_state(state)
}

// ============================================================================
// Job Handlers
// ============================================================================

/// Submit a crawl job
///
/// The body is parsed by hand so that any malformed payload is a 400,
/// whatever its content type. Only a JSON object is accepted, and a
/// `start_url` that is empty or whitespace-only counts as missing.
async fn create_job(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let value: serde_json::Value = serde_json::from_slice(&body)?;
    if !value.is_object() {
        return Err(ApiError::NotAnObject);
    }
    let request: CreateJobRequest = serde_json::from_value(value)?;

    if request.start_url.trim().is_empty() {
        return Err(ApiError::MissingStartUrl);
    }

    let record = state.runner.submit(request.start_url).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(CreateJobResponse { job_id: record.id }),
    )
        .into_response())
}

/// List all jobs, oldest first
async fn list_jobs(State(state): State<AppState>) -> Json<Vec<JobRecord>> {
    let mut jobs = state.registry.list().await;
    jobs.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
    Json(jobs)
}

/// Get a specific job
async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobRecord>, ApiError> {
    let Ok(job_id) = id.parse::<JobId>() else {
        return Err(ApiError::JobNotFound(id));
    };

    state
        .registry
        .get(&job_id)
        .await
        .map(Json)
        .ok_or(ApiError::JobNotFound(id))
}

// ============================================================================
// Service Handlers
// ============================================================================

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        jobs: state.registry.stats().await,
    })
}

/// Prometheus scrape endpoint
///
/// The running-jobs gauge is read from the registry on every scrape.
async fn prometheus_metrics(State(state): State<AppState>) -> Result<Response, ApiError> {
    metrics::set_running_jobs(state.registry.stats().await.running);
    let body = metrics::encode_metrics().map_err(|e| ApiError::Metrics(e.to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}

// ============================================================================
// Tests
// ============================================================================
