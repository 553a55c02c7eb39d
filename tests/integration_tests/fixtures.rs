//! Shared fixtures for integration tests
//!
//! Provides stub crawlers with controllable timing and outcome, a router
//! factory, and small helpers for driving the router in-process.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use crawl_jobs::api::{AppState, JobServer};
use crawl_jobs::config::Config;
use crawl_jobs::crawler::{CrawlError, Crawler};
use crawl_jobs::models::{JobId, JobRecord};

// ============================================================================
// Stub Crawlers
// ============================================================================

/// Returns a fixed result list after a delay, honouring cancellation
pub struct ScriptedCrawler {
    pub results: Vec<String>,
    pub delay: Duration,
    pub calls: AtomicUsize,
}

impl ScriptedCrawler {
    pub fn new(results: &[&str], delay: Duration) -> Self {
        Self {
            results: results.iter().map(|s| s.to_string()).collect(),
            delay,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Crawler for ScriptedCrawler {
    async fn crawl(&self, _seed: &str, cancel: CancellationToken) -> Result<Vec<String>, CrawlError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::select! {
            _ = tokio::time::sleep(self.delay) => Ok(self.results.clone()),
            _ = cancel.cancelled() => Err(CrawlError::Cancelled),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Fails immediately with an HTTP status error
pub struct FailingCrawler;

#[async_trait]
impl Crawler for FailingCrawler {
    async fn crawl(&self, seed: &str, _cancel: CancellationToken) -> Result<Vec<String>, CrawlError> {
        Err(CrawlError::Status {
            status: 503,
            url: seed.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

// ============================================================================
// Router Helpers
// ============================================================================

/// Config with the given deadline and request logging off
pub fn test_config(timeout_secs: u64) -> Config {
    let mut config = Config::default();
    config.jobs.crawl_timeout_secs = timeout_secs;
    config.server.enable_request_logging = false;
    config
}

/// Build a router and its state around a crawler
pub fn test_app(crawler: Arc<dyn Crawler>, timeout_secs: u64) -> (Router, AppState) {
    let server = JobServer::with_crawler(test_config(timeout_secs), crawler)
        .expect("test config should be valid");
    (server.build_router(), server.state())
}

/// Send a request and decode the JSON body (Null when the body is empty)
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn post_raw(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// Submit a job through the API and return its id
pub async fn submit(app: &Router, start_url: &str) -> String {
    let body = serde_json::json!({ "start_url": start_url }).to_string();
    let (status, json) = post_raw(app, "/jobs", &body).await;
    assert_eq!(status, StatusCode::ACCEPTED, "unexpected response: {json}");
    json["job_id"].as_str().expect("job_id missing").to_string()
}

/// Poll the registry until the job leaves `Running`
pub async fn wait_for_terminal(state: &AppState, id: &str, limit: Duration) -> JobRecord {
    let id: JobId = id.parse().expect("job id should be a UUID");
    let deadline = Instant::now() + limit;

    loop {
        let record = state.registry.get(&id).await.expect("job should exist");
        if record.status.is_terminal() {
            return record;
        }
        assert!(
            Instant::now() < deadline,
            "job {id} still running after {limit:?}"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
