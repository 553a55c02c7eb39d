//! Job lifecycle tests
//!
//! Follow jobs from submission to their terminal state through the API.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use crawl_jobs::crawler::SimulatedCrawler;
use crawl_jobs::models::JobStatus;

use super::fixtures::{get, submit, test_app, wait_for_terminal, FailingCrawler, ScriptedCrawler};

#[tokio::test]
async fn test_simulated_job_finishes_with_results() {
    let (app, state) = test_app(
        Arc::new(SimulatedCrawler::new(Duration::from_millis(50))),
        5,
    );

    let id = submit(&app, "http://a.test").await;
    wait_for_terminal(&state, &id, Duration::from_secs(3)).await;

    let (status, job) = get(&app, &format!("/jobs/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(job["status"], "finished");
    assert_eq!(
        job["results"],
        serde_json::json!(["http://a.test/page1", "http://a.test/page2"])
    );
    assert!(job.get("error").is_none());
    assert!(job["end_time"].is_string());
}

#[tokio::test]
async fn test_deadline_fails_job() {
    let (app, state) = test_app(
        Arc::new(SimulatedCrawler::new(Duration::from_secs(5))),
        1,
    );

    let started = Instant::now();
    let id = submit(&app, "http://example.test").await;
    let record = wait_for_terminal(&state, &id, Duration::from_secs(4)).await;

    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(record.status, JobStatus::Failed);
    assert!(record.results.is_none());

    let (_, job) = get(&app, &format!("/jobs/{id}")).await;
    assert_eq!(job["status"], "failed");
    assert!(job["error"]
        .as_str()
        .unwrap()
        .contains("deadline exceeded"));
}

#[tokio::test]
async fn test_crawler_error_is_recorded() {
    let (app, state) = test_app(Arc::new(FailingCrawler), 5);

    let id = submit(&app, "http://down.test").await;
    let record = wait_for_terminal(&state, &id, Duration::from_secs(2)).await;

    assert_eq!(record.status, JobStatus::Failed);
    let error = record.error.expect("failed job should carry an error");
    assert!(error.contains("503"));
    assert!(error.contains("http://down.test"));
}

#[tokio::test]
async fn test_terminal_job_is_stable() {
    let crawler = Arc::new(ScriptedCrawler::new(&["http://a.test/x"], Duration::from_millis(10)));
    let (app, state) = test_app(crawler.clone(), 5);

    let id = submit(&app, "http://a.test").await;
    wait_for_terminal(&state, &id, Duration::from_secs(2)).await;

    let (_, first) = get(&app, &format!("/jobs/{id}")).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    let (_, second) = get(&app, &format!("/jobs/{id}")).await;

    assert_eq!(first, second);
    assert_eq!(crawler.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_end_time_not_before_start_time() {
    let (app, state) = test_app(
        Arc::new(ScriptedCrawler::new(&[], Duration::ZERO)),
        5,
    );

    let id = submit(&app, "http://a.test").await;
    let record = wait_for_terminal(&state, &id, Duration::from_secs(2)).await;

    assert_eq!(record.status, JobStatus::Finished);
    assert_eq!(record.results, Some(vec![]));
    let end_time = record.end_time.expect("terminal job should have an end time");
    assert!(end_time >= record.start_time);
    assert!(record.is_consistent());
}

#[tokio::test]
async fn test_health_counts_outcomes() {
    let (app, state) = test_app(Arc::new(FailingCrawler), 5);

    let id = submit(&app, "http://down.test").await;
    wait_for_terminal(&state, &id, Duration::from_secs(2)).await;

    let (_, body) = get(&app, "/health").await;
    assert_eq!(body["jobs"]["total"], 1);
    assert_eq!(body["jobs"]["failed"], 1);
    assert_eq!(body["jobs"]["running"], 0);
}
