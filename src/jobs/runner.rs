//! Background job execution
//!
//! The runner owns the path from a submitted seed URL to a terminal job
//! record. Each job gets its own task; the crawl itself runs in a nested task
//! so that a panicking or unresponsive crawler still ends in a `Failed`
//! record once the deadline elapses.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::crawler::{CrawlError, Crawler};
use crate::metrics;
use crate::models::{JobId, JobRecord};

use super::registry::{JobRegistry, RegistryError};

/// Default deadline for a single crawl
pub const DEFAULT_CRAWL_TIMEOUT: Duration = Duration::from_secs(30);

/// Launches crawl jobs and records their outcome in the registry
#[derive(Clone)]
pub struct JobRunner {
    registry: Arc<JobRegistry>,
    crawler: Arc<dyn Crawler>,
    timeout: Duration,

    /// Caps concurrently executing crawls when set
    permits: Option<Arc<Semaphore>>,
}

impl JobRunner {
    /// Create a runner with no concurrency cap
    pub fn new(registry: Arc<JobRegistry>, crawler: Arc<dyn Crawler>, timeout: Duration) -> Self {
        Self {
            registry,
            crawler,
            timeout,
            permits: None,
        }
    }

    /// Allow at most `max` crawls to execute at once
    ///
    /// Jobs beyond the cap stay `Running` until a slot frees up; their
    /// deadline starts when their crawl does.
    #[must_use]
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.permits = Some(Arc::new(Semaphore::new(max.max(1))));
        self
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Register a new running job and start its crawl in the background
    ///
    /// Returns as soon as the job is visible in the registry.
    pub async fn submit(&self, start_url: impl Into<String>) -> Result<JobRecord, RegistryError> {
        let record = JobRecord::new(start_url);
        self.registry.add(record.clone()).await?;
        metrics::record_job_submitted();

        tracing::info!(
            job_id = %record.id,
            start_url = %record.start_url,
            crawler = self.crawler.name(),
            "Job submitted"
        );

        self.spawn(record.id, record.start_url.clone());
        Ok(record)
    }

    /// Run a registered job on its own task
    pub fn spawn(&self, id: JobId, start_url: String) -> JoinHandle<()> {
        let runner = self.clone();
        tokio::spawn(async move { runner.run(id, start_url).await })
    }

    /// Run a registered job to completion and record its outcome
    pub async fn run(&self, id: JobId, start_url: String) {
        let _permit = match &self.permits {
            Some(permits) => Arc::clone(permits).acquire_owned().await.ok(),
            None => None,
        };

        tracing::debug!(job_id = %id, start_url = %start_url, "Crawl started");
        let outcome = self.execute(&start_url).await;
        self.complete(id, outcome).await;
    }

    async fn execute(&self, start_url: &str) -> Result<Vec<String>, CrawlError> {
        let cancel = CancellationToken::new();
        let _cancel_on_exit = cancel.clone().drop_guard();

        let crawler = Arc::clone(&self.crawler);
        let seed = start_url.to_string();
        let token = cancel.clone();
        let mut task = tokio::spawn(async move { crawler.crawl(&seed, token).await });

        tokio::select! {
            joined = &mut task => joined.unwrap_or_else(|e| Err(join_failure(e))),
            _ = tokio::time::sleep(self.timeout) => {
                cancel.cancel();
                task.abort();
                Err(CrawlError::DeadlineExceeded(self.timeout))
            }
        }
    }

    async fn complete(&self, id: JobId, outcome: Result<Vec<String>, CrawlError>) {
        let Some(current) = self.registry.get(&id).await else {
            tracing::warn!(job_id = %id, "Job vanished before completion, discarding result");
            return;
        };

        let record = match outcome {
            Ok(results) => {
                tracing::info!(job_id = %id, results = results.len(), "Job finished");
                current.finish(results)
            }
            Err(e) => {
                tracing::warn!(job_id = %id, error = %e, "Job failed");
                current.fail(e.to_string())
            }
        };

        let status = record.status;
        let elapsed = record
            .duration()
            .and_then(|d| d.to_std().ok())
            .unwrap_or_default();

        match self.registry.update(record).await {
            Ok(()) => metrics::record_job_completed(status, elapsed.as_secs_f64()),
            Err(e) => tracing::warn!(job_id = %id, error = %e, "Discarding job result"),
        }
    }
}

impl std::fmt::Debug for JobRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRunner")
            .field("crawler", &self.crawler.name())
            .field("timeout", &self.timeout)
            .field("max_concurrent", &self.permits.is_some())
            .finish()
    }
}

fn join_failure(err: JoinError) -> CrawlError {
    if err.is_panic() {
        CrawlError::Panicked(panic_message(err.into_panic()))
    } else {
        CrawlError::Cancelled
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
