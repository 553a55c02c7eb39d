//! crawl-jobs - asynchronous crawl job service
//!
//! Accepts crawl requests over HTTP, runs each one as a background task under
//! a deadline, and serves job status and results from an in-memory registry.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`] - Job records, identifiers and API payloads
//! - [`jobs`] - Job registry and background runner
//! - [`crawler`] - Crawl capability trait and implementations
//! - [`api`] - HTTP routes and server lifecycle
//! - [`config`] - Configuration management and settings
//! - [`metrics`] - Prometheus metrics
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use crawl_jobs::crawler::SimulatedCrawler;
//! use crawl_jobs::jobs::{JobRegistry, JobRunner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = Arc::new(JobRegistry::new());
//!     let crawler = Arc::new(SimulatedCrawler::default());
//!     let runner = JobRunner::new(registry.clone(), crawler, Duration::from_secs(30));
//!
//!     let job = runner.submit("http://example.com").await?;
//!     println!("submitted {}", job.id);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod commands;
pub mod config;
pub mod crawler;
pub mod jobs;
pub mod metrics;
pub mod models;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::api::JobServer;
    pub use crate::config::Config;
    pub use crate::crawler::{CrawlError, Crawler};
    pub use crate::jobs::{JobRegistry, JobRunner};
    pub use crate::models::{JobId, JobRecord, JobStatus};
}

// Direct re-exports for convenience
pub use models::{JobId, JobRecord, JobStatus};
