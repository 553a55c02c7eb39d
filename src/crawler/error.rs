//! Crawl error types

use std::time::Duration;
use thiserror::Error;

/// Errors a crawl can end with
///
/// Every variant is stored on the job as its failure description; none of
/// them propagate past the job runner.
#[derive(Error, Debug)]
pub enum CrawlError {
    /// Seed is not an absolute http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// Cancellation signal fired before the crawl completed
    #[error("Crawl cancelled")]
    Cancelled,

    /// Job deadline elapsed before the crawl completed
    #[error("crawl deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),

    /// Crawler task panicked
    #[error("crawler task panicked: {0}")]
    Panicked(String),
}
