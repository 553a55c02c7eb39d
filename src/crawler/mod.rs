//! Crawl capability consumed by the job runner
//!
//! A crawl takes a seed URL and a cancellation token and eventually returns
//! a list of discovered URLs or an error. The runner only depends on the
//! [`Crawler`] trait; two implementations ship with the crate:
//!
//! - [`SimulatedCrawler`] waits a fixed delay and returns two derived pages
//! - [`HttpCrawler`] fetches the seed page and collects its same-host links

pub mod error;
pub mod http;
pub mod simulated;

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::{CrawlerConfig, CrawlerKind};

pub use error::CrawlError;
pub use http::HttpCrawler;
pub use simulated::SimulatedCrawler;

/// A long-running crawl operation
#[async_trait]
pub trait Crawler: Send + Sync {
    /// Crawl starting at `seed`, giving up with [`CrawlError::Cancelled`]
    /// once `cancel` fires
    async fn crawl(&self, seed: &str, cancel: CancellationToken) -> Result<Vec<String>, CrawlError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Build the crawler selected by configuration
pub fn from_config(config: &CrawlerConfig) -> Result<Arc<dyn Crawler>, CrawlError> {
    let crawler: Arc<dyn Crawler> = match config.kind {
        CrawlerKind::Simulated => Arc::new(SimulatedCrawler::new(config.simulated_delay())),
        CrawlerKind::Http => Arc::new(HttpCrawler::from_config(config)?),
    };

    tracing::debug!(crawler = crawler.name(), "Crawler configured");
    Ok(crawler)
}
