//! Simulated crawler

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{CrawlError, Crawler};

/// Default simulated crawl duration
pub const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_secs(5);

/// Crawler that waits `delay` and then reports `seed/page1` and `seed/page2`
#[derive(Debug, Clone)]
pub struct SimulatedCrawler {
    delay: Duration,
}

impl SimulatedCrawler {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedCrawler {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATED_DELAY)
    }
}

#[async_trait]
impl Crawler for SimulatedCrawler {
    async fn crawl(&self, seed: &str, cancel: CancellationToken) -> Result<Vec<String>, CrawlError> {
        tokio::select! {
            _ = tokio::time::sleep(self.delay) => {
                Ok(vec![format!("{seed}/page1"), format!("{seed}/page2")])
            }
            _ = cancel.cancelled() => Err(CrawlError::Cancelled),
        }
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
