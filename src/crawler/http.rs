//! HTTP link crawler
//!
//! Fetches the seed page and returns the same-host links it contains:
//! - relative links are resolved against the seed
//! - fragments are dropped and duplicates removed, keeping document order
//! - the seed itself is not reported
//! - at most `max_pages` links are returned

use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tokio_util::sync::CancellationToken;
use url::Url;

use super::{CrawlError, Crawler};
use crate::config::CrawlerConfig;

/// Crawler that collects links from a live page
#[derive(Debug, Clone)]
pub struct HttpCrawler {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Maximum number of links reported per crawl
    max_pages: usize,
}

impl HttpCrawler {
    /// Create a crawler with explicit settings
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::Http` if the HTTP client cannot be created
    pub fn new(user_agent: &str, timeout: Duration, max_pages: usize) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .build()?;

        Ok(Self { client, max_pages })
    }

    /// Create a crawler from the `[crawler]` configuration section
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        Self::new(&config.user_agent, config.request_timeout(), config.max_pages)
    }

    async fn fetch(&self, url: &Url) -> Result<String, CrawlError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(CrawlError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl Crawler for HttpCrawler {
    async fn crawl(&self, seed: &str, cancel: CancellationToken) -> Result<Vec<String>, CrawlError> {
        let base = parse_seed(seed)?;

        let body = tokio::select! {
            body = self.fetch(&base) => body?,
            _ = cancel.cancelled() => return Err(CrawlError::Cancelled),
        };

        let links = extract_links(&body, &base, self.max_pages);
        tracing::debug!(seed = %base, links = links.len(), "Seed page crawled");

        Ok(links)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Parse a seed into an absolute http(s) URL
pub fn parse_seed(seed: &str) -> Result<Url, CrawlError> {
    let url = Url::parse(seed.trim()).map_err(|e| CrawlError::InvalidUrl(format!("{seed}: {e}")))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(CrawlError::InvalidUrl(seed.to_string())),
    }
}

/// Extract same-host links from an HTML document
pub fn extract_links(html: &str, base: &Url, limit: usize) -> Vec<String> {
    static ANCHOR: OnceLock<Selector> = OnceLock::new();
    let anchor = ANCHOR.get_or_init(|| Selector::parse("a[href]").expect("Invalid selector"));

    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut base_key = base.clone();
    base_key.set_fragment(None);
    seen.insert(base_key.to_string());

    let mut links = Vec::new();
    for href in document.select(anchor).filter_map(|a| a.value().attr("href")) {
        if links.len() >= limit {
            break;
        }

        let Ok(mut url) = base.join(href.trim()) else {
            continue;
        };
        if !matches!(url.scheme(), "http" | "https") || url.host_str() != base.host_str() {
            continue;
        }
        url.set_fragment(None);

        let url = url.to_string();
        if seen.insert(url.clone()) {
            links.push(url);
        }
    }

    links
}
