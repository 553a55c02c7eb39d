//! Configuration management for the crawl job service
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files. Command-line flags are applied on top by the
//! binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Environment variable prefix
const ENV_PREFIX: &str = "CRAWL_JOBS";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Job execution configuration
    pub jobs: JobsConfig,

    /// Crawler configuration
    pub crawler: CrawlerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: SocketAddr,

    /// Enable permissive CORS
    pub enable_cors: bool,

    /// Trace every HTTP request
    pub enable_request_logging: bool,
}

/// Job execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    /// Deadline for a single crawl in seconds
    pub crawl_timeout_secs: u64,

    /// Maximum simultaneously executing crawls (0 = unbounded)
    pub max_concurrent_crawls: usize,
}

/// Which crawler implementation runs the jobs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlerKind {
    #[default]
    Simulated,
    Http,
}

impl std::str::FromStr for CrawlerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulated" => Ok(Self::Simulated),
            "http" => Ok(Self::Http),
            other => anyhow::bail!("unknown crawler kind: {other}"),
        }
    }
}

/// Crawler-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Crawler implementation
    pub kind: CrawlerKind,

    /// How long the simulated crawl takes, in seconds
    pub simulated_delay_secs: u64,

    /// Maximum links reported by the HTTP crawler
    pub max_pages: usize,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,

    /// User agent string
    pub user_agent: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            enable_cors: true,
            enable_request_logging: true,
        }
    }
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            crawl_timeout_secs: 30,
            max_concurrent_crawls: 0,
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            kind: CrawlerKind::Simulated,
            simulated_delay_secs: 5,
            max_pages: 50,
            request_timeout_secs: 10,
            user_agent: format!("crawl-jobs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables keep their defaults; malformed values are an error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(addr) = env_var("BIND_ADDRESS") {
            config.server.bind_address = addr
                .parse()
                .with_context(|| format!("Invalid {ENV_PREFIX}_BIND_ADDRESS: {addr}"))?;
        }

        if let Some(secs) = env_parse("CRAWL_TIMEOUT")? {
            config.jobs.crawl_timeout_secs = secs;
        }

        if let Some(max) = env_parse("MAX_CONCURRENT_CRAWLS")? {
            config.jobs.max_concurrent_crawls = max;
        }

        if let Some(kind) = env_parse("CRAWLER")? {
            config.crawler.kind = kind;
        }

        if let Some(secs) = env_parse("SIMULATED_DELAY")? {
            config.crawler.simulated_delay_secs = secs;
        }

        if let Some(max) = env_parse("MAX_PAGES")? {
            config.crawler.max_pages = max;
        }

        if let Some(secs) = env_parse("REQUEST_TIMEOUT")? {
            config.crawler.request_timeout_secs = secs;
        }

        if let Some(agent) = env_var("USER_AGENT") {
            config.crawler.user_agent = agent;
        }

        if let Some(level) = env_var("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(format) = env_var("LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.jobs.crawl_timeout_secs == 0 {
            anyhow::bail!("crawl_timeout_secs must be greater than 0");
        }

        if self.crawler.max_pages == 0 {
            anyhow::bail!("max_pages must be greater than 0");
        }

        if self.crawler.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("log format must be 'text' or 'json', got '{}'", self.logging.format);
        }

        Ok(())
    }

    /// Get the crawl deadline as Duration
    #[must_use]
    pub fn crawl_timeout(&self) -> Duration {
        Duration::from_secs(self.jobs.crawl_timeout_secs)
    }

    /// Concurrency cap for crawls, if any
    #[must_use]
    pub fn max_concurrent_crawls(&self) -> Option<usize> {
        match self.jobs.max_concurrent_crawls {
            0 => None,
            n => Some(n),
        }
    }
}

impl CrawlerConfig {
    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get simulated crawl delay as Duration
    #[must_use]
    pub fn simulated_delay(&self) -> Duration {
        Duration::from_secs(self.simulated_delay_secs)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{name}"))
        .ok()
        .filter(|v| !v.trim().is_empty())
}

fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_var(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("Invalid {ENV_PREFIX}_{name} '{raw}': {e}"))
        })
        .transpose()
}
