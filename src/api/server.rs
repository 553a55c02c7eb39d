//! Job server implementation
//!
//! Wires configuration, crawler, registry and runner together and serves
//! the REST API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::crawler::{self, CrawlError, Crawler};
use crate::jobs::{JobRegistry, JobRunner};
use crate::metrics;

use super::handlers::create_router;

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Job registry
    pub registry: Arc<JobRegistry>,

    /// Background job runner
    pub runner: JobRunner,

    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Build state around an existing runner
    pub fn new(runner: JobRunner) -> Self {
        Self {
            registry: Arc::clone(runner.registry()),
            runner,
            start_time: Instant::now(),
        }
    }
}

// ============================================================================
// Job Server
// ============================================================================

/// Main HTTP server
pub struct JobServer {
    config: Config,
    state: AppState,
}

impl JobServer {
    /// Create a server using the crawler selected by configuration
    pub fn new(config: Config) -> Result<Self, ServerError> {
        let crawler = crawler::from_config(&config.crawler)?;
        Self::with_crawler(config, crawler)
    }

    /// Create a server around a specific crawler
    pub fn with_crawler(config: Config, crawler: Arc<dyn Crawler>) -> Result<Self, ServerError> {
        config
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        if let Err(e) = metrics::init_metrics() {
            tracing::warn!(error = %e, "Metrics initialization failed, continuing without metrics");
        }

        let registry = Arc::new(JobRegistry::new());
        let mut runner = JobRunner::new(registry, crawler, config.crawl_timeout());
        if let Some(max) = config.max_concurrent_crawls() {
            runner = runner.with_max_concurrent(max);
        }

        Ok(Self {
            state: AppState::new(runner),
            config,
        })
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes and configured layers
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.config.server.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.server.enable_request_logging {
            router = router.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));
        }

        router
    }

    /// Start the server on the configured address
    pub async fn start(&self) -> Result<(), ServerError> {
        self.start_with_shutdown(std::future::pending()).await
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let addr = self.config.server.bind_address;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve(listener, shutdown_signal).await
    }

    /// Serve on an already bound listener
    pub async fn serve(
        &self,
        listener: TcpListener,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();

        match listener.local_addr() {
            Ok(addr) => tracing::info!("Starting job server on {}", addr),
            Err(_) => tracing::info!("Starting job server"),
        }

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(ServerError::Serve)?;

        tracing::info!("Job server shutdown complete");
        Ok(())
    }

    /// Get server info
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            bind_address: self.config.server.bind_address,
            crawler: self.config.crawler.kind,
            crawl_timeout_secs: self.config.jobs.crawl_timeout_secs,
            max_concurrent_crawls: self.config.max_concurrent_crawls(),
            cors_enabled: self.config.server.enable_cors,
            request_logging_enabled: self.config.server.enable_request_logging,
        }
    }
}

/// Server information
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub bind_address: SocketAddr,
    pub crawler: crate::config::CrawlerKind,
    pub crawl_timeout_secs: u64,
    pub max_concurrent_crawls: Option<usize>,
    pub cors_enabled: bool,
    pub request_logging_enabled: bool,
}

impl ServerInfo {
    /// Format as display string
    pub fn display(&self) -> String {
        format!(
            "Crawl Job Server\n\
             {:-<40}\n\
             Bind Address: {}\n\
             Crawler: {:?}\n\
             Crawl Timeout: {}s\n\
             Max Concurrent Crawls: {}\n\
             CORS: {}\n\
             Request Logging: {}",
            "",
            self.bind_address,
            self.crawler,
            self.crawl_timeout_secs,
            self.max_concurrent_crawls
                .map_or_else(|| "unbounded".to_string(), |n| n.to_string()),
            if self.cors_enabled { "enabled" } else { "disabled" },
            if self.request_logging_enabled { "enabled" } else { "disabled" }
        )
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Crawler could not be constructed
    #[error("Initialization error: {0}")]
    Init(#[from] CrawlError),

    /// Failed to bind to address
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Server error
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
