//! `serve` command: run the job server until Ctrl+C

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::api::JobServer;
use crate::config::{Config, CrawlerKind};

/// Command-line overrides for the job server
#[derive(Debug, Clone, Default)]
pub struct ServeParams {
    /// TOML config file; environment variables are used when absent
    pub config: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub timeout_secs: Option<u64>,
    pub max_concurrent: Option<usize>,
    pub crawler: Option<CrawlerKind>,
}

/// Resolve the effective configuration: file or environment, then flags
pub fn resolve_config(params: &ServeParams) -> Result<Config> {
    let mut config = match &params.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    if params.host.is_some() || params.port.is_some() {
        let current = config.server.bind_address;
        let ip = match &params.host {
            Some(host) => host
                .trim_start_matches('[')
                .trim_end_matches(']')
                .parse::<IpAddr>()
                .with_context(|| format!("Invalid host: {host}"))?,
            None => current.ip(),
        };
        let port = params.port.unwrap_or(current.port());

        config.server.bind_address = SocketAddr::new(ip, port);
    }

    if let Some(secs) = params.timeout_secs {
        config.jobs.crawl_timeout_secs = secs;
    }

    if let Some(max) = params.max_concurrent {
        config.jobs.max_concurrent_crawls = max;
    }

    if let Some(kind) = params.crawler {
        config.crawler.kind = kind;
    }

    config.validate()?;
    Ok(config)
}

/// Start the job server with a resolved configuration
pub async fn job_server(config: Config) -> Result<()> {
    let bind_address = config.server.bind_address;

    let server = JobServer::new(config)?;

    println!("{}", server.info().display());
    println!();
    println!("API Endpoints:");
    println!("  POST /jobs        - Submit a crawl job");
    println!("  GET  /jobs        - List all jobs");
    println!("  GET  /jobs/{{id}}   - Get job by ID");
    println!("  GET  /health      - Health check");
    println!("  GET  /metrics     - Prometheus metrics endpoint");
    println!();
    println!("Job server listening on http://{bind_address}");
    println!("Press Ctrl+C to stop.\n");

    server
        .start_with_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                }
                Err(e) => {
                    tracing::error!("Failed to wait for Ctrl+C: {}", e);
                }
            }
        })
        .await?;

    println!("Job server stopped.");
    Ok(())
}
