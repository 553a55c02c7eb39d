use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crawl_jobs::commands::{job_server, resolve_config, ServeParams};
use crawl_jobs::config::{CrawlerKind, LoggingConfig};

#[derive(Parser)]
#[command(
    name = "crawl-jobs",
    version,
    about = "HTTP service for launching and tracking asynchronous crawl jobs",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the job server
    Serve {
        /// TOML configuration file (environment variables otherwise)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Crawl deadline in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Maximum concurrently executing crawls (0 = unbounded)
        #[arg(long)]
        max_concurrent: Option<usize>,

        /// Crawler implementation (simulated, http)
        #[arg(long)]
        crawler: Option<CrawlerKind>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            timeout_secs,
            max_concurrent,
            crawler,
        } => {
            let params = ServeParams {
                config,
                host,
                port,
                timeout_secs,
                max_concurrent,
                crawler,
            };
            let mut config = resolve_config(&params)?;
            if let Some(format) = cli.log_format {
                config.logging.format = format;
            }

            // Initialize tracing/logging
            setup_tracing(&config.logging, cli.verbose)?;

            tracing::info!(
                bind_address = %config.server.bind_address,
                crawler = ?config.crawler.kind,
                timeout_secs = config.jobs.crawl_timeout_secs,
                "Starting serve command"
            );
            job_server(config).await?;
        }
    }

    Ok(())
}

fn setup_tracing(logging: &LoggingConfig, verbose: bool) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            tracing_subscriber::EnvFilter::new("crawl_jobs=debug,tower_http=debug,info")
        } else {
            tracing_subscriber::EnvFilter::new(format!("crawl_jobs={},warn", logging.level))
        }
    });

    match logging.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        "text" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        other => anyhow::bail!("Unknown log format: {other} (expected text or json)"),
    }

    Ok(())
}
