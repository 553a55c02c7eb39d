//! HTTP API for submitting and inspecting crawl jobs
//!
//! # Routes
//!
//! ```text
//! POST /jobs        {"start_url": "..."}  -> 202 {"job_id": "..."}
//! GET  /jobs                              -> 200 [JobRecord, ...]
//! GET  /jobs/{id}                         -> 200 JobRecord | 404
//! GET  /health                            -> 200 HealthResponse
//! GET  /metrics                           -> 200 Prometheus text
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use crawl_jobs::api::JobServer;
//! use crawl_jobs::config::Config;
//!
//! let server = JobServer::new(Config::default())?;
//! server.start().await?;
//! ```

pub mod handlers;
pub mod server;

pub use handlers::{create_router, ErrorResponse, HealthResponse};
pub use server::{AppState, JobServer, ServerError, ServerInfo};
