//! Integration tests for the crawl job service
//!
//! - `api_test` - Request validation and response shapes
//! - `lifecycle_test` - Jobs from submission to terminal state
//! - `concurrency_test` - Parallel submissions and reads
//! - `e2e_test` - Full server over TCP

pub mod fixtures;

mod e2e_test;
mod lifecycle_test;
