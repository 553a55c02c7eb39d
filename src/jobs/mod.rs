//! Job lifecycle management
//!
//! ```text
//! POST /jobs ──► JobRunner::submit ──► JobRegistry::add   (status = running)
//!                      │
//!                      └─► spawned task ──► Crawler::crawl (under deadline)
//!                                   │
//!                                   └─► JobRegistry::update (finished | failed)
//!
//! GET /jobs, GET /jobs/{id} ──► JobRegistry::list / get   (cloned snapshots)
//! ```
//!
//! The registry is the only state shared between request handlers and
//! background tasks.

pub mod registry;
pub mod runner;

pub use registry::{JobRegistry, RegistryError, RegistryStats};
pub use runner::{JobRunner, DEFAULT_CRAWL_TIMEOUT};
