pub mod serve;

// Re-export command functions for convenience
pub use serve::{job_server, resolve_config, ServeParams};
