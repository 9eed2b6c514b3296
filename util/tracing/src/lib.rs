//! Tracing setup for the prediction client.
//!
//! Events go to stderr, either human readable or as JSON lines, and can
//! additionally be written to a daily rolling file.

mod config;
mod tracing;

pub use config::{Config, LogFormat};
pub use tracing::{init_tracing_subscriber, ScopeGuard};
