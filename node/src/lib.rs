//! herdguard service node.
//!
//! Loads configuration and seed data, installs logging, builds the
//! verification and geofencing engines over the in-memory registry, and
//! serves the HTTP API until a shutdown signal arrives.

pub mod config;
pub mod error;
pub mod logging;
pub mod service;
pub mod shutdown;

pub use config::ServiceConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use service::HerdguardService;
pub use shutdown::ShutdownController;
