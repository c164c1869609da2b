//! HTTP API for the herdguard service.
//!
//! Provides endpoints for:
//! - Herder enrollment and livestock registration
//! - Face, fingerprint, RFID and full multi-factor verification
//! - Grazing route listing and location authorization
//! - Dashboard statistics
//! - Prometheus metrics

pub mod auth;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod server;

pub use auth::{Actor, ACTOR_HEADER};
pub use error::RpcError;
pub use metrics::{MeteredAuditSink, ServiceMetrics};
pub use server::{router, AppState, RpcServer, RpcSettings};
