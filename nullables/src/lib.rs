//! Nullable infrastructure for deterministic testing.
//!
//! External collaborators (clock, stores, audit sink) are abstracted behind
//! traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Simulate an unreachable backend on demand
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod store;

pub use clock::NullClock;
pub use store::{FailingAuditSink, RecordingAuditSink, UnavailableStore};
