//! In-memory storage backend for herdguard.
//!
//! Implements every trait from `herdguard-store` over a single
//! [`std::sync::RwLock`], so any number of verification requests can read the
//! corpus concurrently while enrollment writes serialize. Seed data (routes and
//! optional demo herders) is loaded from JSON; a default seed ships with the
//! crate.

pub mod registry;
pub mod seed;

pub use registry::MemoryRegistry;
pub use seed::{SeedFile, SeedHerder, SeedLivestock, SeedRoute, SeedSummary, DEFAULT_SEED};
