//! Abstract storage traits for herdguard.
//!
//! The matching and geofencing engines only ever see these traits. Backends
//! (the in-memory registry, a database adapter, test nullables) implement
//! them; every trait is `Send + Sync` because one store instance serves many
//! concurrent requests.

pub mod audit;
pub mod enrollment;
pub mod error;
pub mod route;
pub mod tag;

pub use audit::{AuditLog, AuditSink};
pub use enrollment::{EnrollmentStore, NewSubject, NewTag, SubjectRegistry};
pub use error::StoreError;
pub use route::RouteStore;
pub use tag::TagStore;
