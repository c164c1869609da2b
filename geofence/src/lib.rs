//! Geofencing engine.
//!
//! Decides whether a coordinate lies inside an approved grazing route and
//! collects every active route that authorizes it. Route geometry is GeoJSON
//! (`Polygon`, `MultiPolygon`, or a `Feature` wrapping either) with
//! `[longitude, latitude]` positions; containment is even-odd with holes, and
//! points on a boundary are outside.
//!
//! A route with unusable geometry never fails the batch: it is reported in
//! [`GeofenceReport::skipped`] and treated as non-containing.

pub mod containment;
pub mod engine;
pub mod error;
pub mod geometry;

pub use containment::{ring_location, RingLocation};
pub use engine::{authorized_routes, point_in_polygon, GeofenceEngine, GeofenceReport, SkippedRoute};
pub use error::GeometryError;
pub use geometry::{Geometry, Polygon, Ring};
