//! Route authorization.

use crate::error::GeometryError;
use crate::geometry::Geometry;
use herdguard_store::{RouteStore, StoreError};
use herdguard_types::{Coordinate, Route, RouteId};
use std::sync::Arc;

/// Is `(lat, lng)` strictly inside `geometry`?
///
/// The point is tested as `(lng, lat)` to match GeoJSON axis order.
pub fn point_in_polygon(
    lat: f64,
    lng: f64,
    geometry: &serde_json::Value,
) -> Result<bool, GeometryError> {
    let parsed = Geometry::from_geojson(geometry)?;
    Ok(parsed.contains(Coordinate::new(lat, lng).as_lng_lat()))
}

/// A route left out of evaluation because its geometry is unusable.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedRoute {
    pub route: RouteId,
    pub name: String,
    pub reason: GeometryError,
}

/// Outcome of testing one coordinate against a route set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeofenceReport {
    /// Active routes that were considered, skipped ones included.
    pub evaluated: usize,
    /// Every active route containing the point, in route-set order.
    pub authorized: Vec<Route>,
    pub skipped: Vec<SkippedRoute>,
}

impl GeofenceReport {
    pub fn is_authorized(&self) -> bool {
        !self.authorized.is_empty()
    }
}

/// Test `(lat, lng)` against every active route in `routes`.
///
/// It does not stop at the first hit: overlapping corridors are all returned.
/// Inactive routes are ignored even when they contain the point.
pub fn authorized_routes(lat: f64, lng: f64, routes: &[Route]) -> GeofenceReport {
    let point = Coordinate::new(lat, lng).as_lng_lat();
    let mut report = GeofenceReport::default();
    for route in routes.iter().filter(|r| r.status.is_active()) {
        report.evaluated += 1;
        match Geometry::from_geojson(&route.geometry) {
            Ok(geometry) => {
                if geometry.contains(point) {
                    report.authorized.push(route.clone());
                }
            }
            Err(reason) => {
                tracing::warn!(route = %route.id, name = %route.name, %reason, "skipping route with malformed geometry");
                report.skipped.push(SkippedRoute {
                    route: route.id,
                    name: route.name.clone(),
                    reason,
                });
            }
        }
    }
    tracing::debug!(
        lat,
        lng,
        evaluated = report.evaluated,
        authorized = report.authorized.len(),
        skipped = report.skipped.len(),
        "location evaluated"
    );
    report
}

/// Store-backed geofencing. Re-reads the active route set on every call.
pub struct GeofenceEngine {
    routes: Arc<dyn RouteStore>,
}

impl GeofenceEngine {
    pub fn new(routes: Arc<dyn RouteStore>) -> Self {
        Self { routes }
    }

    /// Check a coordinate against all active routes, or only against `only`
    /// when given. An unknown or inactive `only` yields an empty report.
    pub fn check(
        &self,
        coordinate: Coordinate,
        only: Option<RouteId>,
    ) -> Result<GeofenceReport, StoreError> {
        let mut routes = self.routes.active_routes()?;
        if let Some(id) = only {
            routes.retain(|r| r.id == id);
        }
        Ok(authorized_routes(
            coordinate.latitude,
            coordinate.longitude,
            &routes,
        ))
    }
}
