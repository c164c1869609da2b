//! Approved grazing routes.

use crate::RouteId;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a route. Only `Active` routes authorize a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    Active,
    Inactive,
    Pending,
}

impl RouteStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// A grazing corridor.
///
/// `geometry` is a GeoJSON geometry object (`Polygon` or `MultiPolygon`) with
/// `[longitude, latitude]` positions. It is kept as raw JSON so that a single
/// malformed route can be rejected at evaluation time without poisoning the
/// rest of the route set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    #[serde(rename = "route_name")]
    pub name: String,
    #[serde(rename = "state")]
    pub jurisdiction: String,
    #[serde(rename = "geojson_data")]
    pub geometry: serde_json::Value,
    pub status: RouteStatus,
}
