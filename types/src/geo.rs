//! Geographic coordinates.

use serde::{Deserialize, Serialize};

/// A WGS84 position as reported by a field device.
///
/// Geometry vertices are stored `(longitude, latitude)`, so callers should go
/// through [`Coordinate::as_lng_lat`] rather than building tuples by hand.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The point in geometry axis order: `(x = longitude, y = latitude)`.
    pub fn as_lng_lat(&self) -> (f64, f64) {
        (self.longitude, self.latitude)
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}
