//! Parsed polygon geometry.

use crate::containment::{ring_location, RingLocation};
use crate::error::GeometryError;
use serde_json::Value;

/// A closed ring of `(x = longitude, y = latitude)` vertices. The closing
/// vertex is not repeated.
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    vertices: Vec<(f64, f64)>,
}

impl Ring {
    /// Build a ring, dropping an explicit closing vertex and consecutive
    /// repeats. At least three distinct vertices are required.
    pub fn new(mut vertices: Vec<(f64, f64)>) -> Result<Self, GeometryError> {
        vertices.dedup();
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        let distinct = distinct_count(&vertices);
        if distinct < 3 {
            return Err(GeometryError::RingTooShort { vertices: distinct });
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// Iterate edges, including the implicit closing edge.
    pub fn edges(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

fn distinct_count(vertices: &[(f64, f64)]) -> usize {
    let mut sorted = vertices.to_vec();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    sorted.dedup();
    sorted.len()
}

/// An exterior ring with zero or more holes.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub exterior: Ring,
    pub holes: Vec<Ring>,
}

impl Polygon {
    /// Strict containment: inside the exterior, and neither inside nor on
    /// the boundary of any hole.
    pub fn contains(&self, point: (f64, f64)) -> bool {
        if ring_location(&self.exterior, point) != RingLocation::Inside {
            return false;
        }
        self.holes
            .iter()
            .all(|hole| ring_location(hole, point) == RingLocation::Outside)
    }
}

/// A `Polygon` or `MultiPolygon`.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    polygons: Vec<Polygon>,
}

impl Geometry {
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn contains(&self, point: (f64, f64)) -> bool {
        self.polygons.iter().any(|p| p.contains(point))
    }

    /// Parse a GeoJSON geometry object. A `Feature` is unwrapped to its
    /// `geometry` member.
    pub fn from_geojson(value: &Value) -> Result<Self, GeometryError> {
        let obj = value.as_object().ok_or(GeometryError::NotAnObject)?;
        let kind = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or(GeometryError::MissingType)?;
        match kind {
            "Feature" => {
                let inner = obj.get("geometry").ok_or(GeometryError::MissingCoordinates)?;
                Self::from_geojson(inner)
            }
            "Polygon" => {
                let coords = coordinates(obj)?;
                Ok(Self::from_polygons(vec![parse_polygon(coords)?]))
            }
            "MultiPolygon" => {
                let coords = coordinates(obj)?;
                let polygons = coords
                    .iter()
                    .map(|p| p.as_array().ok_or(GeometryError::MissingCoordinates))
                    .map(|p| p.and_then(|rings| parse_polygon(rings)))
                    .collect::<Result<Vec<_>, _>>()?;
                if polygons.is_empty() {
                    return Err(GeometryError::MissingCoordinates);
                }
                Ok(Self::from_polygons(polygons))
            }
            other => Err(GeometryError::Unsupported(other.to_string())),
        }
    }
}

fn coordinates(obj: &serde_json::Map<String, Value>) -> Result<&Vec<Value>, GeometryError> {
    obj.get("coordinates")
        .and_then(Value::as_array)
        .ok_or(GeometryError::MissingCoordinates)
}

fn parse_polygon(rings: &[Value]) -> Result<Polygon, GeometryError> {
    let mut parsed = rings
        .iter()
        .map(|r| r.as_array().ok_or(GeometryError::MissingCoordinates))
        .map(|r| r.and_then(|positions| parse_ring(positions)));
    let exterior = parsed.next().ok_or(GeometryError::MissingCoordinates)??;
    let holes = parsed.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon { exterior, holes })
}

fn parse_ring(positions: &[Value]) -> Result<Ring, GeometryError> {
    let vertices = positions
        .iter()
        .enumerate()
        .map(|(index, pos)| parse_position(index, pos))
        .collect::<Result<Vec<_>, _>>()?;
    Ring::new(vertices)
}

fn parse_position(index: usize, pos: &Value) -> Result<(f64, f64), GeometryError> {
    let pair = pos
        .as_array()
        .filter(|p| p.len() >= 2)
        .ok_or(GeometryError::BadPosition { index })?;
    let x = pair[0].as_f64().ok_or(GeometryError::BadPosition { index })?;
    let y = pair[1].as_f64().ok_or(GeometryError::BadPosition { index })?;
    if !x.is_finite() || !y.is_finite() {
        return Err(GeometryError::NonFinite { index });
    }
    Ok((x, y))
}
