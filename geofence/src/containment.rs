//! Even-odd point-in-ring test.

use crate::geometry::Ring;

/// Tolerance for the collinearity test on boundary edges, in degrees².
const BOUNDARY_EPSILON: f64 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingLocation {
    Inside,
    Boundary,
    Outside,
}

/// Locate `point` relative to `ring` by casting a ray towards +x and counting
/// edge crossings. Points on an edge or vertex are reported as `Boundary`.
/// A non-finite point is always `Outside`.
pub fn ring_location(ring: &Ring, point: (f64, f64)) -> RingLocation {
    let (px, py) = point;
    if !px.is_finite() || !py.is_finite() {
        return RingLocation::Outside;
    }
    let mut inside = false;
    for (a, b) in ring.edges() {
        if on_segment(a, b, point) {
            return RingLocation::Boundary;
        }
        let (ax, ay) = a;
        let (bx, by) = b;
        if (ay > py) != (by > py) {
            let x_cross = ax + (py - ay) * (bx - ax) / (by - ay);
            if px < x_cross {
                inside = !inside;
            }
        }
    }
    if inside {
        RingLocation::Inside
    } else {
        RingLocation::Outside
    }
}

fn on_segment(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> bool {
    let cross = (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0);
    if cross.abs() > BOUNDARY_EPSILON {
        return false;
    }
    p.0 >= a.0.min(b.0) && p.0 <= a.0.max(b.0) && p.1 >= a.1.min(b.1) && p.1 <= a.1.max(b.1)
}
