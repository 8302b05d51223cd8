use geo::{Area, EuclideanLength, LineString, Polygon};

use crate::geo_core::CoordinateSpace;
use crate::geometric::ring::distinct_vertices;

/// Closed footprint polygon, or `None` when the ring has fewer than three distinct vertices
fn footprint_polygon(ring: &LineString<f64>) -> Option<Polygon<f64>> {
    let vertices = distinct_vertices(ring);
    if vertices.len() < 3 {
        return None;
    }
    Some(Polygon::new(LineString::new(vertices), vec![]))
}

/// Shoelace area of a planar ring
///
/// The ring does not need to be closed and may wind either way. Rings with
/// fewer than three distinct vertices have area 0.
pub fn shoelace_area(ring: &LineString<f64>) -> f64 {
    footprint_polygon(ring)
        .map(|polygon| polygon.unsigned_area())
        .unwrap_or(0.0)
}

/// Roof area of a ring expressed in `space`, in square planar units
///
/// Geographic rings are projected to local meters first, so the result is
/// in m².
pub fn roof_area(ring: &LineString<f64>, space: CoordinateSpace) -> f64 {
    shoelace_area(&space.to_planar(ring))
}

/// Perimeter of the closed footprint of a planar ring
///
/// Same degenerate rule as the area: fewer than three distinct vertices
/// means no walls.
pub fn footprint_perimeter(ring: &LineString<f64>) -> f64 {
    footprint_polygon(ring)
        .map(|polygon| polygon.exterior().euclidean_length())
        .unwrap_or(0.0)
}
