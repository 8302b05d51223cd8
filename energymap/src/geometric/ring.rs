//! Outer ring extraction from building geometries
//!
//! Every downstream calculation works on a single ring of `[x, y]` pairs.
//! Polygons contribute their outer ring, multi-polygons the outer ring of
//! their first polygon. Anything else yields an empty ring, which each
//! calculator maps to its own default.

use geo::{Coord, LineString};
use geojson::{Geometry, PolygonType, Position, Value as GeometryValue};
use serde_json::Value;

/// Ordered vertices of one polygon boundary
pub type Ring = LineString<f64>;

fn empty_ring() -> Ring {
    LineString::new(Vec::new())
}

/// Convert GeoJSON positions into a ring
///
/// A position with fewer than two values or a non-finite value makes the
/// whole ring unusable.
fn positions_to_ring(positions: &[Position]) -> Ring {
    let coords: Option<Vec<Coord<f64>>> = positions
        .iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] if x.is_finite() && y.is_finite() => Some(Coord { x: *x, y: *y }),
            _ => None,
        })
        .collect();

    coords.map(LineString::new).unwrap_or_else(empty_ring)
}

fn outer_ring(polygon: &PolygonType) -> Ring {
    polygon
        .first()
        .map(|ring| positions_to_ring(ring))
        .unwrap_or_else(empty_ring)
}

/// Outer ring of a typed GeoJSON geometry
pub fn normalize_geometry(geometry: Option<&Geometry>) -> Ring {
    let Some(geometry) = geometry else {
        return empty_ring();
    };

    match &geometry.value {
        GeometryValue::Polygon(polygon) => outer_ring(polygon),
        GeometryValue::MultiPolygon(polygons) => polygons
            .first()
            .map(outer_ring)
            .unwrap_or_else(empty_ring),
        _ => empty_ring(),
    }
}

/// Outer ring of a loosely-typed geometry value
///
/// Accepts a geometry object (`{"type": ..., "coordinates": ...}`) or a bare
/// coordinate array of any nesting depth, from a single ring up to
/// multi-polygon coordinates. Unknown geometry types and malformed input
/// yield an empty ring.
pub fn normalize_value(geometry: Option<&Value>) -> Ring {
    let Some(geometry) = geometry else {
        return empty_ring();
    };

    match geometry {
        Value::Object(object) => {
            let coordinates = object.get("coordinates");
            match object.get("type").and_then(Value::as_str) {
                Some("Polygon") | Some("MultiPolygon") | None => {
                    coordinates.map(bare_ring).unwrap_or_else(empty_ring)
                }
                Some(_) => empty_ring(),
            }
        }
        Value::Array(_) => bare_ring(geometry),
        _ => empty_ring(),
    }
}

/// Descend through leading elements until reaching an array of positions
fn bare_ring(coordinates: &Value) -> Ring {
    let mut current = coordinates;
    loop {
        let Some(items) = current.as_array() else {
            return empty_ring();
        };
        let Some(first) = items.first() else {
            return empty_ring();
        };
        match first {
            // `current` is a single position, not a ring
            Value::Number(_) => return empty_ring(),
            Value::Array(inner) if inner.first().is_some_and(Value::is_number) => {
                return value_positions_to_ring(items);
            }
            Value::Array(_) => current = first,
            _ => return empty_ring(),
        }
    }
}

fn value_positions_to_ring(positions: &[Value]) -> Ring {
    let coords: Option<Vec<Coord<f64>>> = positions
        .iter()
        .map(|position| {
            let pair = position.as_array()?;
            let x = pair.first()?.as_f64()?;
            let y = pair.get(1)?.as_f64()?;
            (x.is_finite() && y.is_finite()).then_some(Coord { x, y })
        })
        .collect();

    coords.map(LineString::new).unwrap_or_else(empty_ring)
}

/// Vertices of a ring without consecutive repeats or the closing vertex
pub fn distinct_vertices(ring: &Ring) -> Vec<Coord<f64>> {
    let mut vertices: Vec<Coord<f64>> = Vec::with_capacity(ring.0.len());
    for coord in ring.0.iter() {
        if vertices.last() != Some(coord) {
            vertices.push(*coord);
        }
    }
    while vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    vertices
}
