//! Footprint shape classification
//!
//! Rings are reduced to their corner vertices, then matched against the
//! rectilinear archetypes the load model was trained on. Anything that does
//! not match is `Irregular`, which is also the answer for degenerate rings.

use geo::{Area, Coord, LineString, MinimumRotatedRect, Polygon};
use serde::{Deserialize, Serialize};

use crate::geometric::ring::distinct_vertices;

/// Corners turning less than this are merged into a straight edge
pub const COLLINEAR_TOLERANCE_DEG: f64 = 3.0;

/// Maximum deviation from 90° for a corner to count as square
pub const RIGHT_ANGLE_TOLERANCE_DEG: f64 = 10.0;

/// Quadrilaterals filling at least this share of their minimum bounding
/// rectangle are rectangular even when their corners are not square
pub const RECTANGULARITY_THRESHOLD: f64 = 0.95;

/// Canonical footprint archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum BuildingShape {
    Rectangular = 0,
    LShaped = 1,
    TShaped = 2,
    UShaped = 3,
    #[default]
    Irregular = 4,
}

/// Shape used when classification is inconclusive
pub const DEFAULT_SHAPE: BuildingShape = BuildingShape::Irregular;

impl BuildingShape {
    /// Categorical code sent as `Building_Shape`
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            BuildingShape::Rectangular => "Rectangular",
            BuildingShape::LShaped => "L-Shaped",
            BuildingShape::TShaped => "T-Shaped",
            BuildingShape::UShaped => "U-Shaped",
            BuildingShape::Irregular => "Irregular",
        }
    }
}

/// Turn at each vertex: (signed cross product, absolute turn angle in degrees)
fn turns(vertices: &[Coord<f64>]) -> Vec<(f64, f64)> {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let prev = vertices[(i + n - 1) % n];
            let current = vertices[i];
            let next = vertices[(i + 1) % n];
            let a = current - prev;
            let b = next - current;
            let cross = a.x * b.y - a.y * b.x;
            let dot = a.x * b.x + a.y * b.y;
            (cross, cross.atan2(dot).to_degrees().abs())
        })
        .collect()
}

/// Distinct vertices with straight-through vertices removed
fn corner_vertices(ring: &LineString<f64>) -> Vec<Coord<f64>> {
    let mut vertices = distinct_vertices(ring);
    loop {
        if vertices.len() < 3 {
            return vertices;
        }
        let straight = turns(&vertices)
            .iter()
            .position(|(_, angle)| *angle < COLLINEAR_TOLERANCE_DEG);
        match straight {
            Some(index) => {
                vertices.remove(index);
            }
            None => return vertices,
        }
    }
}

/// Footprint area over minimum bounding rectangle area, in `[0, 1]`
fn rectangularity(polygon: &Polygon<f64>) -> f64 {
    let area = polygon.unsigned_area();
    match polygon.minimum_rotated_rect() {
        Some(rect) if rect.unsigned_area() > 0.0 => (area / rect.unsigned_area()).min(1.0),
        _ => 0.0,
    }
}

/// Classify a planar ring into a [`BuildingShape`]
///
/// Every ring maps to exactly one shape:
/// - 4 corners, all square or filling the bounding rectangle → `Rectangular`
/// - rectilinear with 6 corners, one of them reflex → `LShaped`
/// - rectilinear with 8 corners, two reflex corners next to each other
///   (the floor of the notch) → `UShaped`
/// - rectilinear with 8 corners, two reflex corners three steps apart
///   (either side of the stem) → `TShaped`
/// - anything else → [`DEFAULT_SHAPE`]
pub fn classify(ring: &LineString<f64>) -> BuildingShape {
    let vertices = corner_vertices(ring);
    let n = vertices.len();
    if n < 3 {
        return DEFAULT_SHAPE;
    }

    let corners = turns(&vertices);
    let rectilinear = corners
        .iter()
        .all(|(_, angle)| (angle - 90.0).abs() <= RIGHT_ANGLE_TOLERANCE_DEG);

    if n == 4 {
        let polygon = Polygon::new(LineString::new(vertices), vec![]);
        if rectilinear || rectangularity(&polygon) >= RECTANGULARITY_THRESHOLD {
            return BuildingShape::Rectangular;
        }
        return DEFAULT_SHAPE;
    }

    if !rectilinear {
        return DEFAULT_SHAPE;
    }

    // Convex corners turn with the winding, reflex corners against it
    let winding = Polygon::new(LineString::new(vertices), vec![]).signed_area().signum();
    let reflex: Vec<usize> = corners
        .iter()
        .enumerate()
        .filter(|(_, (cross, _))| cross * winding < 0.0)
        .map(|(index, _)| index)
        .collect();

    match (n, reflex.as_slice()) {
        (6, [_]) => BuildingShape::LShaped,
        (8, [a, b]) => {
            let forward = b - a;
            match forward.min(n - forward) {
                1 => BuildingShape::UShaped,
                3 => BuildingShape::TShaped,
                _ => DEFAULT_SHAPE,
            }
        }
        _ => DEFAULT_SHAPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, Rotate};

    fn rotate_start(ring: &LineString<f64>, by: usize) -> LineString<f64> {
        let mut coords = distinct_vertices(ring);
        coords.rotate_left(by);
        LineString::new(coords)
    }

    fn l_shape() -> LineString<f64> {
        line_string![
            (x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 4.0), (x: 4.0, y: 4.0),
            (x: 4.0, y: 10.0), (x: 0.0, y: 10.0), (x: 0.0, y: 0.0),
        ]
    }

    fn u_shape() -> LineString<f64> {
        line_string![
            (x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 7.0, y: 10.0),
            (x: 7.0, y: 3.0), (x: 3.0, y: 3.0), (x: 3.0, y: 10.0), (x: 0.0, y: 10.0), (x: 0.0, y: 0.0),
        ]
    }

    fn t_shape() -> LineString<f64> {
        line_string![
            (x: 4.0, y: 0.0), (x: 6.0, y: 0.0), (x: 6.0, y: 6.0), (x: 10.0, y: 6.0),
            (x: 10.0, y: 10.0), (x: 0.0, y: 10.0), (x: 0.0, y: 6.0), (x: 4.0, y: 6.0), (x: 4.0, y: 0.0),
        ]
    }

    #[test]
    fn test_rectangle() {
        let ring = line_string![
            (x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 4.0), (x: 0.0, y: 4.0), (x: 0.0, y: 0.0),
        ];
        assert_eq!(classify(&ring), BuildingShape::Rectangular);

        let rotated = ring.rotate_around_point(37.0, geo::Point::new(0.0, 0.0));
        assert_eq!(classify(&rotated), BuildingShape::Rectangular);
    }

    #[test]
    fn test_rectangle_with_midpoint_vertices() {
        let ring = line_string![
            (x: 0.0, y: 0.0), (x: 5.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 4.0),
            (x: 5.0, y: 4.01), (x: 0.0, y: 4.0), (x: 0.0, y: 0.0),
        ];
        assert_eq!(classify(&ring), BuildingShape::Rectangular);
    }

    #[test]
    fn test_slightly_skewed_quadrilateral_is_rectangular() {
        let ring = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.5, y: 10.0), (x: 0.0, y: 10.0)];
        assert_eq!(classify(&ring), BuildingShape::Rectangular);
    }

    #[test]
    fn test_l_shape() {
        assert_eq!(classify(&l_shape()), BuildingShape::LShaped);
        assert_eq!(classify(&rotate_start(&l_shape(), 3)), BuildingShape::LShaped);

        let mut clockwise = l_shape().0;
        clockwise.reverse();
        assert_eq!(classify(&LineString::new(clockwise)), BuildingShape::LShaped);
    }

    #[test]
    fn test_u_and_t_shapes() {
        assert_eq!(classify(&u_shape()), BuildingShape::UShaped);
        assert_eq!(classify(&t_shape()), BuildingShape::TShaped);
        for start in 0..8 {
            assert_eq!(classify(&rotate_start(&u_shape(), start)), BuildingShape::UShaped);
            assert_eq!(classify(&rotate_start(&t_shape(), start)), BuildingShape::TShaped);
        }
    }

    #[test]
    fn test_irregular_shapes() {
        let triangle = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 5.0, y: 8.0), (x: 0.0, y: 0.0)];
        assert_eq!(classify(&triangle), BuildingShape::Irregular);

        let kite = line_string![(x: 0.0, y: 0.0), (x: 6.0, y: 2.0), (x: 0.0, y: 10.0), (x: -6.0, y: 2.0)];
        assert_eq!(classify(&kite), BuildingShape::Irregular);

        // Z footprint: 8 corners, reflex corners four steps apart
        let z = line_string![
            (x: 0.0, y: 0.0), (x: 6.0, y: 0.0), (x: 6.0, y: 4.0), (x: 10.0, y: 4.0),
            (x: 10.0, y: 10.0), (x: 4.0, y: 10.0), (x: 4.0, y: 6.0), (x: 0.0, y: 6.0),
        ];
        assert_eq!(classify(&z), BuildingShape::Irregular);
    }

    #[test]
    fn test_degenerate_rings_use_default() {
        assert_eq!(classify(&LineString::new(Vec::new())), DEFAULT_SHAPE);
        let segment = line_string![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 8.0, y: 0.0)];
        assert_eq!(classify(&segment), DEFAULT_SHAPE);
    }

    #[test]
    fn test_codes() {
        assert_eq!(BuildingShape::Rectangular.code(), 0);
        assert_eq!(BuildingShape::default(), DEFAULT_SHAPE);
        assert_eq!(DEFAULT_SHAPE.code(), 4);
    }
}
