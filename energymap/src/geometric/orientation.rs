//! Principal orientation of a building footprint
//!
//! The orientation is the direction of the longest side of the footprint's
//! minimum-area bounding rectangle, in degrees counter-clockwise from east.
//! Facades are symmetric under a half turn, so values live in `[0, 180)`.

use geo::{Coord, LineString, MinimumRotatedRect};

use crate::geo_core::{BoundingBox, CoordinateSpace};
use crate::geometric::ring::distinct_vertices;

/// Orientation used when the input has no usable direction
pub const DEFAULT_ORIENTATION: f64 = 0.0;

/// Edges shorter than this are treated as points
const MIN_EDGE_LENGTH: f64 = 1e-12;

const ANGLE_EPSILON: f64 = 1e-9;

/// Reduce an angle in degrees to `[0, 180)`
fn canonical_degrees(degrees: f64) -> f64 {
    let reduced = degrees.rem_euclid(180.0);
    // Directions a hair either side of the x axis snap to exactly 0
    if reduced < ANGLE_EPSILON || 180.0 - reduced < ANGLE_EPSILON {
        0.0
    } else {
        reduced
    }
}

fn direction_degrees(from: Coord<f64>, to: Coord<f64>) -> Option<f64> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.hypot(dy) < MIN_EDGE_LENGTH {
        return None;
    }
    Some(canonical_degrees(dy.atan2(dx).to_degrees()))
}

/// Direction of the longest edge of a closed ring; first edge wins ties
fn longest_edge_direction(ring: &LineString<f64>) -> Option<f64> {
    let mut best: Option<(f64, Coord<f64>, Coord<f64>)> = None;
    for line in ring.lines() {
        let length = line.dx().hypot(line.dy());
        if best.map_or(true, |(longest, _, _)| length > longest) {
            best = Some((length, line.start, line.end));
        }
    }
    let (_, start, end) = best?;
    direction_degrees(start, end)
}

/// Direction between the two most distant vertices
fn farthest_pair_direction(vertices: &[Coord<f64>]) -> Option<f64> {
    let mut best: Option<(f64, Coord<f64>, Coord<f64>)> = None;
    for (i, a) in vertices.iter().enumerate() {
        for b in vertices.iter().skip(i + 1) {
            let distance = (b.x - a.x).hypot(b.y - a.y);
            if best.map_or(true, |(farthest, _, _)| distance > farthest) {
                best = Some((distance, *a, *b));
            }
        }
    }
    let (_, a, b) = best?;
    direction_degrees(a, b)
}

/// Orientation of a planar ring
///
/// Fewer than two distinct vertices give [`DEFAULT_ORIENTATION`]. Collinear
/// vertices fall back to the direction of the farthest pair.
pub fn orientation(ring: &LineString<f64>) -> f64 {
    let vertices = distinct_vertices(ring);
    if vertices.len() < 2 {
        return DEFAULT_ORIENTATION;
    }

    if vertices.len() >= 3 {
        let rect_direction = LineString::new(vertices.clone())
            .minimum_rotated_rect()
            .and_then(|rect| longest_edge_direction(rect.exterior()));
        if let Some(direction) = rect_direction {
            return direction;
        }
    }

    farthest_pair_direction(&vertices).unwrap_or(DEFAULT_ORIENTATION)
}

/// Orientation of a ring expressed in `space`
pub fn orientation_in(ring: &LineString<f64>, space: CoordinateSpace) -> f64 {
    orientation(&space.to_planar(ring))
}

/// Orientation of an axis-aligned bounding box
///
/// The longer side decides: 0 when the box is at least as wide as it is
/// tall, 90 otherwise. A zero-size box gives [`DEFAULT_ORIENTATION`].
pub fn orientation_from_bbox(bbox: &BoundingBox, space: CoordinateSpace) -> f64 {
    let (width, height) = bbox.planar_extent(space);
    let (width, height) = (width.abs(), height.abs());
    if !(width.is_finite() && height.is_finite()) || width.max(height) < MIN_EDGE_LENGTH {
        return DEFAULT_ORIENTATION;
    }
    if width >= height {
        0.0
    } else {
        90.0
    }
}

/// Orientation of a bounding box given as JSON, possibly string-encoded
///
/// Unparseable input gives [`DEFAULT_ORIENTATION`].
pub fn orientation_from_bbox_value(value: &serde_json::Value, space: CoordinateSpace) -> f64 {
    match BoundingBox::from_json_value(value) {
        Some(bbox) => orientation_from_bbox(&bbox, space),
        None => {
            log::debug!("unparseable bounding box {value}, using default orientation");
            DEFAULT_ORIENTATION
        }
    }
}

/// Orientation of a JSON-encoded bounding box string
pub fn orientation_from_bbox_str(encoded: &str, space: CoordinateSpace) -> f64 {
    match BoundingBox::from_json_str(encoded) {
        Some(bbox) => orientation_from_bbox(&bbox, space),
        None => {
            log::debug!("unparseable bounding box string {encoded:?}, using default orientation");
            DEFAULT_ORIENTATION
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, Rotate};
    use serde_json::json;

    /// Angular distance modulo the half turn
    fn assert_angle(actual: f64, expected: f64) {
        let diff = (actual - expected).rem_euclid(180.0);
        let diff = diff.min(180.0 - diff);
        assert!(diff < 1e-6, "expected {expected}, got {actual}");
    }

    #[test]
    fn test_wide_rectangle_is_east_west() {
        let ring = line_string![
            (x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 4.0), (x: 0.0, y: 4.0), (x: 0.0, y: 0.0),
        ];
        assert_angle(orientation(&ring), 0.0);
    }

    #[test]
    fn test_tall_rectangle_is_north_south() {
        let ring = line_string![
            (x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 10.0), (x: 0.0, y: 10.0), (x: 0.0, y: 0.0),
        ];
        assert_angle(orientation(&ring), 90.0);
    }

    #[test]
    fn test_rotated_rectangle() {
        let ring = line_string![
            (x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 4.0), (x: 0.0, y: 4.0), (x: 0.0, y: 0.0),
        ];
        let rotated = ring.rotate_around_point(30.0, geo::Point::new(0.0, 0.0));
        assert_angle(orientation(&rotated), 30.0);

        let rotated = ring.rotate_around_point(-45.0, geo::Point::new(3.0, 1.0));
        assert_angle(orientation(&rotated), 135.0);
    }

    #[test]
    fn test_result_is_in_half_turn_range() {
        let ring = line_string![
            (x: 0.0, y: 0.0), (x: -10.0, y: -3.0), (x: -11.0, y: 0.0), (x: -1.0, y: 3.0), (x: 0.0, y: 0.0),
        ];
        let value = orientation(&ring);
        assert!((0.0..180.0).contains(&value));
    }

    #[test]
    fn test_degenerate_rings_use_default() {
        assert_eq!(orientation(&LineString::new(Vec::new())), DEFAULT_ORIENTATION);
        let point = line_string![(x: 3.0, y: 3.0), (x: 3.0, y: 3.0)];
        assert_eq!(orientation(&point), DEFAULT_ORIENTATION);
    }

    #[test]
    fn test_two_points_and_collinear() {
        let segment = line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 5.0)];
        assert_angle(orientation(&segment), 90.0);

        let collinear = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0), (x: 3.0, y: 3.0), (x: 0.0, y: 0.0)];
        assert_angle(orientation(&collinear), 45.0);
    }

    #[test]
    fn test_bbox_orientation() {
        let wide = BoundingBox::new(0.0, 0.0, 10.0, 2.0);
        assert_eq!(orientation_from_bbox(&wide, CoordinateSpace::Planar), 0.0);

        let tall = BoundingBox::new(0.0, 0.0, 2.0, 10.0);
        assert_eq!(orientation_from_bbox(&tall, CoordinateSpace::Planar), 90.0);

        let point = BoundingBox::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(orientation_from_bbox(&point, CoordinateSpace::Planar), DEFAULT_ORIENTATION);
    }

    #[test]
    fn test_geographic_bbox_accounts_for_latitude() {
        // 0.002° × 0.0015° at 60°N is ~111 m wide and ~167 m tall
        let bbox = BoundingBox::new(10.0, 60.0, 10.002, 60.0015);
        assert_eq!(orientation_from_bbox(&bbox, CoordinateSpace::Geographic), 90.0);
        assert_eq!(orientation_from_bbox(&bbox, CoordinateSpace::Planar), 0.0);
    }

    #[test]
    fn test_bbox_string_forms() {
        let space = CoordinateSpace::Planar;
        assert_eq!(orientation_from_bbox_str("[0, 0, 2, 8]", space), 90.0);
        assert_eq!(orientation_from_bbox_str("{broken", space), DEFAULT_ORIENTATION);
        assert_eq!(orientation_from_bbox_value(&json!("[0, 0, 2, 8]"), space), 90.0);
        assert_eq!(orientation_from_bbox_value(&json!({"oops": true}), space), DEFAULT_ORIENTATION);
    }
}
