use geo::{BoundingRect, Coord, LineString, MapCoords};
use serde::{Deserialize, Serialize};

/// Mean earth radius in meters (IUGG)
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Unit system of the coordinates found in building geometries
///
/// GeoJSON from the map is always `[lon, lat]` in degrees, so `Geographic`
/// is the default. `Planar` skips projection and treats coordinates as
/// already metric (or unit-less, for synthetic footprints).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    #[default]
    Geographic,
    Planar,
}

impl CoordinateSpace {
    /// Bring a ring into planar meters
    ///
    /// Geographic rings are projected around their own center with
    /// [`LocalProjection`]; planar rings are returned unchanged. An empty
    /// ring stays empty.
    pub fn to_planar(&self, ring: &LineString<f64>) -> LineString<f64> {
        match self {
            CoordinateSpace::Planar => ring.clone(),
            CoordinateSpace::Geographic => match LocalProjection::for_ring(ring) {
                Some(projection) => projection.project_ring(ring),
                None => LineString::new(Vec::new()),
            },
        }
    }
}

/// Equirectangular projection centered on a reference point
///
/// Good to a fraction of a percent over a single building footprint, which
/// is all the feature vector needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalProjection {
    origin: Coord<f64>,
    meters_per_degree_x: f64,
    meters_per_degree_y: f64,
}

impl LocalProjection {
    /// Projection whose origin is `origin` (lon/lat degrees)
    pub fn new(origin: Coord<f64>) -> Self {
        let meters_per_degree_y = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
        let meters_per_degree_x = meters_per_degree_y * origin.y.to_radians().cos().abs();
        LocalProjection {
            origin,
            meters_per_degree_x,
            meters_per_degree_y,
        }
    }

    /// Projection centered on the bounding box of `ring`, or `None` for an empty ring
    pub fn for_ring(ring: &LineString<f64>) -> Option<Self> {
        let rect = ring.bounding_rect()?;
        Some(Self::new(rect.center()))
    }

    /// Projection centered on a bounding box
    pub fn for_bbox(bbox: &BoundingBox) -> Self {
        Self::new(bbox.center())
    }

    pub fn project(&self, coord: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (coord.x - self.origin.x) * self.meters_per_degree_x,
            y: (coord.y - self.origin.y) * self.meters_per_degree_y,
        }
    }

    pub fn project_ring(&self, ring: &LineString<f64>) -> LineString<f64> {
        ring.map_coords(|coord| self.project(coord))
    }
}

/// Bounding box structure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64, // min longitude
    pub min_y: f64, // min latitude
    pub max_x: f64, // max longitude
    pub max_y: f64, // max latitude
}

/// Encodings of a bounding box accepted from the front-end
#[derive(Deserialize)]
#[serde(untagged)]
enum BoundingBoxRepr {
    /// `[min_x, min_y, max_x, max_y]`
    Flat([f64; 4]),
    /// `[[west, south], [east, north]]` (map bounds)
    Corners([[f64; 2]; 2]),
    Named {
        #[serde(alias = "minX", alias = "west")]
        min_x: f64,
        #[serde(alias = "minY", alias = "south")]
        min_y: f64,
        #[serde(alias = "maxX", alias = "east")]
        max_x: f64,
        #[serde(alias = "maxY", alias = "north")]
        max_y: f64,
    },
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Parse a bounding box from a JSON value
    ///
    /// Accepts a flat `[min_x, min_y, max_x, max_y]` array, a pair of corners,
    /// an object with `min_x`/`minX`/`west`-style keys, or a JSON string
    /// holding any of those. Swapped min/max are reordered. Returns `None`
    /// for anything else, including non-finite values.
    pub fn from_json_value(value: &serde_json::Value) -> Option<Self> {
        if let Some(encoded) = value.as_str() {
            return Self::from_json_str(encoded);
        }

        let repr: BoundingBoxRepr = serde_json::from_value(value.clone()).ok()?;
        let (x0, y0, x1, y1) = match repr {
            BoundingBoxRepr::Flat([x0, y0, x1, y1]) => (x0, y0, x1, y1),
            BoundingBoxRepr::Corners([[x0, y0], [x1, y1]]) => (x0, y0, x1, y1),
            BoundingBoxRepr::Named {
                min_x,
                min_y,
                max_x,
                max_y,
            } => (min_x, min_y, max_x, max_y),
        };

        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            return None;
        }

        Some(BoundingBox::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)))
    }

    /// Parse a JSON-encoded bounding box string
    pub fn from_json_str(encoded: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(encoded.trim()).ok()?;
        // A string holding a string is not a bounding box
        if value.is_string() {
            return None;
        }
        Self::from_json_value(&value)
    }

    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Extents `(width, height)` in the planar units of `space`
    pub fn planar_extent(&self, space: CoordinateSpace) -> (f64, f64) {
        match space {
            CoordinateSpace::Planar => (self.width(), self.height()),
            CoordinateSpace::Geographic => {
                let projection = LocalProjection::for_bbox(self);
                let min = projection.project(Coord {
                    x: self.min_x,
                    y: self.min_y,
                });
                let max = projection.project(Coord {
                    x: self.max_x,
                    y: self.max_y,
                });
                (max.x - min.x, max.y - min.y)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;
    use serde_json::json;

    #[test]
    fn test_bounding_box() {
        let bbox: BoundingBox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(bbox.min_x, 0.0);
        assert_eq!(bbox.max_x, 1.0);
        assert_eq!(bbox.center(), Coord { x: 0.5, y: 0.5 });
    }

    #[test]
    fn test_bbox_from_flat_array() {
        let bbox = BoundingBox::from_json_value(&json!([2.0, 1.0, 0.0, 3.0])).unwrap();
        assert_eq!(bbox, BoundingBox::new(0.0, 1.0, 2.0, 3.0));
    }

    #[test]
    fn test_bbox_from_named_and_corners() {
        let named = json!({"west": -76.5, "south": 42.4, "east": -76.4, "north": 42.5});
        let bbox = BoundingBox::from_json_value(&named).unwrap();
        assert_eq!(bbox, BoundingBox::new(-76.5, 42.4, -76.4, 42.5));

        let corners = json!([[-76.5, 42.4], [-76.4, 42.5]]);
        assert_eq!(BoundingBox::from_json_value(&corners), Some(bbox));
    }

    #[test]
    fn test_bbox_from_encoded_string() {
        let encoded = json!("{\"min_x\": 0, \"min_y\": 0, \"max_x\": 4, \"max_y\": 2}");
        let bbox = BoundingBox::from_json_value(&encoded).unwrap();
        assert_eq!(bbox.width(), 4.0);
        assert_eq!(bbox.height(), 2.0);
    }

    #[test]
    fn test_bbox_rejects_garbage() {
        assert!(BoundingBox::from_json_str("not json").is_none());
        assert!(BoundingBox::from_json_str("\"[0,0,1,1]\"").is_none());
        assert!(BoundingBox::from_json_value(&json!([1.0, 2.0])).is_none());
        assert!(BoundingBox::from_json_value(&json!({"min_x": 1})).is_none());
    }

    #[test]
    fn test_projection_scale_at_equator() {
        let projection = LocalProjection::new(Coord { x: 0.0, y: 0.0 });
        let p = projection.project(Coord { x: 0.001, y: 0.001 });
        // One millidegree is ~111.2 m on both axes at the equator
        assert!((p.x - 111.195).abs() < 0.01);
        assert!((p.y - 111.195).abs() < 0.01);
    }

    #[test]
    fn test_projection_shrinks_longitude_with_latitude() {
        let projection = LocalProjection::new(Coord { x: 0.0, y: 60.0 });
        let p = projection.project(Coord { x: 0.001, y: 60.0 });
        assert!((p.x - 111.195 * 0.5).abs() < 0.01);
    }

    #[test]
    fn test_planar_space_is_identity() {
        let ring = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 5.0)];
        assert_eq!(CoordinateSpace::Planar.to_planar(&ring), ring);
    }

    #[test]
    fn test_geographic_empty_ring_stays_empty() {
        let ring = LineString::new(Vec::new());
        assert!(CoordinateSpace::Geographic.to_planar(&ring).0.is_empty());
    }
}
