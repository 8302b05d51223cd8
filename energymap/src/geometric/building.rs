use geo::LineString;
use geojson::{feature::Id, Feature as GeoJsonFeature, FeatureCollection, GeoJson};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::config::{EnergyMapConfig, RoofAreaSource};
use crate::error::{EnergyMapError, Result};
use crate::geometric::attributes::{
    resolve_height, resolve_id, resolve_occupancy, resolve_shape_area, resolve_stories, Properties,
};
use crate::geometric::building_type::BuildingType;
use crate::geometric::orientation::orientation;
use crate::geometric::ring::{normalize_geometry, normalize_value, Ring};
use crate::geometric::roof_area::{footprint_perimeter, shoelace_area};
use crate::geometric::shape::{classify, BuildingShape};

/// Numeric record consumed by the prediction service
///
/// Field names match the request body of `/predict` exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(rename = "Building_Type")]
    pub building_type: u8,
    #[serde(rename = "Building_Shape")]
    pub building_shape: u8,
    #[serde(rename = "Orientation")]
    pub orientation: f64,
    #[serde(rename = "Building_Height")]
    pub building_height: f64,
    #[serde(rename = "Building_Stories")]
    pub building_stories: u32,
    #[serde(rename = "Wall_Area")]
    pub wall_area: f64,
    #[serde(rename = "Window_Area")]
    pub window_area: f64,
    #[serde(rename = "Roof_Area")]
    pub roof_area: f64,
    pub energy_code: u32,
    pub hvac_category: u32,
}

/// One element of the `/predict_all` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingRecord {
    pub id: String,
    #[serde(flatten)]
    pub vector: FeatureVector,
}

/// Request body of `/predict_all`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub buildings: Vec<BuildingRecord>,
}

/// Building derived from one GeoJSON feature
///
/// All values are computed once at construction; nothing is read back from
/// the source feature afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub id: String,
    /// Footprint outer ring in planar units (meters for geographic input)
    pub footprint: Ring,
    pub building_type: BuildingType,
    pub shape: BuildingShape,
    /// Degrees counter-clockwise from east, in `[0, 180)`
    pub orientation: f64,
    /// Height in meters
    pub height: f64,
    pub stories: u32,
    pub roof_area: f64,
    pub wall_area: f64,
    pub window_area: f64,
    energy_code: u32,
    hvac_category: u32,
}

impl Building {
    /// Assemble a building from its parts
    ///
    /// `ring` is in the config's coordinate space; `props` and `feature_id`
    /// may be absent.
    pub fn from_parts(
        ring: &LineString<f64>,
        props: Option<&Properties>,
        feature_id: Option<&Value>,
        config: &EnergyMapConfig,
    ) -> Self {
        let footprint = config.coordinate_space.to_planar(ring);
        let id = resolve_id(props, feature_id);

        let height = resolve_height(props, config.default_height);
        let stories = resolve_stories(props, config.default_stories);

        let roof_area = match (config.roof_area_source, resolve_shape_area(props)) {
            (RoofAreaSource::PreferMetadata, Some(area)) => {
                log::debug!("building {id}: roof area {area} from Shape__Area");
                area
            }
            _ => shoelace_area(&footprint),
        };

        let wall_area = footprint_perimeter(&footprint) * height;
        let window_area = wall_area * config.window_to_wall_ratio;

        if footprint.0.is_empty() {
            log::debug!("building {id}: no usable footprint, geometry-derived values use defaults");
        }

        Building {
            building_type: BuildingType::from_occupancy(resolve_occupancy(props)),
            shape: classify(&footprint),
            orientation: orientation(&footprint),
            id,
            footprint,
            height,
            stories,
            roof_area,
            wall_area,
            window_area,
            energy_code: config.energy_code,
            hvac_category: config.hvac_category,
        }
    }

    /// Assemble a building from a typed GeoJSON feature
    pub fn from_feature(feature: &GeoJsonFeature, config: &EnergyMapConfig) -> Self {
        let ring = normalize_geometry(feature.geometry.as_ref());
        let feature_id = feature_id_value(feature);
        Self::from_parts(&ring, feature.properties.as_ref(), feature_id.as_ref(), config)
    }

    /// Assemble a building from an arbitrary JSON value
    ///
    /// Meant for features handed over by the map, which may not be strict
    /// GeoJSON. Values that are not objects give an all-default building.
    pub fn from_value(feature: &Value, config: &EnergyMapConfig) -> Self {
        let ring = normalize_value(feature.get("geometry"));
        let props = feature.get("properties").and_then(Value::as_object);
        Self::from_parts(&ring, props, feature.get("id"), config)
    }

    pub fn feature_vector(&self) -> FeatureVector {
        FeatureVector {
            building_type: self.building_type.code(),
            building_shape: self.shape.code(),
            orientation: self.orientation,
            building_height: self.height,
            building_stories: self.stories,
            wall_area: self.wall_area,
            window_area: self.window_area,
            roof_area: self.roof_area,
            energy_code: self.energy_code,
            hvac_category: self.hvac_category,
        }
    }

    pub fn record(&self) -> BuildingRecord {
        BuildingRecord {
            id: self.id.clone(),
            vector: self.feature_vector(),
        }
    }
}

fn feature_id_value(feature: &GeoJsonFeature) -> Option<Value> {
    feature.id.as_ref().map(|id| match id {
        Id::String(s) => Value::String(s.clone()),
        Id::Number(n) => Value::Number(n.clone()),
    })
}

/// Identifier a feature is sent under in `/predict_all`
///
/// Same resolution as [`Building::from_feature`]: `properties.id`, then the
/// GeoJSON `id` member, then [`UNKNOWN_ID`](crate::geometric::attributes::UNKNOWN_ID).
pub fn building_id(feature: &GeoJsonFeature) -> String {
    resolve_id(feature.properties.as_ref(), feature_id_value(feature).as_ref())
}

/// Feature vector of a typed GeoJSON feature
pub fn assemble(feature: &GeoJsonFeature, config: &EnergyMapConfig) -> FeatureVector {
    Building::from_feature(feature, config).feature_vector()
}

/// Feature vector of a loosely-typed feature value
pub fn assemble_value(feature: &Value, config: &EnergyMapConfig) -> FeatureVector {
    Building::from_value(feature, config).feature_vector()
}

/// Parse a GeoJSON document into a feature collection
///
/// A single Feature is wrapped into a one-element collection.
pub fn read_feature_collection(geojson_str: &str) -> Result<FeatureCollection> {
    let geojson: GeoJson = geojson_str.parse()?;
    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        GeoJson::Feature(f) => Ok(FeatureCollection {
            bbox: None,
            features: vec![f],
            foreign_members: None,
        }),
        GeoJson::Geometry(_) => Err(EnergyMapError::UnsupportedGeoJson),
    }
}

/// Buildings of a feature collection, in feature order
///
/// Each building is assembled independently; with the `rayon` feature the
/// work is spread across threads.
#[derive(Debug, Clone, Default)]
pub struct BuildingCollection {
    pub buildings: Vec<Building>,
}

impl BuildingCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble every feature of a collection
    pub fn from_feature_collection(fc: &FeatureCollection, config: &EnergyMapConfig) -> Self {
        #[cfg(feature = "rayon")]
        let buildings: Vec<Building> = fc
            .features
            .par_iter()
            .map(|feature| Building::from_feature(feature, config))
            .collect();

        #[cfg(not(feature = "rayon"))]
        let buildings: Vec<Building> = fc
            .features
            .iter()
            .map(|feature| Building::from_feature(feature, config))
            .collect();

        log::info!("assembled {} building feature vectors", buildings.len());
        BuildingCollection { buildings }
    }

    /// Load buildings from a GeoJSON Feature or FeatureCollection string
    pub fn from_geojson(geojson_str: &str, config: &EnergyMapConfig) -> Result<Self> {
        let fc = read_feature_collection(geojson_str)?;
        Ok(Self::from_feature_collection(&fc, config))
    }

    pub fn add_building(&mut self, building: Building) {
        self.buildings.push(building);
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn records(&self) -> Vec<BuildingRecord> {
        self.buildings.iter().map(Building::record).collect()
    }

    /// Request body for `/predict_all`
    pub fn batch_request(&self) -> BatchRequest {
        BatchRequest {
            buildings: self.records(),
        }
    }

    /// Total roof area over all buildings
    pub fn total_roof_area(&self) -> f64 {
        self.buildings.iter().map(|b| b.roof_area).sum()
    }
}
