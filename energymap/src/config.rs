use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::collect::global_variables::{
    DEFAULT_ENDPOINT, DEFAULT_ENERGY_CODE, DEFAULT_HVAC_CATEGORY, DEFAULT_WINDOW_TO_WALL_RATIO,
};
use crate::error::EnergyMapError;
use crate::geo_core::CoordinateSpace;
use crate::geometric::attributes::{DEFAULT_HEIGHT_M, DEFAULT_STORIES};

/// Where the roof area comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoofAreaSource {
    /// Trust a positive `Shape__Area` property, derive from geometry otherwise
    #[default]
    PreferMetadata,
    /// Always derive from geometry
    Geometry,
}

/// Settings for feature vector assembly and the prediction endpoint
///
/// Every field has a default, so a config file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyMapConfig {
    /// Height in meters for features without one
    pub default_height: f64,
    /// Story count for features without one
    pub default_stories: u32,
    pub energy_code: u32,
    pub hvac_category: u32,
    /// Window area as a share of wall area, in `[0, 1]`
    pub window_to_wall_ratio: f64,
    pub coordinate_space: CoordinateSpace,
    pub roof_area_source: RoofAreaSource,
    /// Base URL of the prediction service
    pub endpoint: String,
}

impl Default for EnergyMapConfig {
    fn default() -> Self {
        EnergyMapConfig {
            default_height: DEFAULT_HEIGHT_M,
            default_stories: DEFAULT_STORIES,
            energy_code: DEFAULT_ENERGY_CODE,
            hvac_category: DEFAULT_HVAC_CATEGORY,
            window_to_wall_ratio: DEFAULT_WINDOW_TO_WALL_RATIO,
            coordinate_space: CoordinateSpace::default(),
            roof_area_source: RoofAreaSource::default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl EnergyMapConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, EnergyMapError> {
        let config: EnergyMapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = Self::from_json_str(&json)
            .with_context(|| format!("Failed to load config file: {:?}", path))?;
        log::debug!("loaded config from {:?}: {:?}", path, config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EnergyMapError> {
        if !(self.default_height.is_finite() && self.default_height > 0.0) {
            return Err(EnergyMapError::Config(format!(
                "default_height must be a positive number, got {}",
                self.default_height
            )));
        }
        if self.default_stories == 0 {
            return Err(EnergyMapError::Config(
                "default_stories must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.window_to_wall_ratio) {
            return Err(EnergyMapError::Config(format!(
                "window_to_wall_ratio must be within [0, 1], got {}",
                self.window_to_wall_ratio
            )));
        }
        if self.endpoint.trim().is_empty() {
            return Err(EnergyMapError::Config("endpoint must not be empty".to_string()));
        }
        Ok(())
    }
}
