//! Building feature extraction for heating/cooling load prediction
//!
//! Turns GeoJSON building footprints into the fixed numeric feature vector
//! expected by the load prediction service, and merges the predictions
//! back into the feature collection for display.

pub mod collect;
pub mod commons;
pub mod config;
pub mod error;
pub mod geo_core;
pub mod geometric;

pub use config::{EnergyMapConfig, RoofAreaSource};
pub use error::EnergyMapError;
pub use geometric::building::{
    assemble, assemble_value, BatchRequest, Building, BuildingCollection, BuildingRecord,
    FeatureVector,
};
