use geojson::FeatureCollection;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::error::Result;
use crate::geometric::attributes::UNKNOWN_ID;
use crate::geometric::building::{building_id, BuildingRecord, FeatureVector};

/// Property written onto features for the predicted heating load
pub const HEATING_LOAD_PROPERTY: &str = "heating_load";

/// Property written onto features for the predicted cooling load
pub const COOLING_LOAD_PROPERTY: &str = "cooling_load";

/// Load values arrive either as a bare number or as an array of numbers
fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(f64),
        Many(Vec<f64>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
        None => Vec::new(),
    })
}

/// Response of `/predict`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(default, deserialize_with = "one_or_many")]
    pub heating_load_prediction: Vec<f64>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub cooling_load_prediction: Vec<f64>,
}

impl Prediction {
    pub fn heating_load(&self) -> Option<f64> {
        self.heating_load_prediction.first().copied()
    }

    pub fn cooling_load(&self) -> Option<f64> {
        self.cooling_load_prediction.first().copied()
    }
}

/// One element of the `/predict_all` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingPrediction {
    /// Missing ids come back as `null` and never match a feature
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub prediction: Prediction,
}

/// The external load model
///
/// Implementations own transport concerns; feature extraction hands them
/// finished vectors and never sees transport errors.
pub trait PredictionService {
    /// Predict loads for a single building
    fn predict(&self, vector: &FeatureVector) -> Result<Prediction>;

    /// Predict loads for many buildings in one request
    fn predict_all(&self, buildings: &[BuildingRecord]) -> Result<Vec<BuildingPrediction>>;
}

/// Write predicted loads onto the features they belong to
///
/// Features are matched on the id they were sent under (see [`building_id`]).
/// Features without an id or without a matching prediction are left
/// untouched. Returns the number of features updated.
pub fn apply_predictions(fc: &mut FeatureCollection, predictions: &[BuildingPrediction]) -> usize {
    let by_id: HashMap<&str, &Prediction> = predictions
        .iter()
        .filter_map(|p| p.id.as_deref().map(|id| (id, &p.prediction)))
        .collect();

    let mut updated = 0;
    for feature in fc.features.iter_mut() {
        let id = building_id(feature);
        if id == UNKNOWN_ID {
            continue;
        }
        let Some(prediction) = by_id.get(id.as_str()) else {
            continue;
        };

        if let Some(heating) = prediction.heating_load() {
            feature.set_property(HEATING_LOAD_PROPERTY, heating);
        }
        if let Some(cooling) = prediction.cooling_load() {
            feature.set_property(COOLING_LOAD_PROPERTY, cooling);
        }
        updated += 1;
    }

    log::info!(
        "merged predictions into {} of {} features",
        updated,
        fc.features.len()
    );
    updated
}
