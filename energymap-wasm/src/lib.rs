use geojson::{FeatureCollection, GeoJson};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use energymap::collect::global_variables::{PREDICT_ALL_PATH, PREDICT_PATH};
use energymap::collect::prediction::{self, BuildingPrediction};
use energymap::commons::basic_functions;
use energymap::geo_core::CoordinateSpace;
use energymap::geometric::building::read_feature_collection;
use energymap::geometric::orientation;
use energymap::{assemble_value, BuildingCollection, EnergyMapConfig, FeatureVector};

/// Initialize the WASM module with panic hook
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| js_error("Serialization failed", e))
}

/// Parse an optional JSON config; `None` gives the defaults
fn parse_config(config_json: Option<String>) -> Result<EnergyMapConfig, JsValue> {
    match config_json {
        Some(json) => EnergyMapConfig::from_json_str(&json).map_err(|e| js_error("Invalid config", e)),
        None => Ok(EnergyMapConfig::default()),
    }
}

/// Feature vector of a single map feature
///
/// # Arguments
/// * `feature` - Feature object as handed over by the map; need not be strict GeoJSON
/// * `config_json` - Optional JSON config overriding the defaults
///
/// # Returns
/// The `/predict` request body as a plain object
#[wasm_bindgen]
pub fn feature_vector(feature: JsValue, config_json: Option<String>) -> Result<JsValue, JsValue> {
    to_js(&assemble_js(feature, config_json)?)
}

fn assemble_js(feature: JsValue, config_json: Option<String>) -> Result<FeatureVector, JsValue> {
    let config = parse_config(config_json)?;
    let feature: serde_json::Value =
        serde_wasm_bindgen::from_value(feature).map_err(|e| js_error("Invalid feature", e))?;
    Ok(assemble_value(&feature, &config))
}

/// Building collection wrapper for WASM
///
/// Keeps the source features so predictions can be merged back for display.
#[wasm_bindgen]
pub struct WasmBuildingCollection {
    features: FeatureCollection,
    collection: BuildingCollection,
}

#[wasm_bindgen]
impl WasmBuildingCollection {
    /// Load buildings from GeoJSON string
    ///
    /// # Errors
    /// Returns JsValue error if GeoJSON or config parsing fails
    #[wasm_bindgen]
    pub fn from_geojson(
        geojson_str: &str,
        config_json: Option<String>,
    ) -> Result<WasmBuildingCollection, JsValue> {
        let config = parse_config(config_json)?;
        let features =
            read_feature_collection(geojson_str).map_err(|e| js_error("Invalid GeoJSON", e))?;
        let collection = BuildingCollection::from_feature_collection(&features, &config);
        Ok(WasmBuildingCollection {
            features,
            collection,
        })
    }

    /// Get the number of buildings in the collection
    #[wasm_bindgen]
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    /// Check if the collection is empty
    #[wasm_bindgen]
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    #[wasm_bindgen]
    pub fn total_roof_area(&self) -> f64 {
        self.collection.total_roof_area()
    }

    /// `/predict_all` request body as a plain object
    #[wasm_bindgen]
    pub fn payload(&self) -> Result<JsValue, JsValue> {
        to_js(&self.collection.batch_request())
    }

    /// `/predict_all` request body as a JSON string, ready for [`fetch_predictions`]
    #[wasm_bindgen]
    pub fn payload_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.collection.batch_request())
            .map_err(|e| js_error("Serialization failed", e))
    }

    /// Merge a `/predict_all` response into the features
    ///
    /// # Returns
    /// Number of features that received a prediction
    #[wasm_bindgen]
    pub fn apply_predictions(&mut self, predictions_json: &str) -> Result<usize, JsValue> {
        let predictions: Vec<BuildingPrediction> = serde_json::from_str(predictions_json)
            .map_err(|e| js_error("Invalid prediction response", e))?;
        Ok(prediction::apply_predictions(&mut self.features, &predictions))
    }

    /// Convert the features, with any merged predictions, to a GeoJSON string
    #[wasm_bindgen]
    pub fn to_geojson(&self) -> String {
        GeoJson::from(self.features.clone()).to_string()
    }
}

fn route(endpoint: &str, path: &str) -> String {
    format!("{}/{}", endpoint.trim().trim_end_matches('/'), path)
}

/// POST a JSON body and return the response text
async fn post_json(url: &str, body: &str) -> Result<String, JsValue> {
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode};

    let opts = {
        let init = RequestInit::new();
        init.set_method("POST");
        init.set_mode(RequestMode::Cors);
        init.set_body(&JsValue::from_str(body));
        init
    };

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|e| JsValue::from_str(&format!("Failed to create request: {:?}", e)))?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|e| JsValue::from_str(&format!("Failed to set headers: {:?}", e)))?;

    let window =
        web_sys::window().ok_or_else(|| JsValue::from_str("No window object available"))?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| JsValue::from_str(&format!("Network request failed: {:?}", e)))?;

    let resp: web_sys::Response = resp_value
        .dyn_into()
        .map_err(|_| JsValue::from_str("Invalid response type"))?;

    if !resp.ok() {
        return Err(JsValue::from_str(&format!(
            "Prediction service error {}: {}",
            resp.status(),
            resp.status_text()
        )));
    }

    let text_promise = resp
        .text()
        .map_err(|e| JsValue::from_str(&format!("Failed to get response text: {:?}", e)))?;

    let text = JsFuture::from(text_promise)
        .await
        .map_err(|e| JsValue::from_str(&format!("Failed to read response: {:?}", e)))?;

    text.as_string()
        .ok_or_else(|| JsValue::from_str("Response is not a valid string"))
}

/// Request predictions for a whole collection
///
/// # Arguments
/// * `endpoint` - Base URL of the prediction service, e.g. `http://localhost:5000`
/// * `payload_json` - Output of [`WasmBuildingCollection::payload_json`]
///
/// # Returns
/// The raw response, to be passed to [`WasmBuildingCollection::apply_predictions`]
#[wasm_bindgen]
pub async fn fetch_predictions(endpoint: String, payload_json: String) -> Result<String, JsValue> {
    post_json(&route(&endpoint, PREDICT_ALL_PATH), &payload_json).await
}

/// Request a prediction for a single map feature
///
/// # Returns
/// `{heating_load, cooling_load}`, each `undefined` when the service left it out
#[wasm_bindgen]
pub async fn fetch_prediction(
    endpoint: String,
    feature: JsValue,
    config_json: Option<String>,
) -> Result<JsValue, JsValue> {
    let vector = assemble_js(feature, config_json)?;
    let body = serde_json::to_string(&vector).map_err(|e| js_error("Serialization failed", e))?;

    let text = post_json(&route(&endpoint, PREDICT_PATH), &body).await?;
    let prediction: prediction::Prediction =
        serde_json::from_str(&text).map_err(|e| js_error("Invalid prediction response", e))?;

    to_js(&Loads {
        heating_load: prediction.heating_load(),
        cooling_load: prediction.cooling_load(),
    })
}

#[derive(Serialize)]
struct Loads {
    heating_load: Option<f64>,
    cooling_load: Option<f64>,
}

/// Display color for a predicted load in kWh
#[wasm_bindgen]
pub fn load_color(value: f64) -> String {
    basic_functions::load_color(value).to_string()
}

/// Extrusion color for a building height in meters
#[wasm_bindgen]
pub fn height_color(height: f64) -> String {
    basic_functions::height_color(height)
}

/// Orientation of a JSON-encoded longitude/latitude bounding box
#[wasm_bindgen]
pub fn orientation_from_bbox(bbox_json: &str) -> f64 {
    orientation::orientation_from_bbox_str(bbox_json, CoordinateSpace::Geographic)
}
