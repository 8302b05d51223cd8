use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::collect::global_variables::{PREDICT_ALL_PATH, PREDICT_PATH, REQUEST_TIMEOUT_SECS};
use crate::collect::prediction::{BuildingPrediction, Prediction, PredictionService};
use crate::error::{EnergyMapError, Result};
use crate::geometric::building::{BatchRequest, BuildingRecord, FeatureVector};

/// Blocking JSON client for the prediction service
pub struct HttpPredictionService {
    client: Client,
    predict_url: Url,
    predict_all_url: Url,
}

impl HttpPredictionService {
    /// Create a client for the service rooted at `endpoint`, e.g. `http://localhost:5000`
    pub fn new(endpoint: &str) -> Result<Self> {
        // A trailing slash keeps `join` from replacing the last path segment
        let mut base = Url::parse(endpoint.trim())?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(HttpPredictionService {
            client,
            predict_url: base.join(PREDICT_PATH)?,
            predict_all_url: base.join(PREDICT_ALL_PATH)?,
        })
    }

    pub fn predict_url(&self) -> &Url {
        &self.predict_url
    }

    pub fn predict_all_url(&self) -> &Url {
        &self.predict_all_url
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(&self, url: &Url, body: &B) -> Result<T> {
        log::info!("POST {}", url);
        let response = self
            .client
            .post(url.clone())
            .header("Content-Type", "application/json")
            .json(body)
            .send()?;
        Self::read_json(response)
    }

    fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            log::warn!("prediction service returned {}: {}", status, body);
            return Err(EnergyMapError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl PredictionService for HttpPredictionService {
    fn predict(&self, vector: &FeatureVector) -> Result<Prediction> {
        self.post_json(&self.predict_url, vector)
    }

    fn predict_all(&self, buildings: &[BuildingRecord]) -> Result<Vec<BuildingPrediction>> {
        let request = BatchRequest {
            buildings: buildings.to_vec(),
        };
        let predictions: Vec<BuildingPrediction> = self.post_json(&self.predict_all_url, &request)?;
        log::info!(
            "received {} predictions for {} buildings",
            predictions.len(),
            buildings.len()
        );
        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_from_endpoint() {
        let service = HttpPredictionService::new("http://localhost:5000").unwrap();
        assert_eq!(service.predict_url().as_str(), "http://localhost:5000/predict");
        assert_eq!(service.predict_all_url().as_str(), "http://localhost:5000/predict_all");
    }

    #[test]
    fn test_routes_keep_base_path() {
        let service = HttpPredictionService::new("https://example.org/api/v1").unwrap();
        assert_eq!(service.predict_all_url().as_str(), "https://example.org/api/v1/predict_all");

        let service = HttpPredictionService::new("https://example.org/api/v1/").unwrap();
        assert_eq!(service.predict_url().as_str(), "https://example.org/api/v1/predict");
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = HttpPredictionService::new("not a url").err().unwrap();
        assert!(matches!(err, EnergyMapError::Url(_)));
    }
}
