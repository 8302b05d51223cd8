use thiserror::Error;

/// Failures outside the feature-extraction core
///
/// Extraction itself never fails; these cover whole documents that cannot
/// be read, bad configuration, and the prediction service boundary.
#[derive(Debug, Error)]
pub enum EnergyMapError {
    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("GeoJSON must be a Feature or FeatureCollection")]
    UnsupportedGeoJson,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[cfg(feature = "reqwest")]
    #[error("prediction request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("prediction service returned {status}: {body}")]
    Status { status: u16, body: String },
}

pub type Result<T, E = EnergyMapError> = std::result::Result<T, E>;
