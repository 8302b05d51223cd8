/// Prediction service the front-end talks to when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";

/// Single-building prediction route
pub const PREDICT_PATH: &str = "predict";

/// Batch prediction route, body `{"buildings": [...]}`
pub const PREDICT_ALL_PATH: &str = "predict_all";

pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Constant `energy_code` sent with every vector
pub const DEFAULT_ENERGY_CODE: u32 = 1;

/// Constant `hvac_category` sent with every vector
pub const DEFAULT_HVAC_CATEGORY: u32 = 1;

/// Share of the facade assumed to be glazed
pub const DEFAULT_WINDOW_TO_WALL_RATIO: f64 = 0.3;
