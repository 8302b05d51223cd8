use serde::{Deserialize, Serialize};

/// Load range the display colors are calibrated for, in kWh
pub const LOAD_DISPLAY_MIN: f64 = 0.0;
pub const LOAD_DISPLAY_MAX: f64 = 10.0;

/// Height stops of the extrusion color ramp: (meters, RGB)
const HEIGHT_RAMP: [(f64, [u8; 3]); 3] = [
    (0.0, [0xd3, 0xd3, 0xd3]),  // lightgray
    (10.0, [0xad, 0xd8, 0xe6]), // lightblue
    (20.0, [0x41, 0x69, 0xe1]), // royalblue
];

/// Bucket of a predicted load within the display range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadLevel {
    Low,
    Medium,
    High,
}

impl LoadLevel {
    /// Classify `value` by its position in `[min, max]`: lower third is low,
    /// middle third medium, the rest high. Values outside the range clamp.
    pub fn classify(value: f64, min: f64, max: f64) -> Self {
        let span = max - min;
        let position = if span > 0.0 && value.is_finite() {
            (value.clamp(min, max) - min) / span
        } else {
            0.0
        };

        if position < 0.33 {
            LoadLevel::Low
        } else if position < 0.66 {
            LoadLevel::Medium
        } else {
            LoadLevel::High
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            LoadLevel::Low => "green",
            LoadLevel::Medium => "orange",
            LoadLevel::High => "red",
        }
    }
}

/// Display color of a load value over the default kWh range
pub fn load_color(value: f64) -> &'static str {
    LoadLevel::classify(value, LOAD_DISPLAY_MIN, LOAD_DISPLAY_MAX).color()
}

/// Extrusion color for a building height, linearly interpolated between
/// lightgray (0 m), lightblue (10 m) and royalblue (20 m and above)
pub fn height_color(height: f64) -> String {
    let height = if height.is_finite() { height } else { 0.0 };

    let rgb = match HEIGHT_RAMP.windows(2).find(|stops| height < stops[1].0) {
        Some(stops) => {
            let (h0, c0) = stops[0];
            let (h1, c1) = stops[1];
            let t = ((height - h0) / (h1 - h0)).clamp(0.0, 1.0);
            let mut rgb = [0u8; 3];
            for (channel, (a, b)) in rgb.iter_mut().zip(c0.iter().zip(c1.iter())) {
                *channel = (f64::from(*a) + (f64::from(*b) - f64::from(*a)) * t).round() as u8;
            }
            rgb
        }
        None => HEIGHT_RAMP[HEIGHT_RAMP.len() - 1].1,
    };

    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}
