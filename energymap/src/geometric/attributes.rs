//! Property lookups with static fallbacks
//!
//! Feature properties are sparse: any attribute may be missing, null or of
//! the wrong type. Each resolver returns a usable value regardless.

use serde_json::{Map, Value};

/// Height used when a feature carries none, in meters
pub const DEFAULT_HEIGHT_M: f64 = 3.0;

/// Story count used when a feature carries none
pub const DEFAULT_STORIES: u32 = 1;

/// Identifier used when a feature has no `id`
pub const UNKNOWN_ID: &str = "Unknown";

pub const HEIGHT_KEYS: &[&str] = &["height", "Building_Height"];
pub const STORIES_KEYS: &[&str] = &["stories", "num_floors", "Building_Stories", "storeys"];
pub const SHAPE_AREA_KEYS: &[&str] = &["Shape__Area"];
pub const OCCUPANCY_KEYS: &[&str] = &["BOC", "boc", "occupancy"];

/// Properties of a feature
pub type Properties = Map<String, Value>;

/// First positive, finite number found under `keys`
pub fn extract_numeric_property(props: Option<&Properties>, keys: &[&str]) -> Option<f64> {
    let props = props?;
    keys.iter()
        .filter_map(|key| props.get(*key))
        .filter_map(Value::as_f64)
        .find(|value| value.is_finite() && *value > 0.0)
}

/// First non-empty string found under `keys`
pub fn extract_string_property<'a>(props: Option<&'a Properties>, keys: &[&str]) -> Option<&'a str> {
    let props = props?;
    keys.iter()
        .filter_map(|key| props.get(*key))
        .filter_map(Value::as_str)
        .find(|value| !value.trim().is_empty())
}

/// Building height in meters, or `default` when absent
pub fn resolve_height(props: Option<&Properties>, default: f64) -> f64 {
    extract_numeric_property(props, HEIGHT_KEYS).unwrap_or(default)
}

/// Number of stories, rounded to a whole story, or `default` when absent
pub fn resolve_stories(props: Option<&Properties>, default: u32) -> u32 {
    extract_numeric_property(props, STORIES_KEYS)
        .map(|stories| (stories.round() as u32).max(1))
        .unwrap_or(default)
}

/// Footprint area recorded in the source dataset, if any
pub fn resolve_shape_area(props: Option<&Properties>) -> Option<f64> {
    extract_numeric_property(props, SHAPE_AREA_KEYS)
}

/// Occupancy classification, if any
pub fn resolve_occupancy(props: Option<&Properties>) -> Option<&str> {
    extract_string_property(props, OCCUPANCY_KEYS)
}

/// Render an identifier value as a string; null and structured values don't count
fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Feature identifier: `properties.id`, then the feature's own id, then [`UNKNOWN_ID`]
pub fn resolve_id(props: Option<&Properties>, feature_id: Option<&Value>) -> String {
    props
        .and_then(|props| props.get("id"))
        .and_then(id_to_string)
        .or_else(|| feature_id.and_then(id_to_string))
        .unwrap_or_else(|| UNKNOWN_ID.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Properties {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_height_default() {
        assert_eq!(resolve_height(None, DEFAULT_HEIGHT_M), 3.0);
        let p = props(json!({"name": "no height here"}));
        assert_eq!(resolve_height(Some(&p), DEFAULT_HEIGHT_M), 3.0);
    }

    #[test]
    fn test_height_from_properties() {
        let p = props(json!({"height": 12.5}));
        assert_eq!(resolve_height(Some(&p), DEFAULT_HEIGHT_M), 12.5);

        let p = props(json!({"height": 20}));
        assert_eq!(resolve_height(Some(&p), DEFAULT_HEIGHT_M), 20.0);
    }

    #[test]
    fn test_height_ignores_unusable_values() {
        for value in [json!(null), json!("12"), json!(-4.0), json!(0), json!([1])] {
            let p = props(json!({ "height": value }));
            assert_eq!(resolve_height(Some(&p), DEFAULT_HEIGHT_M), 3.0);
        }
    }

    #[test]
    fn test_stories() {
        assert_eq!(resolve_stories(None, DEFAULT_STORIES), 1);
        let p = props(json!({"num_floors": 4}));
        assert_eq!(resolve_stories(Some(&p), DEFAULT_STORIES), 4);
        let p = props(json!({"stories": 2.6}));
        assert_eq!(resolve_stories(Some(&p), DEFAULT_STORIES), 3);
        let p = props(json!({"stories": 0.2}));
        assert_eq!(resolve_stories(Some(&p), DEFAULT_STORIES), 1);
    }

    #[test]
    fn test_occupancy_and_shape_area() {
        let p = props(json!({"BOC": "Education", "Shape__Area": 250.0}));
        assert_eq!(resolve_occupancy(Some(&p)), Some("Education"));
        assert_eq!(resolve_shape_area(Some(&p)), Some(250.0));

        let p = props(json!({"BOC": "", "Shape__Area": 0}));
        assert_eq!(resolve_occupancy(Some(&p)), None);
        assert_eq!(resolve_shape_area(Some(&p)), None);
    }

    #[test]
    fn test_id_resolution() {
        let p = props(json!({"id": "08b2a"}));
        assert_eq!(resolve_id(Some(&p), Some(&json!(7))), "08b2a");
        assert_eq!(resolve_id(None, Some(&json!(7))), "7");
        assert_eq!(resolve_id(Some(&props(json!({"id": null}))), None), UNKNOWN_ID);
        assert_eq!(resolve_id(None, None), UNKNOWN_ID);
    }
}
