//! Building type codes understood by the load model
//!
//! Raw features only carry a broad occupancy classification (`BOC`), e.g.
//! "Health and Medical". It is mapped to the closest model archetype
//! (Hospital) whose code (10) is sent as `Building_Type`.

use serde::{Deserialize, Serialize};

/// Model building archetypes, in code order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BuildingType {
    SmallHotel = 0,
    Retail = 1,
    Office = 2,
    Warehouse = 3,
    StripMall = 4,
    Outpatient = 5,
    FullServiceRestaurant = 6,
    QuickServiceRestaurant = 7,
    LargeHotel = 8,
    PrimarySchool = 9,
    Hospital = 10,
    SecondarySchool = 11,
}

/// Type used for missing or unknown occupancy classifications
pub const DEFAULT_BUILDING_TYPE: BuildingType = BuildingType::Office;

/// Occupancy classification → model archetype
const OCCUPANCY_TYPES: &[(&str, BuildingType)] = &[
    ("Residential", BuildingType::SmallHotel),
    ("Commercial", BuildingType::Retail),
    ("Assembly", BuildingType::FullServiceRestaurant),
    ("Education", BuildingType::PrimarySchool),
    ("Health and Medical", BuildingType::Hospital),
    ("Industrial", BuildingType::Warehouse),
    ("Government", BuildingType::Office),
    ("Utility and Misc", BuildingType::Warehouse),
    ("Unclassified", BuildingType::Office),
];

impl BuildingType {
    pub const ALL: [BuildingType; 12] = [
        BuildingType::SmallHotel,
        BuildingType::Retail,
        BuildingType::Office,
        BuildingType::Warehouse,
        BuildingType::StripMall,
        BuildingType::Outpatient,
        BuildingType::FullServiceRestaurant,
        BuildingType::QuickServiceRestaurant,
        BuildingType::LargeHotel,
        BuildingType::PrimarySchool,
        BuildingType::Hospital,
        BuildingType::SecondarySchool,
    ];

    /// Code sent as `Building_Type`, in `0..=11`
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    pub fn model_name(self) -> &'static str {
        match self {
            BuildingType::SmallHotel => "Small Hotel",
            BuildingType::Retail => "Retail",
            BuildingType::Office => "Office",
            BuildingType::Warehouse => "Warehouse",
            BuildingType::StripMall => "Strip Mall",
            BuildingType::Outpatient => "Outpatient",
            BuildingType::FullServiceRestaurant => "Full-Service Restaurant",
            BuildingType::QuickServiceRestaurant => "Quick-Service Restaurant",
            BuildingType::LargeHotel => "Large Hotel",
            BuildingType::PrimarySchool => "Primary School",
            BuildingType::Hospital => "Hospital",
            BuildingType::SecondarySchool => "Secondary School",
        }
    }

    /// Look up an archetype by model name
    ///
    /// Spacing, punctuation and case are ignored, so "WareHouse",
    /// "FullServiceRestaurant" and "full-service restaurant" all resolve.
    pub fn from_model_name(name: &str) -> Option<Self> {
        let wanted = compact(name);
        Self::ALL
            .into_iter()
            .find(|building_type| compact(building_type.model_name()) == wanted)
    }

    /// Archetype for an occupancy classification
    ///
    /// The value is trimmed and must match a classification exactly. Missing, empty
    /// or unknown classifications resolve to [`DEFAULT_BUILDING_TYPE`].
    pub fn from_occupancy(occupancy: Option<&str>) -> Self {
        let Some(occupancy) = occupancy.map(str::trim).filter(|o| !o.is_empty()) else {
            return DEFAULT_BUILDING_TYPE;
        };

        OCCUPANCY_TYPES
            .iter()
            .find(|(classification, _)| *classification == occupancy)
            .map(|(_, building_type)| *building_type)
            .unwrap_or_else(|| {
                log::debug!("unknown occupancy classification {occupancy:?}, using {DEFAULT_BUILDING_TYPE:?}");
                DEFAULT_BUILDING_TYPE
            })
    }
}

fn compact(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// `Building_Type` code for an occupancy classification
pub fn occupancy_to_code(occupancy: Option<&str>) -> u8 {
    BuildingType::from_occupancy(occupancy).code()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_classifications() {
        assert_eq!(occupancy_to_code(Some("Health and Medical")), 10);
        assert_eq!(occupancy_to_code(Some("Residential")), 0);
        assert_eq!(occupancy_to_code(Some("Commercial")), 1);
        assert_eq!(occupancy_to_code(Some("Assembly")), 6);
        assert_eq!(occupancy_to_code(Some("Education")), 9);
        assert_eq!(occupancy_to_code(Some("Industrial")), 3);
        assert_eq!(occupancy_to_code(Some("Utility and Misc")), 3);
        assert_eq!(occupancy_to_code(Some("Government")), 2);
    }

    #[test]
    fn test_fallback_to_office() {
        assert_eq!(occupancy_to_code(None), 2);
        assert_eq!(occupancy_to_code(Some("")), 2);
        assert_eq!(occupancy_to_code(Some("   ")), 2);
        assert_eq!(occupancy_to_code(Some("Unclassified")), 2);
        assert_eq!(occupancy_to_code(Some("Spaceport")), 2);
    }

    #[test]
    fn test_trimmed_exact_match() {
        assert_eq!(occupancy_to_code(Some("  Health and Medical \n")), 10);
        assert_eq!(occupancy_to_code(Some("residential")), 2);
        assert_eq!(occupancy_to_code(Some("HEALTH AND MEDICAL")), 2);
    }

    #[test]
    fn test_codes_cover_range() {
        for (index, building_type) in BuildingType::ALL.iter().enumerate() {
            assert_eq!(usize::from(building_type.code()), index);
            assert_eq!(BuildingType::from_code(building_type.code()), Some(*building_type));
        }
        assert_eq!(BuildingType::from_code(12), None);
    }

    #[test]
    fn test_model_names() {
        assert_eq!(BuildingType::from_model_name("WareHouse"), Some(BuildingType::Warehouse));
        assert_eq!(
            BuildingType::from_model_name("FullServiceRestaurant"),
            Some(BuildingType::FullServiceRestaurant)
        );
        assert_eq!(BuildingType::from_model_name("Small Hotel"), Some(BuildingType::SmallHotel));
        assert_eq!(BuildingType::from_model_name("Castle"), None);
    }
}
