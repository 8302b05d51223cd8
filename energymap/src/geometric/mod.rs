pub mod attributes;
pub mod building;
pub mod building_type;
pub mod orientation;
pub mod ring;
pub mod roof_area;
pub mod shape;
