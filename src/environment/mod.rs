//! Landscape: fertility, river and floods

pub mod field;
pub mod maps;

pub use field::{ResourceField, Subgrid};
pub use maps::{load_maps, maps_from_luma, LandscapeMaps};
