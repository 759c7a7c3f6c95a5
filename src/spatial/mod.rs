//! Spatial data structures

pub mod grid;

pub use grid::{Grid, RegionBounds};
