//! ResourceField - fertility and river grids of the landscape
//!
//! Fertility is depleted by farming and periodically restored by a flood.
//! The river grid is fixed after construction and shared read-only with
//! snapshots.

use std::sync::Arc;

use crate::core::error::{Result, SimError};
use crate::core::types::{Position, Shape, Year};
use crate::spatial::grid::{Grid, RegionBounds};

/// Fertility values of a claimed window, read before harvesting
#[derive(Debug, Clone, PartialEq)]
pub struct Subgrid {
    pub bounds: RegionBounds,
    pub values: Vec<f64>,
}

impl Subgrid {
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// The simulation landscape
#[derive(Debug, Clone)]
pub struct ResourceField {
    fertility: Grid<f64>,
    river: Arc<Grid<f64>>,
    flood_reserve: Grid<f64>,
    flood_interval: u32,
}

impl ResourceField {
    /// Create a field from same-shaped river and fertility grids
    ///
    /// River cells hold 1.0, land cells 0.0. Fertility values are clamped
    /// into [0, 1].
    pub fn new(river: Grid<f64>, mut fertility: Grid<f64>, flood_interval: u32) -> Result<Self> {
        if river.shape() != fertility.shape() {
            return Err(SimError::ShapeMismatch {
                river: river.shape(),
                fertility: fertility.shape(),
            });
        }
        if river.shape().cell_count() == 0 {
            return Err(SimError::EmptyMap);
        }

        let bounds = RegionBounds {
            x_start: 0,
            x_end: fertility.shape().cols,
            y_start: 0,
            y_end: fertility.shape().rows,
        };
        fertility.region_mut(bounds, |v| *v = v.clamp(0.0, 1.0));

        tracing::info!(
            "Resource field {} ({} river cells, flood every {} years)",
            river.shape(),
            river.values().iter().filter(|&&v| v >= 1.0).count(),
            flood_interval
        );

        Ok(Self {
            flood_reserve: fertility.clone(),
            fertility,
            river: Arc::new(river),
            flood_interval,
        })
    }

    /// Uniform field without river cells
    pub fn uniform(shape: Shape, fertility: f64, flood_interval: u32) -> Result<Self> {
        Self::new(Grid::filled(shape, 0.0), Grid::filled(shape, fertility), flood_interval)
    }

    pub fn shape(&self) -> Shape {
        self.fertility.shape()
    }

    pub fn flood_interval(&self) -> u32 {
        self.flood_interval
    }

    pub fn fertility(&self) -> &Grid<f64> {
        &self.fertility
    }

    pub fn river(&self) -> &Grid<f64> {
        &self.river
    }

    /// Shared handle to the immutable river grid
    pub fn river_handle(&self) -> Arc<Grid<f64>> {
        Arc::clone(&self.river)
    }

    /// True for river cells; positions outside the field are not river
    pub fn is_river(&self, pos: Position) -> bool {
        self.river.at(pos).is_some_and(|&v| v >= 1.0)
    }

    /// Clamped window covered by a claim of `area` cells around `center`
    pub fn claim_bounds(&self, center: Position, area: f64) -> RegionBounds {
        let side = if area.is_finite() && area > 0.0 {
            area.sqrt().floor() as usize
        } else {
            0
        };
        RegionBounds::square(center, side, self.shape())
    }

    /// Fertility values of the claimed window
    pub fn harvestable_region(&self, center: Position, area: f64) -> Subgrid {
        let bounds = self.claim_bounds(center, area);
        Subgrid {
            bounds,
            values: self.fertility.region(bounds).copied().collect(),
        }
    }

    /// Scale the fertility of the claimed window by the unharvested fraction
    pub fn deplete_region(&mut self, center: Position, area: f64, fraction_remaining: f64) {
        let bounds = self.claim_bounds(center, area);
        let fraction = fraction_remaining.clamp(0.0, 1.0);
        self.fertility.region_mut(bounds, |v| *v *= fraction);
    }

    /// Restore fertility from the flood reserve on flood years
    ///
    /// Returns true if a flood happened.
    pub fn flood(&mut self, year: Year) -> bool {
        if self.flood_interval == 0 || year % self.flood_interval != 0 {
            return false;
        }
        self.fertility.clone_from(&self.flood_reserve);
        self.flood_reserve.clone_from(&self.fertility);
        tracing::debug!("Flood in year {} restored fertility", year);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn river_column_field() -> ResourceField {
        let shape = Shape::new(5, 5);
        let river = Grid::from_fn(shape, |x, _| if x == 2 { 1.0 } else { 0.0 });
        let fertility = Grid::from_fn(shape, |x, _| if x == 2 { 0.0 } else { 0.8 });
        ResourceField::new(river, fertility, 2).unwrap()
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let river = Grid::filled(Shape::new(3, 3), 0.0);
        let fertility = Grid::filled(Shape::new(3, 4), 1.0);
        let err = ResourceField::new(river, fertility, 1).unwrap_err();
        assert!(matches!(err, SimError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_empty_map_rejected() {
        let err = ResourceField::uniform(Shape::new(0, 0), 1.0, 1).unwrap_err();
        assert!(matches!(err, SimError::EmptyMap));
    }

    #[test]
    fn test_is_river() {
        let field = river_column_field();
        assert!(field.is_river(Position::new(2, 0)));
        assert!(!field.is_river(Position::new(1, 0)));
        assert!(!field.is_river(Position::new(9, 9)));
    }

    #[test]
    fn test_harvestable_region_square() {
        let field = ResourceField::uniform(Shape::new(10, 10), 1.0, 0).unwrap();
        // floor(sqrt(10)) = 3
        let region = field.harvestable_region(Position::new(5, 5), 10.0);
        assert_eq!(region.values.len(), 9);
        assert_eq!(region.sum(), 9.0);
    }

    #[test]
    fn test_harvestable_region_zero_area() {
        let field = ResourceField::uniform(Shape::new(10, 10), 1.0, 0).unwrap();
        assert!(field.harvestable_region(Position::new(5, 5), 0.0).values.is_empty());
        assert!(field.harvestable_region(Position::new(5, 5), 0.9).values.is_empty());
    }

    #[test]
    fn test_deplete_uses_same_window() {
        let mut field = ResourceField::uniform(Shape::new(10, 10), 1.0, 0).unwrap();
        let center = Position::new(9, 0);
        let before = field.harvestable_region(center, 16.0);
        field.deplete_region(center, 16.0, 0.25);
        let after = field.harvestable_region(center, 16.0);

        assert_eq!(before.bounds, after.bounds);
        assert!(after.values.iter().all(|&v| v == 0.25));
        let total: f64 = field.fertility().values().iter().sum();
        assert_eq!(total, 100.0 - before.values.len() as f64 * 0.75);
    }

    #[test]
    fn test_flood_restores_on_interval() {
        let mut field = river_column_field();
        let original = field.fertility().clone();

        field.deplete_region(Position::new(0, 0), 4.0, 0.0);
        assert_ne!(field.fertility(), &original);

        assert!(!field.flood(1));
        assert_ne!(field.fertility(), &original);

        assert!(field.flood(2));
        assert_eq!(field.fertility(), &original);
    }

    #[test]
    fn test_flood_disabled() {
        let mut field = ResourceField::uniform(Shape::new(4, 4), 1.0, 0).unwrap();
        field.deplete_region(Position::new(1, 1), 4.0, 0.5);
        let depleted = field.fertility().clone();
        assert!(!field.flood(0));
        assert_eq!(field.fertility(), &depleted);
    }
}
