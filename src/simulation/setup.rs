//! Building a simulation from configuration

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::HouseholdId;
use crate::environment::field::ResourceField;
use crate::environment::maps::LandscapeMaps;
use crate::household::agent::Household;
use crate::household::policy::RandomPolicy;
use crate::simulation::scheduler::Simulation;
use crate::spatial::grid::Grid;

/// Create `num_households` households, each with its own seeded policy
pub fn spawn_households(
    config: &SimulationConfig,
    river: &Grid<f64>,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Household>> {
    (0..config.num_households)
        .map(|_| {
            let id = HouseholdId::from_rng(rng);
            let policy = RandomPolicy::new(ChaCha8Rng::seed_from_u64(rng.gen()));
            Household::spawn(id, &config.households, Box::new(policy), river)
        })
        .collect()
}

impl Simulation {
    /// Validate the configuration and populate the given field
    pub fn from_config(config: &SimulationConfig, field: ResourceField) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let households = spawn_households(config, field.river(), &mut rng)?;

        tracing::info!(
            "Spawned {} households on a {} field (seed {})",
            households.len(),
            field.shape(),
            config.seed
        );

        Ok(Self::new(households, field, config.constants.clone(), rng))
    }

    /// Build the field from decoded maps, flooding at the configured interval
    pub fn from_maps(config: &SimulationConfig, maps: LandscapeMaps) -> Result<Self> {
        let field = ResourceField::new(maps.river, maps.fertility, config.constants.flood_frequency)?;
        Self::from_config(config, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SimError;
    use crate::core::types::Shape;

    #[test]
    fn test_spawn_is_reproducible() {
        let config = SimulationConfig::default();
        let river = Grid::filled(Shape::new(10, 10), 0.0);

        let a = spawn_households(&config, &river, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        let b = spawn_households(&config, &river, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();

        assert_eq!(a.len(), config.num_households as usize);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.position, y.position);
            assert_eq!(x.competency, y.competency);
        }
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = SimulationConfig::default();
        config.households.min_ambition = 0.0;
        let field = ResourceField::uniform(Shape::new(5, 5), 1.0, 1).unwrap();
        assert!(matches!(
            Simulation::from_config(&config, field),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn test_from_config_all_river_fails_fast() {
        let config = SimulationConfig::default();
        let shape = Shape::new(5, 5);
        let field = ResourceField::new(Grid::filled(shape, 1.0), Grid::filled(shape, 0.0), 1).unwrap();
        assert!(matches!(
            Simulation::from_config(&config, field),
            Err(SimError::DegenerateField { .. })
        ));
    }

    #[test]
    fn test_from_maps_uses_flood_frequency() {
        let mut config = SimulationConfig::default();
        config.constants.flood_frequency = 3;
        let shape = Shape::new(6, 6);
        let maps = LandscapeMaps {
            river: Grid::filled(shape, 0.0),
            fertility: Grid::filled(shape, 0.5),
        };
        let sim = Simulation::from_maps(&config, maps).unwrap();
        assert_eq!(sim.field().flood_interval(), 3);
        assert_eq!(sim.households().len(), 30);
        assert_eq!(sim.total_years(), config.constants.num_generations);
    }

    #[test]
    fn test_huge_knowledge_ratio_runs() {
        let mut config = SimulationConfig::default();
        config.num_households = 4;
        config.constants.knowledge_ratio = 1e19;
        config.constants.num_generations = 3;
        let field = ResourceField::uniform(Shape::new(10, 10), 1.0, 1).unwrap();

        let mut sim = Simulation::from_config(&config, field).unwrap();
        sim.run(|_| {});

        assert!(sim.is_finished());
        for h in sim.households() {
            assert!(sim.field().shape().contains(h.position));
        }
    }
}
