//! Simulation configuration loaded from TOML
//!
//! Starting values for households and the constants that drive the yearly
//! update are collected here with explanations of their purpose.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{Result, SimError};

/// Starting state shared by every household at setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdConfig {
    /// Population of each household at year 0
    pub num_workers: u32,
    /// Grain held by each household at year 0
    pub grain: f64,
    /// Grain one worker can harvest per year before fertility limits apply
    pub worker_capability: f64,
    /// Lower bound of the uniform competency draw, in (0, 1)
    pub min_competency: f64,
    /// Lower bound of the uniform ambition draw, in (0, 1)
    pub min_ambition: f64,
}

/// Parameters that stay fixed for the whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantsConfig {
    /// Knowledge radius (in cells) per worker
    ///
    /// The radius bounds where a household may claim a field, where it may
    /// relocate, and which neighbours it meets during interactions.
    pub knowledge_ratio: f64,

    /// Claimable area (in cells) per worker, before ambition is applied
    pub claim_ratio: f64,

    /// Grain produced by one cell at fertility 1.0
    pub maximum_potential_yield: f64,

    /// Grain eaten by one worker per year
    pub worker_appetite: f64,

    /// Expected yearly population growth as a fraction of population
    ///
    /// The fractional part of the growth is realised stochastically, so a
    /// rate of 0.0 makes the grow phase deterministic.
    pub growth_rate: f64,

    /// Upper bound of the yearly competency/ambition drift step, in [0, 1]
    pub generational_variance: f64,

    /// Maximum relative change of worker capability per year, in [0, 1]
    pub capability_variance: f64,

    /// Fraction of people that survive a raid or a famine, in [0, 1]
    pub survival_probability: f64,

    /// Years between floods that restore fertility; 0 disables flooding
    pub flood_frequency: u32,

    /// Number of years to simulate
    pub num_generations: u32,
}

/// Grayscale map images used by the CLI host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub river: PathBuf,
    pub fertility: PathBuf,
}

/// Complete configuration of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Master seed; every random draw of the run derives from it
    #[serde(default = "default_seed")]
    pub seed: u64,
    pub num_households: u32,
    pub households: HouseholdConfig,
    pub constants: ConstantsConfig,
    #[serde(default)]
    pub maps: Option<MapConfig>,
}

fn default_seed() -> u64 {
    12345
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            num_households: 30,
            households: HouseholdConfig {
                num_workers: 5,
                grain: 1000.0,
                worker_capability: 50.0,
                min_competency: 0.5,
                min_ambition: 0.2,
            },
            constants: ConstantsConfig {
                knowledge_ratio: 1.0,
                claim_ratio: 2.0,
                maximum_potential_yield: 1600.0,
                worker_appetite: 100.0,
                growth_rate: 0.05,
                generational_variance: 0.1,
                capability_variance: 0.05,
                survival_probability: 0.7,
                flood_frequency: 1,
                num_generations: 500,
            },
            maps: None,
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// Relative map paths are resolved against the directory of the file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;

        if let (Some(maps), Some(dir)) = (config.maps.as_mut(), path.parent()) {
            if maps.river.is_relative() {
                maps.river = dir.join(&maps.river);
            }
            if maps.fertility.is_relative() {
                maps.fertility = dir.join(&maps.fertility);
            }
        }

        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let h = &self.households;
        let c = &self.constants;

        if self.num_households == 0 {
            return Err(SimError::Config("num_households must be at least 1".into()));
        }

        check_open_unit("min_competency", h.min_competency)?;
        check_open_unit("min_ambition", h.min_ambition)?;
        check_non_negative("grain", h.grain)?;
        check_non_negative("worker_capability", h.worker_capability)?;

        check_non_negative("knowledge_ratio", c.knowledge_ratio)?;
        check_non_negative("claim_ratio", c.claim_ratio)?;
        check_non_negative("maximum_potential_yield", c.maximum_potential_yield)?;
        check_non_negative("growth_rate", c.growth_rate)?;

        // Appetite divides the famine deficit
        if !(c.worker_appetite.is_finite() && c.worker_appetite > 0.0) {
            return Err(SimError::Config(format!(
                "worker_appetite must be positive, got {}",
                c.worker_appetite
            )));
        }

        check_closed_unit("generational_variance", c.generational_variance)?;
        check_closed_unit("capability_variance", c.capability_variance)?;
        check_closed_unit("survival_probability", c.survival_probability)?;

        Ok(())
    }
}

fn check_non_negative(key: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::Config(format!("{} must be >= 0, got {}", key, value)))
    }
}

fn check_open_unit(key: &str, value: f64) -> Result<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(SimError::Config(format!("{} must lie in (0, 1), got {}", key, value)))
    }
}

fn check_closed_unit(key: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::Config(format!("{} must lie in [0, 1], got {}", key, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        seed = 7
        num_households = 12

        [households]
        num_workers = 5
        grain = 1000.0
        worker_capability = 50.0
        min_competency = 0.5
        min_ambition = 0.2

        [constants]
        knowledge_ratio = 1.0
        claim_ratio = 2.0
        maximum_potential_yield = 1600.0
        worker_appetite = 100.0
        growth_rate = 0.05
        generational_variance = 0.1
        capability_variance = 0.05
        survival_probability = 0.7
        flood_frequency = 1
        num_generations = 50
    "#;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_parse_sample() {
        let config = SimulationConfig::from_toml_str(SAMPLE).expect("sample should parse");
        assert_eq!(config.seed, 7);
        assert_eq!(config.num_households, 12);
        assert_eq!(config.households.num_workers, 5);
        assert_eq!(config.constants.num_generations, 50);
        assert!(config.maps.is_none());
    }

    #[test]
    fn test_seed_defaults_when_missing() {
        let without_seed = SAMPLE.replace("seed = 7", "");
        let config = SimulationConfig::from_toml_str(&without_seed).unwrap();
        assert_eq!(config.seed, 12345);
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let missing = SAMPLE.replace("worker_appetite = 100.0", "");
        let err = SimulationConfig::from_toml_str(&missing).unwrap_err();
        assert!(matches!(err, SimError::Toml(_)));
        assert!(err.to_string().contains("worker_appetite"));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut config = SimulationConfig::default();
        config.households.min_competency = 1.0;
        assert!(matches!(config.validate(), Err(SimError::Config(_))));

        let mut config = SimulationConfig::default();
        config.constants.survival_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.constants.worker_appetite = 0.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.num_households = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_map_paths_parse() {
        let with_maps = format!(
            "{}\n[maps]\nriver = \"maps/river.png\"\nfertility = \"maps/fertility.png\"\n",
            SAMPLE
        );
        let config = SimulationConfig::from_toml_str(&with_maps).unwrap();
        let maps = config.maps.expect("maps table present");
        assert_eq!(maps.river, PathBuf::from("maps/river.png"));
    }
}
