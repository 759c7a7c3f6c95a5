//! Per-year statistics snapshot
//!
//! A snapshot is a frozen copy assembled by the scheduler after the
//! production and conflict phases of a year. Consumers never see live
//! household state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::config::ConstantsConfig;
use crate::core::types::{HouseholdId, Stance, Year};
use crate::household::agent::Household;
use crate::spatial::grid::Grid;

/// Statistics of one household
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HouseholdStats {
    pub id: HouseholdId,
    pub x_pos: i64,
    pub y_pos: i64,
    pub knowledge_radius: f64,
    pub population: u32,
    pub grain: f64,
    pub worker_capability: f64,
    pub interaction_stance: Stance,
    pub competency: f64,
    pub ambition: f64,
}

impl HouseholdStats {
    pub fn from_household(household: &Household, constants: &ConstantsConfig) -> Self {
        Self {
            id: household.id,
            x_pos: household.position.x,
            y_pos: household.position.y,
            knowledge_radius: household.knowledge_radius(constants),
            population: household.population,
            grain: household.grain,
            worker_capability: household.worker_capability,
            interaction_stance: household.stance,
            competency: household.competency,
            ambition: household.ambition,
        }
    }
}

/// Aggregates over all live households plus the year's event counts
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub live_households: usize,
    pub total_population: u64,
    pub total_grain: f64,
    pub gini_coefficient: f64,
    pub plunders: u32,
    pub collaborations: u32,
    pub extinctions: u32,
}

/// Everything a presentation layer needs to draw one year
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct YearSnapshot {
    pub year: Year,
    pub households: Vec<HouseholdStats>,
    pub fertility: Grid<f64>,
    pub river: Arc<Grid<f64>>,
    pub summary: YearSummary,
}

/// Gini coefficient of a wealth distribution
///
/// Computed from the area under the Lorenz curve of the ascending
/// distribution. Returns 0.0 for fewer than two holders or no wealth.
pub fn gini_coefficient(wealth: &[f64]) -> f64 {
    let n = wealth.len();
    let total: f64 = wealth.iter().sum();
    if n < 2 || total <= 0.0 {
        return 0.0;
    }

    let mut sorted = wealth.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n_f = n as f64;
    let population_share = 1.0 / n_f;
    let score: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let richer_share = (n - 1 - i) as f64 / n_f;
            (w / total) * (population_share + 2.0 * richer_share)
        })
        .sum();

    (1.0 - score).clamp(0.0, 1.0)
}
