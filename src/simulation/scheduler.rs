//! Yearly scheduler
//!
//! Drives every live household through the year's phases:
//!
//! 1. economy, richest first: reset, claim, farm, consume
//! 2. pairwise interactions between households whose knowledge circles meet
//! 3. snapshot for the presentation layer
//! 4. grow, generational changeover, relocate
//! 5. flood
//!
//! Everything runs on one thread in a fixed order; the fertility grid is
//! written by one household at a time.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use rand_chacha::ChaCha8Rng;

use crate::core::config::ConstantsConfig;
use crate::core::types::Year;
use crate::environment::field::ResourceField;
use crate::household::agent::Household;
use crate::household::interaction::{intersects, Resolution};
use crate::simulation::snapshot::{gini_coefficient, HouseholdStats, YearSnapshot, YearSummary};

/// Result of asking the scheduler for another year
#[derive(Debug)]
pub enum YearOutcome {
    Advanced(Box<YearSnapshot>),
    /// The run was already over; nothing changed
    Finished,
}

/// Event counts collected while a year runs
#[derive(Debug, Default, Clone, Copy)]
struct YearTally {
    plunders: u32,
    collaborations: u32,
    extinctions: u32,
}

/// The simulation: households, landscape and the year counter
pub struct Simulation {
    households: Vec<Household>,
    field: ResourceField,
    constants: ConstantsConfig,
    rng: ChaCha8Rng,
    current_year: Year,
    total_years: Year,
    households_at_start: usize,
}

impl Simulation {
    pub fn new(
        households: Vec<Household>,
        field: ResourceField,
        constants: ConstantsConfig,
        rng: ChaCha8Rng,
    ) -> Self {
        let total_years = constants.num_generations;
        let households_at_start = households.len();
        Self {
            households,
            field,
            constants,
            rng,
            current_year: 0,
            total_years,
            households_at_start,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.current_year >= self.total_years || self.households.is_empty()
    }

    pub fn current_year(&self) -> Year {
        self.current_year
    }

    pub fn total_years(&self) -> Year {
        self.total_years
    }

    pub fn households(&self) -> &[Household] {
        &self.households
    }

    pub fn households_at_start(&self) -> usize {
        self.households_at_start
    }

    pub fn field(&self) -> &ResourceField {
        &self.field
    }

    pub fn constants(&self) -> &ConstantsConfig {
        &self.constants
    }

    /// Run one simulated year
    ///
    /// Once the run is finished this is a no-op returning
    /// `YearOutcome::Finished`.
    pub fn advance_year(&mut self) -> YearOutcome {
        if self.is_finished() {
            return YearOutcome::Finished;
        }

        let mut tally = YearTally::default();

        // Stable: equal grain keeps the previous order
        self.households
            .sort_by_key(|h| Reverse(OrderedFloat(h.grain)));

        self.run_economy(&mut tally);
        self.run_interactions(&mut tally);

        let snapshot = self.snapshot(tally);
        tracing::debug!(
            "Year {}: {} households, population {}, grain {:.1}, gini {:.3}",
            snapshot.year,
            snapshot.summary.live_households,
            snapshot.summary.total_population,
            snapshot.summary.total_grain,
            snapshot.summary.gini_coefficient,
        );

        self.run_demographics();
        self.field.flood(self.current_year);
        self.current_year += 1;

        YearOutcome::Advanced(Box::new(snapshot))
    }

    /// Claim, farm and consume for every household in the current order
    fn run_economy(&mut self, tally: &mut YearTally) {
        let constants = &self.constants;
        let field = &mut self.field;

        for household in &mut self.households {
            household.reset_stance();
            household.claim_field(constants);
            household.farm(field, constants);
            let losses = household.consume_grain(constants);
            if losses > 0 {
                tracing::trace!("Household {} lost {} to famine", household.id, losses);
            }
        }

        tally.extinctions += self.remove_extinct("famine");
    }

    /// Pairwise interactions between all live households
    ///
    /// A household wiped out earlier in the pass is skipped for every later
    /// pair; removal happens once the pass is complete.
    fn run_interactions(&mut self, tally: &mut YearTally) {
        let constants = &self.constants;
        let survival = constants.survival_probability;
        let rng = &mut self.rng;
        let count = self.households.len();

        for i in 0..count {
            for j in (i + 1)..count {
                let (first, second) = pair_mut(&mut self.households, i, j);
                if first.is_extinct() || second.is_extinct() {
                    continue;
                }
                if !intersects(
                    first.position,
                    first.knowledge_radius(constants),
                    second.position,
                    second.knowledge_radius(constants),
                ) {
                    continue;
                }

                let first_stance = first.choose_stance(second.id);
                let second_stance = second.choose_stance(first.id);
                let resolution = Resolution::from_stances(first_stance, second_stance);

                match resolution {
                    Resolution::MutualPlunder => {
                        if first.plunder(second, survival, rng).is_some() {
                            tally.plunders += 1;
                        }
                        if second.plunder(first, survival, rng).is_some() {
                            tally.plunders += 1;
                        }
                    }
                    Resolution::FirstPlunders => {
                        if first.plunder(second, survival, rng).is_some() {
                            tally.plunders += 1;
                        }
                    }
                    Resolution::SecondPlunders => {
                        if second.plunder(first, survival, rng).is_some() {
                            tally.plunders += 1;
                        }
                    }
                    Resolution::MutualCollaboration => {
                        first.collaborate(second, rng);
                        second.collaborate(first, rng);
                        tally.collaborations += 1;
                    }
                    Resolution::NoEffect => {}
                }

                tracing::trace!(
                    "Interaction {} ({:?}) vs {} ({:?}): {:?}",
                    first.id,
                    first_stance,
                    second.id,
                    second_stance,
                    resolution
                );

                first.record_encounter(second.id, second_stance);
                second.record_encounter(first.id, first_stance);
            }
        }

        tally.extinctions += self.remove_extinct("raids");
    }

    /// Grow, changeover and relocate for every live household
    fn run_demographics(&mut self) {
        let constants = &self.constants;
        let field = &self.field;
        let rng = &mut self.rng;

        for household in &mut self.households {
            household.grow(constants, rng);
            household.generational_changeover(constants, rng);
            household.relocate(field, constants);
        }
    }

    fn remove_extinct(&mut self, cause: &str) -> u32 {
        let before = self.households.len();
        let year = self.current_year;
        self.households.retain(|h| {
            if h.is_extinct() {
                tracing::debug!("Household {} died out in year {} ({})", h.id, year, cause);
                false
            } else {
                true
            }
        });
        (before - self.households.len()) as u32
    }

    fn snapshot(&self, tally: YearTally) -> YearSnapshot {
        let households: Vec<HouseholdStats> = self
            .households
            .iter()
            .map(|h| HouseholdStats::from_household(h, &self.constants))
            .collect();

        let grain: Vec<f64> = households.iter().map(|h| h.grain).collect();
        let summary = YearSummary {
            live_households: households.len(),
            total_population: households.iter().map(|h| u64::from(h.population)).sum(),
            total_grain: grain.iter().sum(),
            gini_coefficient: gini_coefficient(&grain),
            plunders: tally.plunders,
            collaborations: tally.collaborations,
            extinctions: tally.extinctions,
        };

        YearSnapshot {
            year: self.current_year,
            households,
            fertility: self.field.fertility().clone(),
            river: self.field.river_handle(),
            summary,
        }
    }
}

/// Two distinct mutable elements, `i < j`
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i < j);
    let (left, right) = items.split_at_mut(j);
    (&mut left[i], &mut right[0])
}
