//! Household decision-making
//!
//! A `DecisionPolicy` is the decision core of one household: it draws the
//! household's starting traits and makes every spatial and strategic choice.
//! `RandomPolicy` is the stochastic baseline; other policies (for example
//! ones that learn from past encounters) plug in through the same trait.

use ahash::AHashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::error::{Result, SimError};
use crate::core::types::{HouseholdId, Position, Shape, Stance};
use crate::spatial::grid::Grid;

/// Lower bound on position draws before giving up on a field
const MIN_POSITION_ATTEMPTS: usize = 1024;

/// Decisions a household delegates to its policy
pub trait DecisionPolicy: std::fmt::Debug + Send {
    /// Starting competency, uniform in [min_value, 1)
    fn generate_competency(&mut self, min_value: f64) -> f64;

    /// Starting ambition, uniform in [min_value, 1)
    fn generate_ambition(&mut self, min_value: f64) -> f64;

    /// Starting position on a land cell of the river grid
    fn generate_position(&mut self, river: &Grid<f64>) -> Result<Position>;

    /// Center of this year's claimed field; may fall outside the landscape
    fn choose_claim_field_center(&mut self, knowledge_radius: f64, current: Position) -> Position;

    /// Relocation target, or `current` if the draw leaves the landscape
    fn choose_relocation_target(
        &mut self,
        knowledge_radius: f64,
        current: Position,
        shape: Shape,
    ) -> Position;

    /// Stance toward a neighbour for this year's interaction
    fn choose_stance(&mut self, counterpart: HouseholdId) -> Stance;

    /// Called after an interaction with the stance the counterpart took
    fn record_encounter(&mut self, _counterpart: HouseholdId, _their_stance: Stance) {}
}

/// Uniformly random decisions from a private seeded stream
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: ChaCha8Rng,
    encounters: AHashMap<HouseholdId, Stance>,
}

impl RandomPolicy {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self {
            rng,
            encounters: AHashMap::new(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Stance the counterpart took the last time the two households met
    pub fn last_seen(&self, counterpart: HouseholdId) -> Option<Stance> {
        self.encounters.get(&counterpart).copied()
    }

    fn unit_draw(&mut self, min_value: f64) -> f64 {
        // Keeps the draw inside (0, 1) even for out-of-range minimums
        let lo = min_value.clamp(f64::EPSILON, 1.0 - f64::EPSILON);
        self.rng.gen_range(lo..1.0)
    }

    fn offset(&mut self, lo: f64, hi: f64) -> i64 {
        if hi > lo {
            // Truncation toward zero
            self.rng.gen_range(lo..hi) as i64
        } else {
            0
        }
    }
}

impl DecisionPolicy for RandomPolicy {
    fn generate_competency(&mut self, min_value: f64) -> f64 {
        self.unit_draw(min_value)
    }

    fn generate_ambition(&mut self, min_value: f64) -> f64 {
        self.unit_draw(min_value)
    }

    fn generate_position(&mut self, river: &Grid<f64>) -> Result<Position> {
        let shape = river.shape();
        if shape.cell_count() == 0 {
            return Err(SimError::EmptyMap);
        }

        let attempts = (shape.cell_count() * 4).max(MIN_POSITION_ATTEMPTS);
        for _ in 0..attempts {
            let x = self.rng.gen_range(0..shape.cols);
            let y = self.rng.gen_range(0..shape.rows);
            if river.get(x, y).is_some_and(|&v| v < 1.0) {
                return Ok(Position::new(x as i64, y as i64));
            }
        }

        Err(SimError::DegenerateField { attempts })
    }

    fn choose_claim_field_center(&mut self, knowledge_radius: f64, current: Position) -> Position {
        let dx = self.offset(0.0, knowledge_radius);
        let dy = self.offset(0.0, knowledge_radius);
        Position::new(current.x.saturating_add(dx), current.y.saturating_add(dy))
    }

    fn choose_relocation_target(
        &mut self,
        knowledge_radius: f64,
        current: Position,
        shape: Shape,
    ) -> Position {
        let dx = self.offset(-knowledge_radius, knowledge_radius);
        let dy = self.offset(-knowledge_radius, knowledge_radius);
        let target = Position::new(current.x.saturating_add(dx), current.y.saturating_add(dy));
        if shape.contains(target) {
            target
        } else {
            current
        }
    }

    fn choose_stance(&mut self, _counterpart: HouseholdId) -> Stance {
        Stance::ALL[self.rng.gen_range(0..Stance::ALL.len())]
    }

    fn record_encounter(&mut self, counterpart: HouseholdId, their_stance: Stance) {
        self.encounters.insert(counterpart, their_stance);
    }
}
