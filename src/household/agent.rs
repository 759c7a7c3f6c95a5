//! Household - one settlement's economic and demographic state
//!
//! A household runs through the same phases every year, in order:
//! reset, claim, farm, consume, (interact), grow, generational changeover,
//! relocate. Each phase is a method here; the scheduler decides the order.

use rand::Rng;

use crate::core::config::{ConstantsConfig, HouseholdConfig};
use crate::core::error::Result;
use crate::core::types::{HouseholdId, Position, Stance};
use crate::environment::field::ResourceField;
use crate::household::policy::DecisionPolicy;
use crate::spatial::grid::Grid;

/// Smallest distance a trait keeps from 0 and 1
const TRAIT_MARGIN: f64 = f64::EPSILON;

/// Field claimed for the current year's harvest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClaimedField {
    pub center: Position,
    pub area: f64,
}

/// Result of one farm phase
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Harvest {
    pub available: f64,
    pub harvested: f64,
}

/// An autonomous settlement
#[derive(Debug)]
pub struct Household {
    pub id: HouseholdId,
    pub population: u32,
    pub grain: f64,
    pub worker_capability: f64,
    pub competency: f64,
    pub ambition: f64,
    pub position: Position,
    /// Stance taken in the most recent interaction this year
    pub stance: Stance,
    claimed_field: Option<ClaimedField>,
    policy: Box<dyn DecisionPolicy>,
}

impl Household {
    /// Household with neutral traits at a fixed position
    pub fn new(id: HouseholdId, position: Position, policy: Box<dyn DecisionPolicy>) -> Self {
        Self {
            id,
            population: 0,
            grain: 0.0,
            worker_capability: 0.0,
            competency: 0.5,
            ambition: 0.5,
            position,
            stance: Stance::Neutral,
            claimed_field: None,
            policy,
        }
    }

    /// Household with starting values from configuration and traits and
    /// position drawn by its policy
    pub fn spawn(
        id: HouseholdId,
        start: &HouseholdConfig,
        mut policy: Box<dyn DecisionPolicy>,
        river: &Grid<f64>,
    ) -> Result<Self> {
        let competency = policy.generate_competency(start.min_competency);
        let ambition = policy.generate_ambition(start.min_ambition);
        let position = policy.generate_position(river)?;

        Ok(Self::new(id, position, policy)
            .with_population(start.num_workers)
            .with_grain(start.grain)
            .with_worker_capability(start.worker_capability)
            .with_traits(competency, ambition))
    }

    pub fn with_population(mut self, population: u32) -> Self {
        self.population = population;
        self
    }

    pub fn with_grain(mut self, grain: f64) -> Self {
        self.grain = grain.max(0.0);
        self
    }

    pub fn with_worker_capability(mut self, worker_capability: f64) -> Self {
        self.worker_capability = worker_capability.max(0.0);
        self
    }

    pub fn with_traits(mut self, competency: f64, ambition: f64) -> Self {
        self.competency = clamp_trait(competency);
        self.ambition = clamp_trait(ambition);
        self
    }

    pub fn is_extinct(&self) -> bool {
        self.population == 0
    }

    /// Reach in cells for claims, relocation and interactions
    pub fn knowledge_radius(&self, constants: &ConstantsConfig) -> f64 {
        constants.knowledge_ratio * f64::from(self.population)
    }

    pub fn claimed_field(&self) -> Option<ClaimedField> {
        self.claimed_field
    }

    pub fn policy(&self) -> &dyn DecisionPolicy {
        self.policy.as_ref()
    }

    pub fn policy_mut(&mut self) -> &mut dyn DecisionPolicy {
        self.policy.as_mut()
    }

    /// Phase 1
    pub fn reset_stance(&mut self) {
        self.stance = Stance::Neutral;
    }

    /// Phase 2: pick a field center within the knowledge radius
    pub fn claim_field(&mut self, constants: &ConstantsConfig) -> ClaimedField {
        let radius = self.knowledge_radius(constants);
        let center = self.policy.choose_claim_field_center(radius, self.position);
        let area = constants.claim_ratio * f64::from(self.population) * self.ambition;
        let claim = ClaimedField { center, area };
        self.claimed_field = Some(claim);
        claim
    }

    /// Phase 3: harvest the claimed field and deplete its fertility
    ///
    /// Harvest is limited by both the field and the workforce, then scaled
    /// by competency. Without a claim nothing is harvested.
    pub fn farm(&mut self, field: &mut ResourceField, constants: &ConstantsConfig) -> Harvest {
        let Some(claim) = self.claimed_field.take() else {
            return Harvest::default();
        };

        let region = field.harvestable_region(claim.center, claim.area);
        let available = region.sum() * constants.maximum_potential_yield;
        let workers_capacity = f64::from(self.population) * self.worker_capability;
        let harvested = available.min(workers_capacity) * self.competency;

        if available > 0.0 {
            field.deplete_region(claim.center, claim.area, (available - harvested) / available);
        }

        self.grain += harvested;
        Harvest { available, harvested }
    }

    /// Phase 4: feed the population; returns the number of people lost
    ///
    /// An unmet need turns into population loss, softened by resiliency
    /// (competency x ambition) and scaled by the survival probability.
    pub fn consume_grain(&mut self, constants: &ConstantsConfig) -> u32 {
        self.grain -= f64::from(self.population) * constants.worker_appetite;
        if self.grain >= 0.0 {
            return 0;
        }

        let deficit = -self.grain;
        self.grain = 0.0;
        if constants.worker_appetite <= 0.0 {
            return 0;
        }

        let resiliency = self.competency * self.ambition;
        let unfed = deficit / constants.worker_appetite;
        let losses = (unfed * (1.0 - resiliency) * constants.survival_probability).floor();
        let losses = (losses.max(0.0) as u32).min(self.population);
        self.population -= losses;

        debug_assert!(self.grain >= 0.0);
        losses
    }

    /// Pick and remember a stance toward `counterpart`
    pub fn choose_stance(&mut self, counterpart: HouseholdId) -> Stance {
        let stance = self.policy.choose_stance(counterpart);
        self.stance = stance;
        stance
    }

    pub fn record_encounter(&mut self, counterpart: HouseholdId, their_stance: Stance) {
        self.policy.record_encounter(counterpart, their_stance);
    }

    /// Phase 6: whole growth plus one more person with probability equal to
    /// the fractional remainder; returns the number of births
    pub fn grow<R: Rng + ?Sized>(&mut self, constants: &ConstantsConfig, rng: &mut R) -> u32 {
        let increase = f64::from(self.population) * constants.growth_rate;
        if !(increase.is_finite() && increase > 0.0) {
            return 0;
        }

        let whole = increase.floor();
        let remainder = increase - whole;
        let extra = u32::from(remainder > 0.0 && rng.gen_bool(remainder));
        let births = (whole as u32).saturating_add(extra);
        self.population = self.population.saturating_add(births);
        births
    }

    /// Phase 7: bounded random drift of traits and worker capability
    pub fn generational_changeover<R: Rng + ?Sized>(
        &mut self,
        constants: &ConstantsConfig,
        rng: &mut R,
    ) {
        self.competency = drift_trait(self.competency, constants.generational_variance, rng);
        self.ambition = drift_trait(self.ambition, constants.generational_variance, rng);

        let variance = constants.capability_variance;
        let perc = if variance > 0.0 { rng.gen_range(-variance..=variance) } else { 0.0 };
        self.worker_capability = (self.worker_capability * (1.0 + perc)).max(0.0);
    }

    /// Phase 8: move to a land cell within the knowledge radius; returns
    /// true if the household moved
    pub fn relocate(&mut self, field: &ResourceField, constants: &ConstantsConfig) -> bool {
        let radius = self.knowledge_radius(constants);
        let target = self
            .policy
            .choose_relocation_target(radius, self.position, field.shape());

        if target == self.position || !field.shape().contains(target) || field.is_river(target) {
            return false;
        }
        self.position = target;
        true
    }
}

/// One bounded random-walk step toward 0 or 1
fn drift_trait<R: Rng + ?Sized>(value: f64, variance: f64, rng: &mut R) -> f64 {
    let step = if variance > 0.0 { rng.gen_range(0.0..variance) } else { 0.0 };
    let next = if rng.gen_bool(0.5) {
        value + (1.0 - value) * step
    } else {
        value - value * step
    };
    clamp_trait(next)
}

fn clamp_trait(value: f64) -> f64 {
    if value.is_nan() {
        return 0.5;
    }
    value.clamp(TRAIT_MARGIN, 1.0 - TRAIT_MARGIN)
}
