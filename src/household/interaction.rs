//! Pairwise interactions between neighbouring households
//!
//! Plunder is unilateral: either party may raid regardless of the other's
//! stance. Collaboration needs both parties to be friendly. A mutual raid
//! is two independent plunders applied one after the other, not an atomic
//! exchange.

use rand::Rng;

use crate::core::types::{Position, Stance};
use crate::household::agent::Household;

/// What a pair of stances leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    MutualPlunder,
    FirstPlunders,
    SecondPlunders,
    MutualCollaboration,
    NoEffect,
}

impl Resolution {
    pub fn from_stances(first: Stance, second: Stance) -> Self {
        match (first, second) {
            (Stance::Hostile, Stance::Hostile) => Resolution::MutualPlunder,
            (Stance::Hostile, _) => Resolution::FirstPlunders,
            (_, Stance::Hostile) => Resolution::SecondPlunders,
            (a, b) if a > Stance::Neutral && b > Stance::Neutral => Resolution::MutualCollaboration,
            _ => Resolution::NoEffect,
        }
    }
}

/// Goods and people taken by a successful raid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raid {
    pub grain: f64,
    pub captured: u32,
    pub survivors: u32,
}

/// Two households interact iff their knowledge circles touch or overlap
pub fn intersects(a_pos: Position, a_radius: f64, b_pos: Position, b_radius: f64) -> bool {
    a_pos.distance(&b_pos) <= a_radius + b_radius
}

impl Household {
    /// Share of raw strength this household brings to a raid against `other`
    fn raid_capability(&self, total_population: f64) -> f64 {
        (f64::from(self.population) / total_population + self.ambition + self.competency) / 3.0
    }

    /// Probability that a raid by `self` on `other` succeeds
    pub fn plunder_probability(&self, other: &Household) -> f64 {
        let total = f64::from(self.population) + f64::from(other.population);
        if total <= 0.0 {
            return 0.0;
        }
        let capability = self.raid_capability(total);
        let rival = other.raid_capability(total);
        capability / (capability + rival)
    }

    /// Raid `other`; returns what was taken, or None if the raid failed
    ///
    /// The same uniform draw decides success and the share taken, so a
    /// successful raid takes at most `plunder_probability` of the target's
    /// grain and people. Only `survival_probability` of the captured people
    /// arrive.
    pub fn plunder<R: Rng + ?Sized>(
        &mut self,
        other: &mut Household,
        survival_probability: f64,
        rng: &mut R,
    ) -> Option<Raid> {
        if self.is_extinct() || other.is_extinct() {
            return None;
        }

        let probability = self.plunder_probability(other);
        let p: f64 = rng.gen();
        if p >= probability {
            return None;
        }

        let grain = (p * other.grain).clamp(0.0, other.grain.max(0.0));
        let captured = ((p * f64::from(other.population)).floor() as u32).min(other.population);
        let survivors = (f64::from(captured) * survival_probability.clamp(0.0, 1.0)).floor() as u32;

        other.grain = (other.grain - grain).max(0.0);
        other.population -= captured;
        self.grain += grain;
        self.population = self.population.saturating_add(survivors);

        debug_assert!(other.grain >= 0.0);
        Some(Raid { grain, captured, survivors })
    }

    /// Learn from `other`; one-directional, returns the capability gained
    pub fn collaborate<R: Rng + ?Sized>(&mut self, other: &Household, rng: &mut R) -> f64 {
        let total = self.worker_capability + other.worker_capability;
        if total <= 0.0 {
            return 0.0;
        }
        let share = self.worker_capability / total;
        let spread = (self.worker_capability - other.worker_capability).abs();
        let gain = (1.0 - share) * spread * rng.gen::<f64>();
        self.worker_capability += gain;
        gain
    }
}
