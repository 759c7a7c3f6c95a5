//! Yearly simulation loop
//!
//! Owns the households and the landscape, drives the yearly protocol and
//! produces a frozen statistics snapshot per year.

pub mod output;
pub mod scheduler;
pub mod setup;
pub mod snapshot;

pub use output::RunSummary;
pub use scheduler::{Simulation, YearOutcome};
pub use setup::spawn_households;
pub use snapshot::{gini_coefficient, HouseholdStats, YearSnapshot, YearSummary};
