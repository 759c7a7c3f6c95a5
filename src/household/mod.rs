//! Household agents and their decision policies

pub mod agent;
pub mod interaction;
pub mod policy;

pub use agent::{ClaimedField, Harvest, Household};
pub use interaction::{intersects, Raid, Resolution};
pub use policy::{DecisionPolicy, RandomPolicy};
