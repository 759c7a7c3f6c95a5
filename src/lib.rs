//! Nile Strata - agent-based simulation of settlement stratification
//!
//! Households farm a fertility landscape along a river, trade and raid one
//! another, grow and relocate, while a periodic flood restores the soil.

pub mod core;
pub mod environment;
pub mod household;
pub mod simulation;
pub mod spatial;
