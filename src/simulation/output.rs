//! Run output and serialization

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::core::types::Year;
use crate::simulation::scheduler::{Simulation, YearOutcome};
use crate::simulation::snapshot::{YearSnapshot, YearSummary};

/// Summary of a complete run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub years_simulated: Year,
    pub simulation_time_ms: u64,
    pub households_at_start: usize,
    pub households_at_end: usize,
    pub final_summary: Option<YearSummary>,
}

impl RunSummary {
    pub fn new(sim: &Simulation, final_summary: Option<YearSummary>, elapsed: Duration) -> Self {
        Self {
            years_simulated: sim.current_year(),
            simulation_time_ms: elapsed.as_millis() as u64,
            households_at_start: sim.households_at_start(),
            households_at_end: sim.households().len(),
            final_summary,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        let mut text = format!(
            "Simulated {} years in {}ms\n{} of {} households remain",
            self.years_simulated,
            self.simulation_time_ms,
            self.households_at_end,
            self.households_at_start,
        );
        if let Some(last) = &self.final_summary {
            text.push_str(&format!(
                "\nPopulation {}, grain {:.1}, gini {:.3}",
                last.total_population, last.total_grain, last.gini_coefficient
            ));
        }
        text
    }
}

impl Simulation {
    /// Advance until finished, handing every snapshot to `observer`
    pub fn run(&mut self, mut observer: impl FnMut(&YearSnapshot)) -> RunSummary {
        let start = Instant::now();
        let mut last = None;

        while let YearOutcome::Advanced(snapshot) = self.advance_year() {
            observer(&snapshot);
            last = Some(snapshot.summary.clone());
        }

        RunSummary::new(self, last, start.elapsed())
    }
}
