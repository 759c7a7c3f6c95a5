//! Nile Strata - headless runner
//!
//! Loads a configuration and landscape, runs the simulation to completion
//! and reports the outcome.

use std::path::PathBuf;

use clap::Parser;
use nile_strata::core::config::SimulationConfig;
use nile_strata::core::error::{Result, SimError};
use nile_strata::core::types::Shape;
use nile_strata::environment::{load_maps, ResourceField};
use nile_strata::simulation::Simulation;

/// Headless Nile Strata runner
#[derive(Parser, Debug)]
#[command(name = "nile-strata")]
#[command(about = "Run a settlement stratification simulation and report the outcome")]
struct Args {
    /// Simulation configuration (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the configured number of years
    #[arg(long)]
    years: Option<u32>,

    /// Write the run summary as JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Ignore configured maps and use a river-free field, e.g. 60x40
    #[arg(long, value_parser = parse_shape)]
    uniform_field: Option<Shape>,
}

fn parse_shape(s: &str) -> std::result::Result<Shape, String> {
    let (rows, cols) = s
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected ROWSxCOLS, got '{}'", s))?;
    let rows = rows.trim().parse().map_err(|e| format!("rows: {}", e))?;
    let cols = cols.trim().parse().map_err(|e| format!("cols: {}", e))?;
    Ok(Shape::new(rows, cols))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("nile_strata=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(years) = args.years {
        config.constants.num_generations = years;
    }

    let mut sim = match (args.uniform_field, &config.maps) {
        (Some(shape), _) => {
            let field = ResourceField::uniform(shape, 1.0, config.constants.flood_frequency)?;
            Simulation::from_config(&config, field)?
        }
        (None, Some(maps)) => {
            Simulation::from_maps(&config, load_maps(&maps.river, &maps.fertility)?)?
        }
        (None, None) => {
            return Err(SimError::Config(
                "no [maps] configured; pass --uniform-field ROWSxCOLS for a synthetic field".into(),
            ))
        }
    };
    tracing::info!("Simulating {} years...", sim.total_years());

    let output = sim.run(|snapshot| {
        let s = &snapshot.summary;
        tracing::info!(
            year = snapshot.year,
            households = s.live_households,
            population = s.total_population,
            grain = s.total_grain,
            gini = s.gini_coefficient,
            plunders = s.plunders,
            collaborations = s.collaborations,
            extinctions = s.extinctions,
            "year complete"
        );
    });

    println!("{}", output.summary());

    if let Some(path) = &args.output {
        std::fs::write(path, output.to_json())?;
        println!("Full output written to {}", path.display());
    }

    Ok(())
}
