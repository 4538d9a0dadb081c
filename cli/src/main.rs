//! Disease simulator CLI
//!
//! # Commands
//! - `disease-sim run` - Run one simulation and print the summary table
//! - `disease-sim sweep --p-infection 0.1,0.5` - One run per infection probability

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Months, NaiveDate};
use clap::{Args, Parser, Subcommand};
use disease_simulator_core_rs::{Simulation, SimulationConfig, SummaryTable};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_MONTHS: u32 = 12;

/// Individual-based infection/cure simulator
#[derive(Parser)]
#[command(name = "disease-sim", author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single simulation
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Override p_infection
        #[arg(long)]
        p_infection: Option<f64>,

        /// Override p_cure
        #[arg(long)]
        p_cure: Option<f64>,
    },

    /// Run one simulation per infection probability
    Sweep {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Comma-separated infection probabilities
        #[arg(long, value_delimiter = ',', default_values_t = vec![0.1, 0.5])]
        p_infection: Vec<f64>,
    },
}

#[derive(Args, Clone)]
struct ScenarioArgs {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of individuals
    #[arg(short = 'n', long)]
    population: Option<usize>,

    /// RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Run length in months (default 12 when --start is given)
    #[arg(short, long)]
    months: Option<u32>,

    /// Print the summary as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl ScenarioArgs {
    fn build_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("Failed to parse config {}", path.display()))?
            }
            None => SimulationConfig::default(),
        };

        if let Some(population) = self.population {
            config.population_size = population;
        }
        if let Some(seed) = self.seed {
            config.rng_seed = seed;
        }
        if self.start.is_some() || self.months.is_some() {
            config.start_date = self.start.unwrap_or(config.start_date);
            config.end_date = config
                .start_date
                .checked_add_months(Months::new(self.months.unwrap_or(DEFAULT_MONTHS)))
                .context("End date out of range")?;
        }
        Ok(config)
    }
}

fn print_summary(label: &str, summary: &SummaryTable, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        println!("{}", label);
        print!("{}", summary);
        println!();
    }
    Ok(())
}

fn run_one(mut config: SimulationConfig, overrides: &[(&str, f64)]) -> Result<SummaryTable> {
    for (name, value) in overrides {
        config.parameter_overrides.insert(name.to_string(), *value);
    }
    let mut sim = Simulation::new(config).context("Invalid simulation config")?;
    let summary = sim.run().context("Simulation run failed")?;
    info!(run_id = %sim.run_id(), prevalence = sim.population().count_infected(), "run complete");
    Ok(summary)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            p_infection,
            p_cure,
        } => {
            let config = scenario.build_config()?;
            let mut overrides = Vec::new();
            if let Some(p) = p_infection {
                overrides.push(("p_infection", p));
            }
            if let Some(p) = p_cure {
                overrides.push(("p_cure", p));
            }
            let summary = run_one(config, &overrides)?;
            print_summary("incidence and prevalence", &summary, scenario.json)?;
        }
        Commands::Sweep {
            scenario,
            p_infection,
        } => {
            let config = scenario.build_config()?;
            for p in p_infection {
                let summary = run_one(config.clone(), &[("p_infection", p)])?;
                print_summary(&format!("p_infection = {}", p), &summary, scenario.json)?;
            }
        }
    }

    Ok(())
}
