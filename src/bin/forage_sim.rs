//! forage-sim - run a foraging simulation from a JSON configuration.

use anyhow::{Context, Result};
use clap::Parser;
use forage_core::{setup_logging, Scenario, Simulation, SimulationConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "forage-sim")]
#[command(about = "Evolve forager movement strategies on a clustered landscape")]
struct Cli {
    /// JSON configuration file (missing fields take defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the movement scenario (0 random, 1 optimal, 2 evolved)
    #[arg(short, long)]
    scenario: Option<i32>,

    /// Override the run seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of generations
    #[arg(short, long)]
    generations: Option<usize>,

    /// Override the worker thread count
    #[arg(short, long)]
    threads: Option<usize>,

    /// Log filter, e.g. "info" or "forage_core=debug"
    #[arg(long, default_value = "info")]
    log: String,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(Some(cli.log.clone()));

    let mut config = match &cli.config {
        Some(path) => SimulationConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(s) = cli.scenario {
        config.scenario = Scenario::try_from(s)?;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(g) = cli.generations {
        config.generations = g;
    }
    if let Some(t) = cli.threads {
        config.threads = t;
    }

    let output = Simulation::new(config)
        .context("invalid simulation configuration")?
        .run();
    let json = output.to_json(cli.pretty)?;

    match &cli.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing result to {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
