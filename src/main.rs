use agent_motion_engine::Simulation;
use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use simulation_common::config::check_non_negative;
use simulation_common::SimulationConfig;
use std::path::PathBuf;
use std::time::Instant;

/// Command-line arguments for the simulation runner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulated duration, overriding `timing.total_time`
    #[arg(short, long)]
    duration: Option<f32>,

    /// Random seed, overriding `initial_conditions.seed`
    #[arg(long)]
    seed: Option<u64>,

    /// Number of agents, overriding `initial_conditions.num_agents`
    #[arg(short, long)]
    agents: Option<u32>,

    /// How many agents to print before and after the run
    #[arg(long, default_value_t = 5)]
    show: usize,
}

fn main() -> Result<()> {
    // Initialize the logger; RUST_LOG overrides the default level.
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("Starting agent motion simulation...");

    // --- Load Configuration ---
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => {
            info!("No config file given, using built-in defaults.");
            SimulationConfig::default()
        }
    };
    if let Some(seed) = args.seed {
        config.initial_conditions.seed = seed;
    }
    if let Some(agents) = args.agents {
        config.initial_conditions.num_agents = agents;
    }
    let duration = args.duration.unwrap_or(config.timing.total_time);
    check_non_negative("duration", duration).context("Invalid --duration")?;
    debug!("Configuration: {:#?}", config);

    // --- Initialize Simulation ---
    let mut sim = Simulation::new(config).context("Failed to set up the simulation")?;
    info!("{} with {}", sim, sim.boundary());

    info!("Initial agent states (first {}):", args.show);
    for (i, agent) in sim.agents().iter().take(args.show).enumerate() {
        info!("  Agent {}: {}", i, agent);
    }

    // --- Simulation Loop ---
    let start_time = Instant::now();
    let stats = sim.run(duration);
    let elapsed = start_time.elapsed();
    info!(
        "Simulation finished in {:.3} seconds ({} steps, {} snapshots recorded).",
        elapsed.as_secs_f64(),
        sim.current_step(),
        sim.recorded_snapshots().len()
    );

    info!("Final agent states (first {}):", args.show);
    for (i, agent) in sim.agents().iter().take(args.show).enumerate() {
        info!("  Agent {}: {}", i, agent);
    }
    info!("{}/{} agents still moving.", stats.moving, stats.total_agents);

    info!("Simulation Complete.");
    Ok(())
}
