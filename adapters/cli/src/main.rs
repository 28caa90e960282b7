#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Masacre levels without a renderer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glam::Vec2;
use masacre_cli::{config::Settings, level::Level, parse_point, simulation::Simulation};
use masacre_system_bootstrap::Bootstrap;
use masacre_world::Map;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn,masacre=info";

/// Headless runner for Masacre levels
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Level file: a PNG bitmap or a `.txt` mask
    #[arg(long, global = true)]
    map: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Spawn agents and let them chase the player for a number of ticks
    Run {
        /// Number of ticks to simulate
        #[arg(long)]
        ticks: Option<u32>,

        /// Simulated frame time in milliseconds
        #[arg(long)]
        frame_ms: Option<u64>,

        /// Seed for spawn placement
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the waypoints between two world-space points
    Path {
        /// Start position (x,y)
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: Vec2,

        /// End position (x,y)
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: Vec2,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(map) = args.map {
        settings.simulation.level = Some(map);
    }

    let map = load_map(&settings)?;

    match args.command {
        Commands::Run {
            ticks,
            frame_ms,
            seed,
        } => {
            if let Some(frame_ms) = frame_ms {
                settings.simulation.frame_ms = frame_ms;
            }
            if let Some(seed) = seed {
                settings.spawning.rng_seed = seed;
            }
            let ticks = ticks.unwrap_or(settings.simulation.ticks);
            run(map, &settings, ticks)
        }
        Commands::Path { from, to } => {
            print_path(&map, from, to);
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_map(settings: &Settings) -> Result<Map> {
    let path = settings
        .simulation
        .level
        .as_deref()
        .context("no level given; pass --map or set simulation.level")?;
    let level = Level::load(path)?;
    let config = settings.map.to_config(level.default_cell_pitch());
    Bootstrap
        .load_level(&level, config)
        .with_context(|| format!("failed to prepare level {}", path.display()))
}

fn run(map: Map, settings: &Settings, ticks: u32) -> Result<()> {
    let summary = Bootstrap.summary(&map);
    println!("level: {summary}");

    let mut simulation = Simulation::new(map, settings).context("failed to place pickups")?;
    let player = simulation.player();
    println!("player spawn: {},{}", player.x, player.y);
    for pickup in simulation.pickups() {
        println!("pickup: {},{}", pickup.x, pickup.y);
    }

    let summary = simulation
        .run(ticks)
        .context("spawning could not place an agent")?;
    println!(
        "ticks: {}, spawned: {}, alive: {}, holding: {}, failed queries: {}",
        summary.ticks, summary.spawned, summary.live_agents, summary.holding, summary.no_path
    );
    Ok(())
}

fn print_path(map: &Map, from: Vec2, to: Vec2) {
    let path = map.find_path(from, to);
    if path.is_empty() {
        println!("no path");
        return;
    }
    for waypoint in map.waypoints(&path) {
        println!("{},{}", waypoint.x, waypoint.y);
    }
}
