//! Eyeframe CLI: Command-line interface for camera scenes.
//!
//! Usage:
//!   eyeframe simulate <SCENE>            Step a scene and print camera state per frame
//!   eyeframe validate <SCENE>            Check a scene file for problems
//!   eyeframe rail <SCENE> --focus <NAME> Print samples along a rail focus
//!   eyeframe config [--write]            Show or save the effective config

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyeframe_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "eyeframe",
    about = "2D camera framing: simulate and inspect camera scenes",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Step a scene and emit one JSON line per frame
    Simulate {
        /// Path to the scene file
        scene: PathBuf,

        /// Number of frames to simulate
        #[arg(long)]
        frames: Option<u32>,

        /// Simulated frames per second
        #[arg(long)]
        fps: Option<u32>,

        /// Seed for shake jitter
        #[arg(long)]
        seed: Option<u64>,

        /// Constant input axis value, as NAME=VALUE (repeatable)
        #[arg(long = "axis", value_name = "NAME=VALUE")]
        axes: Vec<String>,

        /// Frame at which every camera receives a shake impact
        #[arg(long)]
        shake_at: Option<u32>,

        /// Force of the shake impact
        #[arg(long, default_value = "100.0")]
        shake_force: f64,

        /// Time scale applied to the simulated clock
        #[arg(long, default_value = "1.0")]
        time_scale: f64,
    },

    /// Check a scene file for problems
    Validate {
        /// Path to the scene file
        scene: PathBuf,
    },

    /// Print samples along a rail focus
    Rail {
        /// Path to the scene file
        scene: PathBuf,

        /// Name of the rail focus
        #[arg(short, long)]
        focus: String,

        /// Samples per Bezier segment
        #[arg(long, default_value = "16")]
        samples: usize,
    },

    /// Print the effective configuration as JSON
    Config {
        /// Also save it to the user config directory
        #[arg(long)]
        write: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };

    eyeframe_common::logging::init_cli_logging(&config.logging, cli.verbose);

    match cli.command {
        Commands::Simulate {
            scene,
            frames,
            fps,
            seed,
            axes,
            shake_at,
            shake_force,
            time_scale,
        } => commands::simulate::run(
            &config,
            commands::simulate::SimulateOptions {
                scene,
                frames: frames.unwrap_or(config.simulation.frames),
                fps: fps.unwrap_or(config.simulation.fps),
                seed: seed.unwrap_or(config.simulation.seed),
                axes,
                shake_at,
                shake_force,
                time_scale,
            },
        ),
        Commands::Validate { scene } => commands::validate::run(scene),
        Commands::Rail {
            scene,
            focus,
            samples,
        } => commands::rail::run(scene, &focus, samples),
        Commands::Config { write } => commands::config::run(&config, write),
    }
}
