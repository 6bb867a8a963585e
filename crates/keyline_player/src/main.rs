// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyline - headless keyframe timeline player.
//!
//! Usage:
//!   keyline info <TIMELINE>                 Show timeline summary
//!   keyline sample <TIMELINE> --time <T>    Print sampled values at a time
//!   keyline key <TIMELINE> [OPTIONS]        Add or replace a keyframe
//!   keyline init [PATH]                     Write default player settings
//!   keyline play <TIMELINE> --scene <SCENE> Replay against a scene description
//!
//! The player drives `keyline_sequencer` with a fixed simulation step. The
//! scene is an in-memory transform hierarchy loaded from RON.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod scene;
mod settings;

#[derive(Parser)]
#[command(
    name = "keyline",
    about = "Author, inspect and replay keyframe timelines",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show timeline information
    Info {
        /// Path to the timeline JSON file
        path: PathBuf,
    },

    /// Print sampled property values at a time
    Sample {
        /// Path to the timeline JSON file
        path: PathBuf,

        /// Time in seconds
        #[arg(short, long)]
        time: f32,

        /// Only show this target path
        #[arg(long)]
        target: Option<String>,

        /// Only show this property
        #[arg(long)]
        property: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Add or replace a keyframe (creates the timeline if missing)
    Key {
        /// Path to the timeline JSON file
        path: PathBuf,

        /// Target object path, e.g. Root/Arm
        #[arg(long)]
        target: String,

        /// Property name, e.g. position.x
        #[arg(long)]
        property: String,

        /// Keyframe time in seconds
        #[arg(long)]
        time: f32,

        /// Keyframe value
        #[arg(long, allow_hyphen_values = true)]
        value: f32,

        /// Set the timeline duration
        #[arg(long)]
        duration: Option<f32>,
    },

    /// Remove keyframes near a time, or a whole target
    Unkey {
        /// Path to the timeline JSON file
        path: PathBuf,

        /// Target object path
        #[arg(long)]
        target: String,

        /// Property name (omit to remove the whole track)
        #[arg(long, requires = "time")]
        property: Option<String>,

        /// Keyframe time in seconds
        #[arg(long)]
        time: Option<f32>,
    },

    /// Write a default player settings file
    Init {
        /// Output path for the settings (RON)
        #[arg(default_value = "player.ron")]
        path: PathBuf,
    },

    /// Replay a timeline against a scene description
    Play {
        /// Path to the timeline JSON file
        path: PathBuf,

        /// Scene description (RON)
        #[arg(short, long)]
        scene: PathBuf,

        /// Player settings (RON)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Loop forever (bounded by --max-frames)
        #[arg(long = "loop")]
        looping: bool,

        /// Number of passes before stopping (overrides --loop)
        #[arg(long)]
        repeat: Option<u32>,

        /// Simulation steps per second
        #[arg(long)]
        fps: Option<f32>,

        /// Maximum number of simulated frames
        #[arg(long)]
        max_frames: Option<u32>,

        /// Stop and restore the scene once playback ends
        #[arg(long)]
        restore: bool,
    },
}

/// Filter used when `RUST_LOG` is not set
fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("keyline_sequencer={level},keyline_player={level}")
}

fn init_logging(verbose: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::debug!("Starting Keyline v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Info { path } => commands::info::run(path),
        Commands::Sample {
            path,
            time,
            target,
            property,
            json,
        } => commands::sample::run(path, time, target, property, json),
        Commands::Key {
            path,
            target,
            property,
            time,
            value,
            duration,
        } => commands::key::run(path, target, property, time, value, duration),
        Commands::Unkey {
            path,
            target,
            property,
            time,
        } => commands::key::remove(path, target, property, time),
        Commands::Init { path } => commands::init::run(path),
        Commands::Play {
            path,
            scene,
            settings,
            looping,
            repeat,
            fps,
            max_frames,
            restore,
        } => commands::play::run(commands::play::PlayOptions {
            timeline: path,
            scene,
            settings,
            looping,
            repeat,
            fps,
            max_frames,
            restore,
        }),
    }
}
