//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use nightsky_core::{AnimationSpeed, FieldPreset};

use crate::Config;

/// Animated night sky for the terminal.
///
/// CLI values override settings loaded from `config.toml`.
#[derive(Parser, Debug, Default)]
#[command(name = "nightsky", version, about = "Animated night-sky particle field")]
pub struct CliArgs {
    /// Field preset (hero, cosmic, events, starfield).
    #[arg(long, short)]
    pub preset: Option<FieldPreset>,

    /// Frame-rate cap; 0 disables the cap.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Animation speed (slow, medium, fast).
    #[arg(long, short)]
    pub speed: Option<AnimationSpeed>,

    /// Force lightning on or off.
    #[arg(long)]
    pub lightning: Option<bool>,

    /// Random seed for a reproducible field.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log filter (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Write logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(preset) = args.preset {
            self.select_preset(preset);
        }
        if let Some(fps) = args.fps {
            self.animation.target_fps = fps;
        }
        if let Some(speed) = args.speed {
            self.animation.speed = speed;
        }
        if let Some(lightning) = args.lightning {
            self.animation.lightning = Some(lightning);
        }
        if let Some(seed) = args.seed {
            self.animation.seed = Some(seed);
        }
        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
        if let Some(ref file) = args.log_file {
            self.logging.file = Some(file.clone());
        }
    }
}
