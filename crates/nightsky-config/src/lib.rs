//! Configuration for nightsky.
//!
//! Settings persist as a TOML file in the platform configuration directory.
//! Command-line flags override whatever the file says, and an optional
//! `[field]` table replaces the selected preset with a fully custom layer set.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{AnimationConfig, CONFIG_FILE, Config, LoggingConfig};
pub use error::ConfigError;
