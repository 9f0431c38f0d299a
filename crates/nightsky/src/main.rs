mod app;
mod logging;

use clap::Parser;
use nightsky_config::{CliArgs, Config};
use tracing::{info, warn};

use crate::app::App;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();

    let config_dir = match &args.config {
        Some(dir) => Some(dir.clone()),
        None => Config::default_dir().ok(),
    };
    let mut config = match &config_dir {
        Some(dir) => Config::load_or_create(dir)?,
        None => Config::default(),
    };
    config.apply_cli_overrides(&args);
    config.validate()?;

    logging::init_logging(&config.logging)?;
    match &config_dir {
        Some(dir) => info!(dir = %dir.display(), "using config directory"),
        None => warn!("no config directory, running with defaults"),
    }

    let terminal = ratatui::init();
    let result = App::new(config, config_dir, args).run(terminal);
    ratatui::restore();
    result
}
