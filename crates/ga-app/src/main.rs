use std::path::Path;

use anyhow::Result;
use clap::Parser;
use ga_core::config::AppConfig;

mod cli;
mod clipboard;
mod commands;

use cli::Command;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging (stderr, hors de l'écran de lecture)
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config
    let config = resolve_config(&cli.config)?;

    // 4. Dispatcher
    match &cli.command {
        Command::Convert(args) => commands::convert(args, config.convert),
        Command::Play(args) => commands::play(args, config.playback),
        Command::List(args) => commands::list(args),
    }
}

/// Load the TOML config if present, defaults otherwise.
fn resolve_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        ga_core::config::load_config(path)
    } else {
        log::info!(
            "Config introuvable : {}. Utilisation des défauts.",
            path.display()
        );
        Ok(AppConfig::default())
    }
}
