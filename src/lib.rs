// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod util;

use crate::cli::args::Args;
use anyhow::{Context, Result};
use application::BuildSettings;
use domain::DomainError;
use infrastructure::config::DeckIdMode;
use infrastructure::{ApkgPackager, Config};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting ankipack with arguments");

    let config = load_config(args.config.as_deref())?;
    debug!(?config, "Resolved configuration");

    let settings = resolve_settings(&args, &config)?;
    let packager = ApkgPackager::new(config.package.timestamp);

    info!(decks = %settings.decks_dir.display(), "Building decks");
    let report = application::build(&settings, packager)?;

    for skipped in &report.skipped {
        debug!(deck = %skipped.deck, prefix = %skipped.prefix, present = ?skipped.present, "Skipped note");
    }

    Ok(())
}

/// Explicit config path must exist; otherwise `./ankipack.toml` is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.is_file() {
                return Err(DomainError::ConfigError(format!(
                    "Config file not found: {}",
                    path.display()
                ))
                .into());
            }
            Config::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))
        }
        None => Config::load_or_default(constants::DEFAULT_CONFIG_FILE),
    }
}

/// Command line flags take precedence over the config file.
pub fn resolve_settings(args: &Args, config: &Config) -> Result<BuildSettings> {
    let mut package = config.package.clone();
    if let Some(deck_id) = args.deck_id {
        package.deck_id = deck_id;
    }
    if args.deck_ids_by_name {
        package.deck_ids = DeckIdMode::ByName;
    }

    Ok(BuildSettings {
        decks_dir: args
            .decks
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.paths.decks)),
        output_dir: args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.paths.output)),
        deck_ids: package.deck_id_policy()?,
    })
}
