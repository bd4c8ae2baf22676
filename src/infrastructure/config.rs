// src/infrastructure/config.rs
use crate::constants::{
    ANKI_DEFAULT_DECK_ID, DEFAULT_DECKS_DIR, DEFAULT_DECK_ID, DEFAULT_OUTPUT_DIR,
    DEFAULT_PACKAGE_TIMESTAMP,
};
use crate::domain::{DeckIdPolicy, DomainError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// TOML configuration for a deck build
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub package: PackageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PathsConfig {
    #[serde(default = "default_decks")]
    pub decks: String,
    #[serde(default = "default_output")]
    pub output: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PackageConfig {
    /// Shared deck id, or the seed for per-name ids
    #[serde(default = "default_deck_id")]
    pub deck_id: i64,
    #[serde(default)]
    pub deck_ids: DeckIdMode,
    #[serde(default = "default_timestamp")]
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DeckIdMode {
    #[default]
    Fixed,
    ByName,
}

// Default value functions
fn default_decks() -> String { DEFAULT_DECKS_DIR.to_string() }
fn default_output() -> String { DEFAULT_OUTPUT_DIR.to_string() }
fn default_deck_id() -> i64 { DEFAULT_DECK_ID }
fn default_timestamp() -> i64 { DEFAULT_PACKAGE_TIMESTAMP }

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            decks: default_decks(),
            output: default_output(),
        }
    }
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            deck_id: default_deck_id(),
            deck_ids: DeckIdMode::default(),
            timestamp: default_timestamp(),
        }
    }
}

impl PackageConfig {
    /// A fixed id may not reuse the id of Anki's built-in `Default` deck.
    pub fn deck_id_policy(&self) -> Result<DeckIdPolicy, DomainError> {
        match self.deck_ids {
            DeckIdMode::Fixed if self.deck_id == ANKI_DEFAULT_DECK_ID => {
                Err(DomainError::ConfigError(format!(
                    "Deck id {} is reserved for Anki's Default deck",
                    self.deck_id
                )))
            }
            DeckIdMode::Fixed => Ok(DeckIdPolicy::Fixed(self.deck_id)),
            DeckIdMode::ByName => Ok(DeckIdPolicy::FromName { seed: self.deck_id }),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse TOML config")?;

        Ok(config)
    }

    /// Load configuration if the file exists, defaults otherwise
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_file() {
            debug!(?path, "Loading config file");
            Self::load(path)
        } else {
            debug!(?path, "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Create default configuration file at path
    pub fn create_default(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }
}
