// src/application/pipeline.rs
use crate::application::{collect_decks, DeckAssembler, DeckPackager, DeckWriter};
use crate::constants::{DEFAULT_DECKS_DIR, DEFAULT_OUTPUT_DIR};
use crate::domain::{DeckIdPolicy, IncompleteNote};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Where to read decks from, where to write them, how to number them.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSettings {
    pub decks_dir: PathBuf,
    pub output_dir: PathBuf,
    pub deck_ids: DeckIdPolicy,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            decks_dir: PathBuf::from(DEFAULT_DECKS_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            deck_ids: DeckIdPolicy::default(),
        }
    }
}

/// Outcome of one build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Package files in write order
    pub packages: Vec<PathBuf>,
    /// Complete notes found
    pub notes: usize,
    /// Notes written into packages, reverse cards included
    pub cards: usize,
    /// Notes skipped for a missing side
    pub skipped: Vec<IncompleteNote>,
}

/// Collect, assemble and write every deck below `settings.decks_dir`.
#[instrument(level = "debug", skip(packager))]
pub fn build<P: DeckPackager>(settings: &BuildSettings, packager: P) -> Result<BuildReport> {
    let collected = collect_decks(&settings.decks_dir)?;
    let notes = collected.note_count();

    let decks = DeckAssembler::new(settings.deck_ids).assemble(&collected);
    let cards: usize = decks.iter().map(|deck| deck.notes().len()).sum();

    let mut writer = DeckWriter::new(packager, &settings.output_dir);
    let packages = writer.write_all(&decks)?;

    info!(
        decks = packages.len(),
        notes,
        cards,
        skipped = collected.warnings.len(),
        output = %settings.output_dir.display(),
        "Build finished"
    );

    Ok(BuildReport {
        packages,
        notes,
        cards,
        skipped: collected.warnings,
    })
}
