// src/application/writer.rs
use crate::constants::PACKAGE_EXTENSION;
use crate::domain::{Deck, DomainError};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Serializes a deck into a package file.
pub trait DeckPackager {
    /// Write `deck` to `path`, replacing any existing file
    fn write_package(&mut self, deck: &Deck, path: &Path) -> Result<(), DomainError>;
}

impl<P: DeckPackager + ?Sized> DeckPackager for &mut P {
    fn write_package(&mut self, deck: &Deck, path: &Path) -> Result<(), DomainError> {
        (**self).write_package(deck, path)
    }
}

pub struct DeckWriter<P: DeckPackager> {
    packager: P,
    output_dir: PathBuf,
}

impl<P: DeckPackager> DeckWriter<P> {
    pub fn new(packager: P, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            packager,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `<output_dir>/<deck_name>.apkg`
    pub fn package_path(&self, deck_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", deck_name, PACKAGE_EXTENSION))
    }

    /// Create the output directory; an existing one is fine.
    pub fn ensure_output_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.output_dir.display()
            )
        })
    }

    /// Write every deck in order. A later deck with the same name replaces
    /// the earlier package.
    #[instrument(level = "debug", skip_all, fields(output = %self.output_dir.display()))]
    pub fn write_all(&mut self, decks: &[Deck]) -> Result<Vec<PathBuf>> {
        self.ensure_output_dir()?;

        let mut written = Vec::with_capacity(decks.len());
        for deck in decks {
            let path = self.package_path(deck.name());
            debug!(deck = deck.name(), path = %path.display(), "Writing deck");

            self.packager
                .write_package(deck, &path)
                .with_context(|| format!("Failed to write deck '{}'", deck.name()))?;

            info!(deck = deck.name(), cards = deck.notes().len(), path = %path.display(), "Wrote deck");
            written.push(path);
        }

        Ok(written)
    }

    pub fn into_packager(self) -> P {
        self.packager
    }
}
