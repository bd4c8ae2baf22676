// src/util/testing.rs

use anyhow::Result;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::DeckPackager;
use crate::domain::{Deck, DomainError, NoteContent};

/// What the mock saw for one `write_package` call
#[derive(Debug, Clone)]
pub struct PackagedDeck {
    pub id: i64,
    pub name: String,
    pub path: PathBuf,
    /// (model id, fields) per deck note
    pub cards: Vec<(i64, NoteContent)>,
}

/// Shared mock packager for testing the pipeline without the apkg format
///
/// Records every deck it is asked to write and, unless disabled, writes a
/// plain-text summary to the target path so overwrites can be observed.
///
/// # Examples
///
/// ```
/// use ankipack::util::testing::MockPackager;
///
/// let mock = MockPackager::builder()
///     .failing_on("Broken")
///     .without_files()
///     .build();
/// assert!(mock.packaged().is_empty());
/// ```
pub struct MockPackager {
    packaged: Vec<PackagedDeck>,
    failing_decks: Vec<String>,
    write_files: bool,
}

impl MockPackager {
    pub fn builder() -> MockPackagerBuilder {
        MockPackagerBuilder::new()
    }

    pub fn packaged(&self) -> &[PackagedDeck] {
        &self.packaged
    }

    /// Text written in place of a real package
    pub fn summary(deck: &Deck) -> String {
        let mut summary = format!("{} ({})\n", deck.name(), deck.id());
        for note in deck.notes() {
            summary.push_str(&format!(
                "{}\t{}\t{}\n",
                note.model.id, note.content.front, note.content.back
            ));
        }
        summary
    }
}

impl DeckPackager for MockPackager {
    fn write_package(&mut self, deck: &Deck, path: &Path) -> Result<(), DomainError> {
        if self.failing_decks.iter().any(|name| name == deck.name()) {
            return Err(DomainError::PackageError(format!(
                "Configured failure for deck {}",
                deck.name()
            )));
        }

        if self.write_files {
            std::fs::write(path, Self::summary(deck))
                .map_err(|e| DomainError::PackageError(e.to_string()))?;
        }

        self.packaged.push(PackagedDeck {
            id: deck.id(),
            name: deck.name().to_string(),
            path: path.to_path_buf(),
            cards: deck
                .notes()
                .iter()
                .map(|note| (note.model.id, note.content.clone()))
                .collect(),
        });
        Ok(())
    }
}

/// Builder for MockPackager
///
/// Provides a fluent interface for configuring mock behavior.
pub struct MockPackagerBuilder {
    failing_decks: Vec<String>,
    write_files: bool,
}

impl MockPackagerBuilder {
    pub fn new() -> Self {
        Self {
            failing_decks: Vec::new(),
            write_files: true,
        }
    }

    /// Fail with a package error when asked to write this deck
    pub fn failing_on(mut self, deck_name: &str) -> Self {
        self.failing_decks.push(deck_name.to_string());
        self
    }

    /// Only record calls, leave the filesystem alone
    pub fn without_files(mut self) -> Self {
        self.write_files = false;
        self
    }

    pub fn build(self) -> MockPackager {
        MockPackager {
            packaged: Vec::new(),
            failing_decks: self.failing_decks,
            write_files: self.write_files,
        }
    }
}

impl Default for MockPackagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["walkdir", "rusqlite"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Set up the subscriber with environment filter
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    // Build and set the subscriber
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
