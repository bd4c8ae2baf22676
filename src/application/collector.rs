// src/application/collector.rs
use crate::domain::{IncompleteNote, NoteContent, Side, SidePresence};
use crate::infrastructure::file_reader::read_note_file;
use crate::util::text::extract_first_line;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

/// Notes of one deck keyed by file prefix.
pub type DeckNotes = BTreeMap<String, NoteContent>;

/// Everything found under the decks root.
#[derive(Debug, Default)]
pub struct CollectedDecks {
    /// Deck folder name -> notes
    pub decks: BTreeMap<String, DeckNotes>,
    /// Prefixes dropped because a side was missing
    pub warnings: Vec<IncompleteNote>,
}

impl CollectedDecks {
    pub fn note_count(&self) -> usize {
        self.decks.values().map(|notes| notes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }
}

/// Collect every deck folder directly below `root`.
///
/// Non-directory entries are skipped. Incomplete notes are logged and
/// reported in [`CollectedDecks::warnings`]; unreadable files abort.
#[instrument(level = "debug")]
pub fn collect_decks(root: &Path) -> Result<CollectedDecks> {
    let mut collected = CollectedDecks::default();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if is_dangling_link(&err) => {
                debug!(path = ?err.path(), "Skipping dangling symlink");
                continue;
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to list decks in {}", root.display()));
            }
        };

        if !entry.file_type().is_dir() {
            debug!(path = %entry.path().display(), "Skipping non-directory entry");
            continue;
        }
        let Some(deck_name) = entry.file_name().to_str() else {
            debug!(path = %entry.path().display(), "Skipping deck folder with non UTF-8 name");
            continue;
        };

        let (notes, mut warnings) = collect_deck(deck_name, entry.path())?;
        info!(deck = deck_name, notes = notes.len(), "Collected deck");

        collected.decks.insert(deck_name.to_string(), notes);
        collected.warnings.append(&mut warnings);
    }

    Ok(collected)
}

/// Pair up the note files of a single deck folder and read them.
pub fn collect_deck(deck_name: &str, deck_dir: &Path) -> Result<(DeckNotes, Vec<IncompleteNote>)> {
    let pairings = scan_pairings(deck_dir)?;
    let (complete, warnings) = validate_pairings(deck_name, pairings);

    let mut notes = DeckNotes::new();
    for prefix in complete {
        let content = NoteContent {
            front: read_note_file(deck_dir.join(Side::Front.filename(&prefix)))?,
            back: read_note_file(deck_dir.join(Side::Back.filename(&prefix)))?,
        };
        debug!(
            deck = deck_name,
            prefix = %prefix,
            question = %extract_first_line(&content.front),
            "Read note"
        );
        notes.insert(prefix, content);
    }

    Ok((notes, warnings))
}

/// Record which sides exist for every prefix in `deck_dir` (no recursion).
fn scan_pairings(deck_dir: &Path) -> Result<BTreeMap<String, SidePresence>> {
    let mut pairings: BTreeMap<String, SidePresence> = BTreeMap::new();

    for entry in WalkDir::new(deck_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if is_dangling_link(&err) => {
                debug!(path = ?err.path(), "Skipping dangling symlink");
                continue;
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to list notes in {}", deck_dir.display()));
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(filename) = entry.file_name().to_str() else {
            debug!(path = %entry.path().display(), "Skipping file with non UTF-8 name");
            continue;
        };

        if let Some((prefix, side)) = Side::split_filename(filename) {
            pairings.entry(prefix.to_string()).or_default().mark(side);
        }
    }

    Ok(pairings)
}

/// Following a link whose target is gone reports `NotFound` for the link itself.
fn is_dangling_link(err: &walkdir::Error) -> bool {
    let not_found = err
        .io_error()
        .is_some_and(|e| e.kind() == ErrorKind::NotFound);
    not_found
        && err
            .path()
            .and_then(|path| path.symlink_metadata().ok())
            .is_some_and(|meta| meta.file_type().is_symlink())
}

/// Keep prefixes that have both sides; warn about and drop the rest.
pub fn validate_pairings(
    deck_name: &str,
    pairings: BTreeMap<String, SidePresence>,
) -> (Vec<String>, Vec<IncompleteNote>) {
    let mut complete = Vec::new();
    let mut incomplete = Vec::new();

    for (prefix, presence) in pairings {
        if presence.is_complete() {
            complete.push(prefix);
        } else {
            let note = IncompleteNote {
                deck: deck_name.to_string(),
                prefix,
                present: presence.present(),
            };
            warn!(deck = deck_name, "{}", note);
            incomplete.push(note);
        }
    }

    (complete, incomplete)
}
