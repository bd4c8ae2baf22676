use anyhow::{Context, Result};
use ankipack::infrastructure::apkg::COLLECTION_ENTRY;
use rusqlite::Connection;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

/// Temporary working tree with a `decks/` input and a `dist/` output dir
#[allow(dead_code)]
pub struct DeckTree {
    temp_dir: TempDir,
    pub decks_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[allow(dead_code)]
impl DeckTree {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir().context("Failed to create temporary directory")?;
        let decks_dir = temp_dir.path().join("decks");
        let output_dir = temp_dir.path().join("dist");
        fs::create_dir_all(&decks_dir).context("Failed to create decks directory")?;

        Ok(Self {
            temp_dir,
            decks_dir,
            output_dir,
        })
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create an empty deck folder
    pub fn deck(&self, deck: &str) -> Result<PathBuf> {
        let dir = self.decks_dir.join(deck);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Write both sides of a note
    pub fn note(&self, deck: &str, prefix: &str, front: &str, back: &str) -> Result<()> {
        self.file(deck, &format!("{prefix}.front.html"), front)?;
        self.file(deck, &format!("{prefix}.back.html"), back)
    }

    /// Write an arbitrary file into a deck folder
    pub fn file(&self, deck: &str, name: &str, content: &str) -> Result<()> {
        let dir = self.deck(deck)?;
        fs::write(dir.join(name), content)?;
        Ok(())
    }

    pub fn package(&self, deck: &str) -> PathBuf {
        self.output_dir.join(format!("{deck}.apkg"))
    }
}

/// A note row read back from a package
#[allow(dead_code)]
#[derive(Debug, PartialEq)]
pub struct PackagedNote {
    pub model_id: i64,
    pub fields: Vec<String>,
}

/// Extract `collection.anki2` from a package and open it
pub fn open_package(package: &Path, scratch: &Path) -> Result<Connection> {
    let mut archive = ZipArchive::new(File::open(package)?)?;
    let mut bytes = Vec::new();
    archive.by_name(COLLECTION_ENTRY)?.read_to_end(&mut bytes)?;

    let db_path = scratch.join(format!(
        "{}.anki2",
        package.file_stem().and_then(|s| s.to_str()).unwrap_or("package")
    ));
    fs::write(&db_path, bytes)?;
    Ok(Connection::open(db_path)?)
}

/// Notes of a package in insertion order
#[allow(dead_code)]
pub fn packaged_notes(package: &Path, scratch: &Path) -> Result<Vec<PackagedNote>> {
    let conn = open_package(package, scratch)?;
    let mut stmt = conn.prepare("SELECT mid, flds FROM notes ORDER BY id")?;
    let notes = stmt
        .query_map([], |row| {
            let flds: String = row.get(1)?;
            Ok(PackagedNote {
                model_id: row.get(0)?,
                fields: flds.split('\x1f').map(str::to_string).collect(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(notes)
}

/// Deck names stored in the package, default deck excluded
#[allow(dead_code)]
pub fn packaged_deck_names(package: &Path, scratch: &Path) -> Result<Vec<String>> {
    let conn = open_package(package, scratch)?;
    let decks: String = conn.query_row("SELECT decks FROM col", [], |row| row.get(0))?;
    let decks: serde_json::Value = serde_json::from_str(&decks)?;

    let mut names: Vec<String> = decks
        .as_object()
        .map(|decks| {
            decks
                .iter()
                .filter(|(id, _)| id.as_str() != "1")
                .filter_map(|(_, deck)| deck["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    Ok(names)
}
