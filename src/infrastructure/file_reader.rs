// src/infrastructure/file_reader.rs
use anyhow::{Context, Result};
use std::path::Path;

/// Read one side of a note as UTF-8 text
pub fn read_note_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read note file {}", path.display()))
}
