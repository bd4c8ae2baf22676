// src/domain/note.rs
use crate::constants::{BACK_SUFFIX, FRONT_SUFFIX, REVERSIBLE_MARKER};
use serde::Serialize;
use std::fmt;

/// One side of a note, recognized by its file name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Front, Side::Back];

    pub fn suffix(self) -> &'static str {
        match self {
            Side::Front => FRONT_SUFFIX,
            Side::Back => BACK_SUFFIX,
        }
    }

    /// Split a file name into note prefix and side.
    ///
    /// Returns `None` for names without a recognized suffix.
    ///
    /// ```
    /// use ankipack::domain::Side;
    ///
    /// assert_eq!(Side::split_filename("tree.front.html"), Some(("tree", Side::Front)));
    /// assert_eq!(Side::split_filename("notes.txt"), None);
    /// ```
    pub fn split_filename(filename: &str) -> Option<(&str, Side)> {
        Side::ALL.into_iter().find_map(|side| {
            filename
                .strip_suffix(side.suffix())
                .map(|prefix| (prefix, side))
        })
    }

    /// File name holding this side of the note `prefix`.
    pub fn filename(self, prefix: &str) -> String {
        format!("{}{}", prefix, self.suffix())
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Front => write!(f, "front"),
            Side::Back => write!(f, "back"),
        }
    }
}

/// Raw content of both sides of a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteContent {
    pub front: String,
    pub back: String,
}

impl NoteContent {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }

    pub fn side(&self, side: Side) -> &str {
        match side {
            Side::Front => &self.front,
            Side::Back => &self.back,
        }
    }

    /// Field values in model order: `[Front, Back]`.
    pub fn fields(&self) -> [&str; 2] {
        [&self.front, &self.back]
    }
}

/// Does this note prefix ask for a reverse card as well?
pub fn is_reversible(prefix: &str) -> bool {
    prefix.ends_with(REVERSIBLE_MARKER)
}

/// Sides seen so far for one note prefix while scanning a deck folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SidePresence {
    front: bool,
    back: bool,
}

impl SidePresence {
    pub fn mark(&mut self, side: Side) {
        match side {
            Side::Front => self.front = true,
            Side::Back => self.back = true,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.front && self.back
    }

    pub fn present(&self) -> Vec<Side> {
        Side::ALL
            .into_iter()
            .filter(|side| match side {
                Side::Front => self.front,
                Side::Back => self.back,
            })
            .collect()
    }
}

/// A note prefix dropped because one of its sides is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncompleteNote {
    pub deck: String,
    pub prefix: String,
    pub present: Vec<Side>,
}

impl fmt::Display for IncompleteNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Note with name {} does not have two sides!", self.prefix)
    }
}
