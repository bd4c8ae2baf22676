// src/domain/deck.rs
use crate::constants::DEFAULT_DECK_ID;
use crate::domain::{CardModel, NoteContent, RenderedCard};
use sha2::{Digest, Sha256};

const DERIVED_ID_FLOOR: i64 = 1 << 30;

/// How decks get their numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckIdPolicy {
    /// Every deck shares this id.
    Fixed(i64),
    /// Stable id per deck name, mixed with a seed.
    FromName { seed: i64 },
}

impl Default for DeckIdPolicy {
    fn default() -> Self {
        DeckIdPolicy::Fixed(DEFAULT_DECK_ID)
    }
}

impl DeckIdPolicy {
    /// Id for the deck called `name`; always in `[2^30, 2^31)` for `FromName`.
    pub fn id_for(&self, name: &str) -> i64 {
        match *self {
            DeckIdPolicy::Fixed(id) => id,
            DeckIdPolicy::FromName { seed } => {
                let mut hasher = Sha256::new();
                hasher.update(seed.to_le_bytes());
                hasher.update(name.as_bytes());
                let digest = hasher.finalize();

                let mut head = [0u8; 8];
                head.copy_from_slice(&digest[..8]);
                let span = u64::from_le_bytes(head) % (DERIVED_ID_FLOOR as u64);
                DERIVED_ID_FLOOR + span as i64
            }
        }
    }
}

/// A note bound to the layout it is rendered with.
#[derive(Debug, Clone)]
pub struct DeckNote {
    pub model: &'static CardModel,
    pub content: NoteContent,
}

impl DeckNote {
    pub fn render(&self) -> RenderedCard {
        self.model.render(&self.content)
    }
}

/// A named deck ready to be packaged.
#[derive(Debug, Clone)]
pub struct Deck {
    id: i64,
    name: String,
    notes: Vec<DeckNote>,
}

impl Deck {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            notes: Vec::new(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn notes(&self) -> &[DeckNote] {
        &self.notes
    }

    pub fn add_note(&mut self, model: &'static CardModel, content: NoteContent) {
        self.notes.push(DeckNote { model, content });
    }

    /// Models used by at least one note, in first-use order.
    pub fn models(&self) -> Vec<&'static CardModel> {
        let mut models: Vec<&'static CardModel> = Vec::new();
        for note in &self.notes {
            if !models.iter().any(|m| m.id == note.model.id) {
                models.push(note.model);
            }
        }
        models
    }
}
