// src/domain/mod.rs
pub mod deck;
pub mod error;
pub mod model;
pub mod note;

pub use deck::{Deck, DeckIdPolicy, DeckNote};
pub use error::DomainError;
pub use model::{CardModel, CardTemplate, RenderedCard, FIELD_NAMES, FORWARD_MODEL, REVERSE_MODEL};
pub use note::{is_reversible, IncompleteNote, NoteContent, Side, SidePresence};
