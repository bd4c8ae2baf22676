// src/application/mod.rs
pub mod assembler;
pub mod collector;
pub mod pipeline;
pub mod writer;

pub use assembler::DeckAssembler;
pub use collector::{collect_decks, CollectedDecks};
pub use pipeline::{build, BuildReport, BuildSettings};
pub use writer::{DeckPackager, DeckWriter};
