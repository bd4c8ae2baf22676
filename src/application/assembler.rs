// src/application/assembler.rs
use crate::application::CollectedDecks;
use crate::domain::{is_reversible, CardModel, Deck, DeckIdPolicy, FORWARD_MODEL, REVERSE_MODEL};
use tracing::{debug, instrument, trace};

/// Turns collected notes into decks bound to card models.
pub struct DeckAssembler {
    policy: DeckIdPolicy,
}

impl DeckAssembler {
    pub fn new(policy: DeckIdPolicy) -> Self {
        Self { policy }
    }

    /// Models a note is rendered with: forward always, reverse for
    /// `.reversible` prefixes.
    pub fn models_for(prefix: &str) -> Vec<&'static CardModel> {
        if is_reversible(prefix) {
            vec![&FORWARD_MODEL, &REVERSE_MODEL]
        } else {
            vec![&FORWARD_MODEL]
        }
    }

    /// One deck per collected folder, in name order.
    #[instrument(level = "debug", skip_all)]
    pub fn assemble(&self, collected: &CollectedDecks) -> Vec<Deck> {
        collected
            .decks
            .iter()
            .map(|(name, notes)| {
                let mut deck = Deck::new(self.policy.id_for(name), name.as_str());

                for (prefix, content) in notes {
                    for model in Self::models_for(prefix) {
                        trace!(deck = %name, prefix = %prefix, model = model.name, "Adding card");
                        deck.add_note(model, content.clone());
                    }
                }

                debug!(deck = %name, id = deck.id(), cards = deck.notes().len(), "Assembled deck");
                deck
            })
            .collect()
    }
}

impl Default for DeckAssembler {
    fn default() -> Self {
        Self::new(DeckIdPolicy::default())
    }
}
