//! Deck construction and deck-code conversion.

use crate::db::YugiDb;
use crate::error::Result;
use crate::models::{Card, Deck};

/// Query interface for decks.
///
/// Omega-code parsing needs the database to split cards into main and extra
/// deck; YDKE codes carry that split themselves.
pub struct DeckQuery<'a> {
    db: &'a YugiDb,
}

impl<'a> DeckQuery<'a> {
    /// Create a new `DeckQuery` bound to the given database.
    pub fn new(db: &'a YugiDb) -> Self {
        Self { db }
    }

    /// Parse an Omega deck code.
    pub fn from_omega_code(&self, code: &str, name: &str) -> Result<Deck> {
        Deck::from_omega_code(self.db, code, name)
    }

    /// Parse a `ydke://` deck code.
    pub fn from_ydke(&self, code: &str, name: &str) -> Result<Deck> {
        Deck::from_ydke(code, name)
    }

    /// Resolve a deck's card ids to cards, in deck order, one entry per
    /// copy. Unknown ids are skipped.
    pub fn cards(&self, deck: &Deck) -> Vec<Card> {
        let mut out = Vec::new();
        for (id, count) in deck.all_cards() {
            if let Some(card) = self.db.get_card_by_id(id) {
                for _ in 0..count {
                    out.push(card.clone());
                }
            }
        }
        out
    }

    /// The deck's cover card, if set and known.
    pub fn cover_card(&self, deck: &Deck) -> Option<Card> {
        if deck.cover_card == 0 {
            return None;
        }
        self.db.get_card_by_id(deck.cover_card)
    }

    /// All main-deck triples legal as a "Small World" search chain.
    pub fn small_world_triples(&self, deck: &Deck) -> Vec<[u32; 3]> {
        deck.small_world_triples(self.db)
    }
}
