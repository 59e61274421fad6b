//! Card queries against a loaded database.

use std::collections::HashMap;

use crate::db::YugiDb;
use crate::error::Result;
use crate::models::Card;

/// Query interface for cards.
pub struct CardQuery<'a> {
    db: &'a YugiDb,
}

impl<'a> CardQuery<'a> {
    /// Create a new `CardQuery` bound to the given database.
    pub fn new(db: &'a YugiDb) -> Self {
        Self { db }
    }

    /// Number of cards in the database.
    pub fn count(&self) -> usize {
        self.db.card_count()
    }

    /// All cards, in database order.
    pub fn all(&self) -> Vec<Card> {
        self.db.get_cards()
    }

    /// Get a single card by its passcode.
    pub fn get_by_id(&self, id: u32) -> Option<Card> {
        self.db.get_card_by_id(id)
    }

    /// Resolve a batch of passcodes, skipping unknown ids.
    pub fn get_by_ids(&self, ids: &[u32]) -> Vec<Card> {
        self.db.get_cards_by_ids(ids)
    }

    /// Get a single card by name (case-insensitive).
    pub fn get_by_name(&self, name: &str) -> Option<Card> {
        self.db.get_card_by_name(name)
    }

    /// Search cards using per-field filter expressions; see
    /// [`crate::filter`] for the grammar.
    pub fn search(&self, params: &HashMap<String, String>) -> Result<Vec<Card>> {
        self.db.get_cards_by_values(params)
    }

    /// Single-field search shorthand.
    pub fn search_by(&self, key: &str, value: &str) -> Result<Vec<Card>> {
        self.db.get_cards_by_value(key, value)
    }

    /// Search with an arbitrary predicate.
    pub fn search_with<F>(&self, query: F) -> Vec<Card>
    where
        F: Fn(&Card) -> bool,
    {
        self.db.get_cards_by_query(query)
    }

    /// Cards belonging to the given archetypes or mentioning the given card
    /// names in their text.
    pub fn related(&self, archetypes: &[&str], card_names: &[&str]) -> Vec<Card> {
        self.db.get_related_cards(archetypes, card_names)
    }

    /// Spells, traps and effect monsters that have no script.
    pub fn unscripted(&self, include_skillcards: bool) -> Vec<Card> {
        self.db.get_unscripted(include_skillcards)
    }

    /// Serialize a card to JSON with all packed fields decoded to names.
    pub fn export_json(&self, card: &Card) -> Result<String> {
        serde_json::to_string_pretty(&card.export()).map_err(Into::into)
    }
}
