//! Set queries against a loaded database.

use std::collections::HashMap;

use crate::db::YugiDb;
use crate::error::Result;
use crate::models::{Card, CardSet};

/// Query interface for sets (pack/product releases).
pub struct SetQuery<'a> {
    db: &'a YugiDb,
}

impl<'a> SetQuery<'a> {
    /// Create a new `SetQuery` bound to the given database.
    pub fn new(db: &'a YugiDb) -> Self {
        Self { db }
    }

    /// All sets, in database order. Empty when the snapshot carries no pack
    /// tables.
    pub fn all(&self) -> Vec<CardSet> {
        self.db.get_sets()
    }

    /// Get a single set by its id.
    pub fn get_by_id(&self, id: u32) -> Option<CardSet> {
        self.db.get_set_by_id(id)
    }

    /// Get a single set by name (case-insensitive).
    pub fn get_by_name(&self, name: &str) -> Option<CardSet> {
        self.db.get_set_by_name(name)
    }

    /// Search sets using per-field filter expressions.
    pub fn search(&self, params: &HashMap<String, String>) -> Result<Vec<CardSet>> {
        self.db.get_sets_by_values(params)
    }

    /// A set's member cards.
    pub fn cards(&self, set: &CardSet) -> Vec<Card> {
        self.db.get_set_cards(set)
    }

    /// The sets a card was released in.
    pub fn of_card(&self, card: &Card) -> Vec<CardSet> {
        self.db.get_card_sets(card)
    }
}
