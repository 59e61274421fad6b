//! Archetype queries against a loaded database.

use std::collections::HashMap;

use crate::db::YugiDb;
use crate::error::Result;
use crate::models::{Archetype, Card};

/// Query interface for archetypes.
pub struct ArchetypeQuery<'a> {
    db: &'a YugiDb,
}

impl<'a> ArchetypeQuery<'a> {
    /// Create a new `ArchetypeQuery` bound to the given database.
    pub fn new(db: &'a YugiDb) -> Self {
        Self { db }
    }

    /// All archetypes, in database order.
    pub fn all(&self) -> Vec<Archetype> {
        self.db.get_archetypes()
    }

    /// Get a single archetype by its code.
    pub fn get_by_id(&self, id: u16) -> Option<Archetype> {
        self.db.get_archetype_by_id(id)
    }

    /// Get a single archetype by name (case-insensitive).
    pub fn get_by_name(&self, name: &str) -> Option<Archetype> {
        self.db.get_archetype_by_name(name)
    }

    /// Search archetypes using per-field filter expressions.
    pub fn search(&self, params: &HashMap<String, String>) -> Result<Vec<Archetype>> {
        self.db.get_archetypes_by_values(params)
    }

    /// The archetypes a card is a member of.
    pub fn of_card(&self, card: &Card) -> Vec<Archetype> {
        self.db.get_card_archetypes(card)
    }

    /// An archetype's member cards.
    pub fn cards(&self, arch: &Archetype) -> Vec<Card> {
        self.db.get_archetype_cards(arch)
    }
}
