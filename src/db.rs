//! In-memory card database and query façade.
//!
//! [`YugiDb::load`] drains a [`RowSource`] once and builds the three entity
//! tables (cards, archetypes, sets) plus id indexes. All lookups after that
//! are pure in-memory scans; query results are owned clones so callers can
//! mutate them freely without touching the database state.

use std::collections::HashMap;

use crate::enums::CardType;
use crate::error::Result;
use crate::filter::{self, ARCHETYPE_FIELDS, CARD_FIELDS, SET_FIELDS};
use crate::models::{Archetype, Card, CardSet};
use crate::storage::RowSource;

/// The loaded database. Construct via [`YugiDb::load`]; multiple instances
/// over different snapshots can coexist.
pub struct YugiDb {
    cards: Vec<Card>,
    card_index: HashMap<u32, usize>,
    archetypes: Vec<Archetype>,
    arch_index: HashMap<u16, usize>,
    sets: Vec<CardSet>,
    set_index: HashMap<u32, usize>,
}

impl YugiDb {
    /// Build the full entity graph from a row source.
    ///
    /// Cards keep source order. Archetype rows are canonicalized: the
    /// official code wins when present, beta-only rows fall back to the beta
    /// code, and rows with neither (or conflicting codes) are dropped along
    /// with the reserved id 0.
    pub fn load(source: &dyn RowSource) -> Result<YugiDb> {
        let mut cards: Vec<Card> = source
            .card_rows()?
            .into_iter()
            .map(Card::from)
            .collect();
        let card_index: HashMap<u32, usize> = cards
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect();

        // Archetypes, canonicalized.
        let mut archetypes = Vec::new();
        let mut arch_index = HashMap::new();
        for row in source.archetype_rows()? {
            let id = if row.official_code > 0 && row.beta_code == row.official_code {
                row.official_code
            } else if row.official_code == 0 && row.beta_code > 0 {
                row.beta_code
            } else {
                continue;
            };
            if arch_index.contains_key(&id) {
                continue;
            }
            arch_index.insert(id, archetypes.len());
            archetypes.push(Archetype::new(id, row.name));
        }

        // Membership scan: each card registers itself on the archetypes its
        // packed codes reference.
        for card in &cards {
            for (ids, pick) in [
                (card.archetypes(), 0usize),
                (card.support(), 1),
                (card.related(), 2),
            ] {
                for arch_id in ids {
                    if let Some(&i) = arch_index.get(&arch_id) {
                        let arch = &mut archetypes[i];
                        match pick {
                            0 => arch.members.push(card.id),
                            1 => arch.support.push(card.id),
                            _ => arch.related.push(card.id),
                        }
                    }
                }
            }
        }

        // Sets and the card-to-set relation.
        let mut sets: Vec<CardSet> = source
            .pack_rows()?
            .into_iter()
            .map(|row| CardSet {
                id: row.id,
                name: row.name,
                abbr: row.abbr,
                tcg_date: row.tcg_date,
                ocg_date: row.ocg_date,
                contents: Vec::new(),
            })
            .collect();
        let set_index: HashMap<u32, usize> = sets
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id, i))
            .collect();
        for rel in source.relation_rows()? {
            if let Some(&si) = set_index.get(&rel.pack_id) {
                sets[si].contents.push(rel.card_id);
            }
            if let Some(&ci) = card_index.get(&rel.card_id) {
                cards[ci].sets.push(rel.pack_id);
            }
        }

        Ok(YugiDb {
            cards,
            card_index,
            archetypes,
            arch_index,
            sets,
            set_index,
        })
    }

    // -- Card lookups --------------------------------------------------------

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// All cards, in source order.
    pub fn get_cards(&self) -> Vec<Card> {
        self.cards.clone()
    }

    pub fn get_card_by_id(&self, id: u32) -> Option<Card> {
        self.card_index.get(&id).map(|&i| self.cards[i].clone())
    }

    pub fn get_cards_by_ids(&self, ids: &[u32]) -> Vec<Card> {
        ids.iter()
            .filter_map(|&id| self.get_card_by_id(id))
            .collect()
    }

    /// Case-insensitive name lookup; the lowest id wins when reprints share
    /// a name.
    pub fn get_card_by_name(&self, name: &str) -> Option<Card> {
        self.cards
            .iter()
            .filter(|c| c.name.eq_ignore_ascii_case(name))
            .min_by_key(|c| c.id)
            .cloned()
    }

    /// Filtered card search; see [`crate::filter`] for the expression
    /// grammar. No recognized key means no constraints, which yields an
    /// empty result rather than the whole table.
    pub fn get_cards_by_values(&self, params: &HashMap<String, String>) -> Result<Vec<Card>> {
        let filters = filter::compile_query(CARD_FIELDS, params)?;
        if filters.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .cards
            .iter()
            .filter(|c| filter::matches_all(&filters, c))
            .cloned()
            .collect())
    }

    /// Single-field shorthand for [`Self::get_cards_by_values`].
    pub fn get_cards_by_value(&self, key: &str, value: &str) -> Result<Vec<Card>> {
        let params = HashMap::from([(key.to_string(), value.to_string())]);
        self.get_cards_by_values(&params)
    }

    /// Arbitrary predicate search for the cases the filter language cannot
    /// express.
    pub fn get_cards_by_query<F>(&self, query: F) -> Vec<Card>
    where
        F: Fn(&Card) -> bool,
    {
        self.cards.iter().filter(|c| query(c)).cloned().collect()
    }

    /// Cards that either mention one of the given card names in their text
    /// or belong to one of the given archetypes (member, support or
    /// related). Both match case-insensitively.
    pub fn get_related_cards(
        &self,
        given_archetypes: &[&str],
        given_cards: &[&str],
    ) -> Vec<Card> {
        self.cards
            .iter()
            .filter(|card| {
                let text = card.text().to_lowercase();
                if given_cards
                    .iter()
                    .any(|name| text.contains(&name.to_lowercase()))
                {
                    return true;
                }
                card.combined_archetypes().iter().any(|arch_id| {
                    self.arch_index.get(arch_id).is_some_and(|&i| {
                        given_archetypes
                            .iter()
                            .any(|name| self.archetypes[i].name.eq_ignore_ascii_case(name))
                    })
                })
            })
            .cloned()
            .collect()
    }

    /// Cards that should have a script but don't: spells, traps and effect
    /// monsters with no script, no alias, and a legal status. Skill cards
    /// are illegal in normal play, so they only show up when asked for.
    pub fn get_unscripted(&self, include_skillcards: bool) -> Vec<Card> {
        self.cards
            .iter()
            .filter(|c| {
                !c.scripted
                    && c.has_type(CardType::Spell | CardType::Trap | CardType::Effect)
                    && c.alias == 0
                    && (!c.is_illegal() || (include_skillcards && c.is_skill_card()))
            })
            .cloned()
            .collect()
    }

    // -- Archetype lookups ---------------------------------------------------

    pub fn get_archetypes(&self) -> Vec<Archetype> {
        self.archetypes.clone()
    }

    pub fn get_archetype_by_id(&self, id: u16) -> Option<Archetype> {
        self.arch_index.get(&id).map(|&i| self.archetypes[i].clone())
    }

    pub fn get_archetypes_by_ids(&self, ids: &[u16]) -> Vec<Archetype> {
        ids.iter()
            .filter_map(|&id| self.get_archetype_by_id(id))
            .collect()
    }

    pub fn get_archetype_by_name(&self, name: &str) -> Option<Archetype> {
        self.archetypes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn get_archetypes_by_values(
        &self,
        params: &HashMap<String, String>,
    ) -> Result<Vec<Archetype>> {
        let filters = filter::compile_query(ARCHETYPE_FIELDS, params)?;
        if filters.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .archetypes
            .iter()
            .filter(|a| filter::matches_all(&filters, a))
            .cloned()
            .collect())
    }

    /// The archetypes a card is a member of (not support/related).
    pub fn get_card_archetypes(&self, card: &Card) -> Vec<Archetype> {
        self.get_archetypes_by_ids(&card.archetypes())
    }

    pub fn get_archetype_cards(&self, arch: &Archetype) -> Vec<Card> {
        self.get_cards_by_ids(&arch.members)
    }

    // -- Set lookups ---------------------------------------------------------

    pub fn get_sets(&self) -> Vec<CardSet> {
        self.sets.clone()
    }

    pub fn get_set_by_id(&self, id: u32) -> Option<CardSet> {
        self.set_index.get(&id).map(|&i| self.sets[i].clone())
    }

    pub fn get_set_by_name(&self, name: &str) -> Option<CardSet> {
        self.sets
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn get_sets_by_values(&self, params: &HashMap<String, String>) -> Result<Vec<CardSet>> {
        let filters = filter::compile_query(SET_FIELDS, params)?;
        if filters.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .sets
            .iter()
            .filter(|s| filter::matches_all(&filters, s))
            .cloned()
            .collect())
    }

    pub fn get_set_cards(&self, set: &CardSet) -> Vec<Card> {
        self.get_cards_by_ids(&set.contents)
    }

    pub fn get_card_sets(&self, card: &Card) -> Vec<CardSet> {
        card.sets
            .iter()
            .filter_map(|&id| self.get_set_by_id(id))
            .collect()
    }
}
