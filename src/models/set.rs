//! Set entity: a release/product grouping of cards.

use std::fmt;

use serde::Serialize;

/// A pack/product release. `contents` holds member card ids, grouped from
/// the card-to-pack relation rows at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CardSet {
    pub id: u32,
    pub name: String,
    pub abbr: String,
    pub tcg_date: i64,
    pub ocg_date: i64,
    pub contents: Vec<u32>,
}

impl CardSet {
    pub fn total(&self) -> usize {
        self.contents.len()
    }
}

impl fmt::Display for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.abbr)
    }
}
