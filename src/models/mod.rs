//! Entity types decoded from raw database rows.

pub mod archetype;
pub mod card;
pub mod deck;
pub mod set;

pub use archetype::Archetype;
pub use card::{Card, CardExport, DefField};
pub use deck::Deck;
pub use set::CardSet;
