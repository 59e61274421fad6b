//! Query interfaces over a loaded [`YugiDb`](crate::db::YugiDb).
//!
//! Each module provides a lightweight wrapper that borrows the database and
//! groups one entity's lookups. Results are owned clones.

pub mod archetypes;
pub mod cards;
pub mod decks;
pub mod sets;

pub use archetypes::ArchetypeQuery;
pub use cards::CardQuery;
pub use decks::DeckQuery;
pub use sets::SetQuery;
