//! Archetype entity: a named card grouping keyed by a 16-bit code.

use std::fmt;

use serde::Serialize;

/// A named archetype. Id 0 is reserved and means "no archetype"; the loader
/// never creates an entity for it.
///
/// Membership lists hold card ids and are filled by a single scan over all
/// cards at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Archetype {
    pub id: u16,
    pub name: String,
    /// Cards whose member-archetype list references this id.
    pub members: Vec<u32>,
    /// Cards whose support list references this id.
    pub support: Vec<u32>,
    /// Cards whose related list references this id.
    pub related: Vec<u32>,
}

impl Archetype {
    pub fn new(id: u16, name: impl Into<String>) -> Self {
        Archetype {
            id,
            name: name.into(),
            ..Default::default()
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
