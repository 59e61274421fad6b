//! The card entity: decoded accessors over one raw database row.
//!
//! The packed integers are stored verbatim and decoded on access. Several
//! columns are overloaded by card super-type: `level` carries pendulum scale
//! in its high bytes and link rating for Link monsters, and `def` carries
//! linkmarker bits for Link monsters instead of a defense value.

use std::fmt;

use serde::Serialize;

use crate::codec;
use crate::enums::{Attribute, Category, CardType, Genre, LinkMarker, Race, Status};
use crate::error::Result;
use crate::storage::CardRow;

/// Slot widths for the three archetype-id lists.
pub const ARCH_SLOTS: usize = 4;
pub const SUPPORT_SLOTS: usize = 2;
pub const RELATED_SLOTS: usize = 2;

// ---------------------------------------------------------------------------
// DefField
// ---------------------------------------------------------------------------

/// Tagged view of the `def` storage slot. Exactly one interpretation is
/// valid per card: linkmarkers for Link monsters, a defense value otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefField {
    Value(i32),
    Markers(LinkMarker),
}

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// One card, wrapping the raw packed row.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: u32,
    pub name: String,
    text: String,
    type_data: u32,
    race_data: u64,
    attribute_data: u32,
    category_data: u32,
    genre_data: u64,
    level_data: i64,
    pub atk: i32,
    def_data: i32,
    pub status: u8,
    arch_code: u64,
    support_code: u64,
    pub alias: u32,
    pub scripted: bool,
    pub tcg_date: i64,
    pub ocg_date: i64,
    pub koid: Option<u32>,
    /// Pack ids this card appears in, filled by the loader.
    pub sets: Vec<u32>,
}

impl From<CardRow> for Card {
    fn from(row: CardRow) -> Self {
        Card {
            id: row.id,
            name: row.name,
            text: row.text,
            type_data: row.type_data,
            race_data: row.race_data,
            attribute_data: row.attribute_data,
            category_data: row.category_data,
            genre_data: row.genre_data,
            level_data: row.level_data,
            atk: row.atk,
            def_data: row.def_data,
            status: row.status,
            arch_code: row.arch_code,
            support_code: row.support_code,
            alias: row.alias,
            scripted: row.scripted,
            tcg_date: row.tcg_date,
            ocg_date: row.ocg_date,
            koid: row.koid,
            sets: Vec::new(),
        }
    }
}

impl Card {
    // -- Flag fields -------------------------------------------------------

    pub fn card_type(&self) -> CardType {
        CardType::from_bits_truncate(self.type_data)
    }

    /// Replace the whole type bit space.
    pub fn set_card_type(&mut self, new: CardType) {
        self.type_data = new.bits();
    }

    /// Replace only the ability sub-range, leaving super-type and the rest
    /// of the bit space untouched.
    pub fn set_ability(&mut self, new: CardType) {
        let new = new & CardType::ABILITY_MASK;
        self.type_data = (self.type_data & !CardType::ABILITY_MASK.bits()) | new.bits();
    }

    /// Replace only the extra-deck sub-range.
    pub fn set_ed_type(&mut self, new: CardType) {
        let new = new & CardType::ED_MASK;
        self.type_data = (self.type_data & !CardType::ED_MASK.bits()) | new.bits();
    }

    /// Replace only the spell/trap property sub-range.
    pub fn set_property(&mut self, new: CardType) {
        let new = new & CardType::PROPERTY_MASK;
        self.type_data = (self.type_data & !CardType::PROPERTY_MASK.bits()) | new.bits();
    }

    pub fn has_type(&self, t: CardType) -> bool {
        self.card_type().intersects(t)
    }

    pub fn has_all_types(&self, t: CardType) -> bool {
        self.card_type().contains(t)
    }

    pub fn race(&self) -> Race {
        Race::from_bits_truncate(self.race_data)
    }

    pub fn set_race(&mut self, new: Race) {
        self.race_data = new.bits();
    }

    pub fn attribute(&self) -> Attribute {
        Attribute::from_bits_truncate(self.attribute_data)
    }

    pub fn set_attribute(&mut self, new: Attribute) {
        self.attribute_data = new.bits();
    }

    pub fn category(&self) -> Category {
        Category::from_bits_truncate(self.category_data)
    }

    pub fn set_category(&mut self, new: Category) {
        self.category_data = new.bits();
    }

    pub fn has_category(&self, c: Category) -> bool {
        self.category().intersects(c)
    }

    pub fn genre(&self) -> Genre {
        Genre::from_bits_truncate(self.genre_data)
    }

    pub fn set_genre(&mut self, new: Genre) {
        self.genre_data = new.bits();
    }

    // -- Level / scale -----------------------------------------------------

    /// Level, rank or link rating. For Pendulum monsters only the low 16
    /// bits count; otherwise the raw value is returned as-is (so the `-2`
    /// "?" sentinel survives).
    pub fn level(&self) -> i32 {
        if self.has_type(CardType::Pendulum) {
            (self.level_data & 0xFFFF) as i32
        } else {
            self.level_data as i32
        }
    }

    /// Set the level, re-embedding the current scale for Pendulum monsters.
    pub fn set_level(&mut self, new: u16) {
        if self.has_type(CardType::Pendulum) {
            self.level_data = codec::compose_pendulum(self.scale(), new);
        } else {
            self.level_data = i64::from(new);
        }
    }

    /// Pendulum scale, 0 for non-Pendulum cards.
    pub fn scale(&self) -> u8 {
        if self.has_type(CardType::Pendulum) {
            let (lscale, _, _) = codec::parse_pendulum(self.level_data);
            lscale
        } else {
            0
        }
    }

    /// Set the scale without perturbing the level. No-op for non-Pendulum
    /// cards, which have no scale bytes.
    pub fn set_scale(&mut self, new: u8) {
        if self.has_type(CardType::Pendulum) {
            let (_, _, level) = codec::parse_pendulum(self.level_data);
            self.level_data = codec::compose_pendulum(new, level);
        }
    }

    // -- Def / linkmarkers -------------------------------------------------

    /// Defense value. Always 0 for Link monsters, whose def slot stores
    /// linkmarkers instead.
    pub fn def_(&self) -> i32 {
        if self.has_type(CardType::Link) {
            0
        } else {
            self.def_data
        }
    }

    /// Set the defense value. No-op for Link monsters.
    pub fn set_def(&mut self, new: i32) {
        if !self.has_type(CardType::Link) {
            self.def_data = new;
        }
    }

    /// Link arrows. Empty for non-Link cards.
    pub fn linkmarkers(&self) -> LinkMarker {
        if self.has_type(CardType::Link) {
            LinkMarker::from_bits_truncate(self.def_data as u32)
        } else {
            LinkMarker::empty()
        }
    }

    /// Set the link arrows. No-op for non-Link cards.
    pub fn set_linkmarkers(&mut self, new: LinkMarker) {
        if self.has_type(CardType::Link) {
            self.def_data = new.bits() as i32;
        }
    }

    pub fn has_linkmarker(&self, marker: LinkMarker) -> bool {
        self.linkmarkers().contains(marker)
    }

    /// The def slot with its per-super-type meaning made explicit.
    pub fn def_field(&self) -> DefField {
        if self.has_type(CardType::Link) {
            DefField::Markers(self.linkmarkers())
        } else {
            DefField::Value(self.def_data)
        }
    }

    /// Link rating (the level slot of a Link monster), 0 otherwise.
    pub fn link_rating(&self) -> i32 {
        if self.has_type(CardType::Link) {
            self.level()
        } else {
            0
        }
    }

    // -- Archetype codes ---------------------------------------------------

    /// Member-archetype ids, up to four, zero chunks dropped.
    pub fn archetypes(&self) -> Vec<u16> {
        codec::split_chunks(self.arch_code, ARCH_SLOTS)
    }

    pub fn set_archetypes(&mut self, ids: &[u16]) -> Result<()> {
        self.arch_code = codec::pack_chunks(ids, ARCH_SLOTS)?;
        Ok(())
    }

    /// Support-archetype ids, up to two (low half of the support code).
    pub fn support(&self) -> Vec<u16> {
        codec::split_chunks(self.support_code & 0xFFFF_FFFF, SUPPORT_SLOTS)
    }

    pub fn set_support(&mut self, ids: &[u16]) -> Result<()> {
        let low = codec::pack_chunks(ids, SUPPORT_SLOTS)?;
        self.support_code = (self.support_code & !0xFFFF_FFFF) | low;
        Ok(())
    }

    /// Related-archetype ids, up to two (high half of the support code).
    pub fn related(&self) -> Vec<u16> {
        codec::split_chunks(self.support_code >> 32, RELATED_SLOTS)
    }

    pub fn set_related(&mut self, ids: &[u16]) -> Result<()> {
        let high = codec::pack_chunks(ids, RELATED_SLOTS)?;
        self.support_code = (self.support_code & 0xFFFF_FFFF) | (high << 32);
        Ok(())
    }

    /// Dedup union of member, support and related archetype ids, in
    /// first-seen order.
    pub fn combined_archetypes(&self) -> Vec<u16> {
        let mut all = self.archetypes();
        for id in self.support().into_iter().chain(self.related()) {
            if !all.contains(&id) {
                all.push(id);
            }
        }
        all
    }

    // Raw slot reads for the filter descriptor table, which needs the
    // undecoded values for its "?" sentinels.
    pub(crate) fn raw_level(&self) -> i64 {
        self.level_data
    }

    pub(crate) fn raw_def(&self) -> i32 {
        self.def_data
    }

    // -- Text --------------------------------------------------------------

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, new: impl Into<String>) {
        self.text = new.into();
    }

    // -- Predicates ----------------------------------------------------------

    pub fn is_extra_deck_monster(&self) -> bool {
        self.has_type(CardType::ED_MASK | CardType::Token)
    }

    pub fn is_main_deck_monster(&self) -> bool {
        self.has_type(CardType::Monster) && !self.is_extra_deck_monster()
    }

    pub fn is_trap_monster(&self) -> bool {
        self.has_type(CardType::Trap) && self.level() != 0
    }

    pub fn is_dark_synchro(&self) -> bool {
        self.has_category(Category::DarkCard) && self.has_type(CardType::Synchro)
    }

    pub fn is_rush(&self) -> bool {
        self.has_category(Category::RushCard | Category::RushLegendary | Category::RushMax)
    }

    pub fn is_beta(&self) -> bool {
        self.has_category(Category::BetaCard)
    }

    pub fn is_skill_card(&self) -> bool {
        self.has_category(Category::SkillCard)
    }

    pub fn is_god_card(&self) -> bool {
        self.has_category(Category::RedGod | Category::BlueGod | Category::YellowGod)
    }

    pub fn is_pre_errata(&self) -> bool {
        self.has_category(Category::PreErrata)
    }

    pub fn has_atk_equ_def(&self) -> bool {
        self.has_type(CardType::Monster) && self.atk == self.def_()
    }

    pub fn is_ocg_only(&self) -> bool {
        Status::from_raw(self.status) == Some(Status::Ocg)
    }

    pub fn is_tcg_only(&self) -> bool {
        Status::from_raw(self.status) == Some(Status::Tcg)
    }

    pub fn is_legal(&self) -> bool {
        Status::from_raw(self.status) == Some(Status::Legal)
    }

    pub fn is_illegal(&self) -> bool {
        Status::from_raw(self.status) == Some(Status::Illegal)
    }

    // -- Small World -------------------------------------------------------

    /// Count how many of {attribute, race, atk, def, level} two cards share.
    fn shared_stats(a: &Card, b: &Card) -> usize {
        [
            a.attribute() == b.attribute(),
            a.race() == b.race(),
            a.atk == b.atk,
            a.def_() == b.def_(),
            a.level() == b.level(),
        ]
        .iter()
        .filter(|&&m| m)
        .count()
    }

    /// Legality check for the "Small World" search chain: both adjacent
    /// pairs (hand, deck) and (deck, add) must share exactly one stat.
    pub fn compare_small_world(hand: &Card, deck: &Card, add: &Card) -> bool {
        Card::shared_stats(hand, deck) == 1 && Card::shared_stats(deck, add) == 1
    }

    // -- Export --------------------------------------------------------------

    /// Serializable summary with all packed fields decoded to names, for
    /// JSON consumers.
    pub fn export(&self) -> CardExport<'_> {
        CardExport {
            id: self.id,
            name: &self.name,
            text: &self.text,
            card_type: self.card_type().names(),
            race: self.race().names(),
            attribute: self.attribute().names(),
            category: self.category().names(),
            level: self.level(),
            scale: self.scale(),
            atk: self.atk,
            def: self.def_(),
            linkmarkers: self.linkmarkers().names(),
            archetypes: self.archetypes(),
            support: self.support(),
            related: self.related(),
            sets: &self.sets,
            status: self.status,
            koid: self.koid,
        }
    }
}

/// Decoded card summary produced by [`Card::export`].
#[derive(Debug, Serialize)]
pub struct CardExport<'a> {
    pub id: u32,
    pub name: &'a str,
    pub text: &'a str,
    #[serde(rename = "type")]
    pub card_type: Vec<&'static str>,
    pub race: Vec<&'static str>,
    pub attribute: Vec<&'static str>,
    pub category: Vec<&'static str>,
    pub level: i32,
    pub scale: u8,
    pub atk: i32,
    pub def: i32,
    pub linkmarkers: Vec<&'static str>,
    pub archetypes: Vec<u16>,
    pub support: Vec<u16>,
    pub related: Vec<u16>,
    pub sets: &'a [u32],
    pub status: u8,
    pub koid: Option<u32>,
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
