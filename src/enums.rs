//! Bit-packed card field enumerations.
//!
//! Bit values mirror the Omega database layout exactly. The `type` integer is
//! one shared bit space that simultaneously encodes super-type (Monster/
//! Spell/Trap), extra-deck sub-type, spell/trap property, and ability flags;
//! narrower views over it are provided by sub-range masks on [`CardType`].

// Flag members keep the database's CamelCase spelling so filter tokens
// ("QuickPlay", "BeastWarrior") resolve against member names directly.
#![allow(non_upper_case_globals)]

use bitflags::bitflags;

bitflags! {
    /// Card type bit space. Super-type, sub-type, property and ability flags
    /// all live in this one integer on the `datas.type` column.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CardType: u32 {
        const Monster     = 0x1;
        const Spell       = 0x2;
        const Trap        = 0x4;
        const Normal      = 0x10;
        const Effect      = 0x20;
        const Fusion      = 0x40;
        const Ritual      = 0x80;
        const TrapMonster = 0x100;
        const Spirit      = 0x200;
        const Union       = 0x400;
        const Gemini      = 0x800;
        const Tuner       = 0x1000;
        const Synchro     = 0x2000;
        const Token       = 0x4000;
        const QuickPlay   = 0x10000;
        const Continuous  = 0x20000;
        const Equip       = 0x40000;
        const Field       = 0x80000;
        const Counter     = 0x100000;
        const Flip        = 0x200000;
        const Toon        = 0x400000;
        const Xyz         = 0x800000;
        const Pendulum    = 0x1000000;
        const SpSummon    = 0x2000000;
        const Link        = 0x4000000;
    }
}

impl CardType {
    /// Extra-deck sub-types sharing the `level`/`def` overloads.
    pub const ED_MASK: CardType = CardType::Fusion
        .union(CardType::Synchro)
        .union(CardType::Xyz)
        .union(CardType::Link);

    /// Monster ability flags (Toon/Spirit/Union/Gemini/Flip).
    pub const ABILITY_MASK: CardType = CardType::Toon
        .union(CardType::Spirit)
        .union(CardType::Union)
        .union(CardType::Gemini)
        .union(CardType::Flip);

    /// Spell/trap property flags.
    pub const PROPERTY_MASK: CardType = CardType::Ritual
        .union(CardType::QuickPlay)
        .union(CardType::Continuous)
        .union(CardType::Equip)
        .union(CardType::Field)
        .union(CardType::Counter);
}

bitflags! {
    /// Monster type, or spell/trap property in some beta rows -- the same bit
    /// space is reused depending on the card's super-type. `Galaxy` sits on
    /// bit 31, so the backing width is u64 to keep it unambiguously unsigned.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Race: u64 {
        const Warrior         = 0x1;
        const Spellcaster     = 0x2;
        const Fairy           = 0x4;
        const Fiend           = 0x8;
        const Zombie          = 0x10;
        const Machine         = 0x20;
        const Aqua            = 0x40;
        const Pyro            = 0x80;
        const Rock            = 0x100;
        const WingedBeast     = 0x200;
        const Plant           = 0x400;
        const Insect          = 0x800;
        const Thunder         = 0x1000;
        const Dragon          = 0x2000;
        const Beast           = 0x4000;
        const BeastWarrior    = 0x8000;
        const Dinosaur        = 0x10000;
        const Fish            = 0x20000;
        const SeaSerpent      = 0x40000;
        const Reptile         = 0x80000;
        const Psychic         = 0x100000;
        const DivineBeast     = 0x200000;
        const CreatorGod      = 0x400000;
        const Wyrm            = 0x800000;
        const Cyberse         = 0x1000000;
        const Illusion        = 0x2000000;
        const Cyborg          = 0x4000000;
        const MagicalKnight   = 0x8000000;
        const Highdragon      = 0x10000000;
        const OmegaPsychic    = 0x20000000;
        const CelestialKnight = 0x40000000;
        const Galaxy          = 0x80000000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attribute: u32 {
        const EARTH  = 0x01;
        const WATER  = 0x02;
        const FIRE   = 0x04;
        const WIND   = 0x08;
        const LIGHT  = 0x10;
        const DARK   = 0x20;
        const DIVINE = 0x40;
    }
}

bitflags! {
    /// Meta flags carried on `datas.category`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Category: u32 {
        const SkillCard      = 0x1;
        const SpeedSpellCard = 0x2;
        const BossCard       = 0x4;
        const BetaCard       = 0x8;
        const ActionCard     = 0x10;
        const CommandCard    = 0x20;
        const DoubleScript   = 0x40;
        const RushLegendary  = 0x80;
        const PreErrata      = 0x100;
        const DarkCard       = 0x200;
        const DuelLinks      = 0x400;
        const RushCard       = 0x800;
        const StartCard      = 0x1000;
        const OneCard        = 0x2000;
        const TwoCard        = 0x4000;
        const ThreeCard      = 0x8000;
        const LevelZero      = 0x10000;
        const TreatedAs      = 0x20000;
        const BlueGod        = 0x40000;
        const YellowGod      = 0x80000;
        const RedGod         = 0x100000;
        const RushMax        = 0x200000;
        const SC             = 0x400000;
    }
}

bitflags! {
    /// Effect classification flags, 36 bits wide.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Genre: u64 {
        const STDestroy        = 0x1;
        const DestroyMonster   = 0x2;
        const Banish           = 0x4;
        const Graveyard        = 0x8;
        const BackToHand       = 0x10;
        const BackToDeck       = 0x20;
        const DestroyHand      = 0x40;
        const DestroyDeck      = 0x80;
        const Draw             = 0x100;
        const Search           = 0x200;
        const Recovery         = 0x400;
        const Position         = 0x800;
        const Control          = 0x1000;
        const ChangeAtkDef     = 0x2000;
        const Piercing         = 0x4000;
        const RepeatAttack     = 0x8000;
        const LimitAttack      = 0x10000;
        const DirectAttack     = 0x20000;
        const SpecialSummon    = 0x40000;
        const Token            = 0x80000;
        const TypeRelated      = 0x100000;
        const AttributeRelated = 0x200000;
        const DamageLP         = 0x400000;
        const RecoverLP        = 0x800000;
        const Destroy          = 0x1000000;
        const Select           = 0x2000000;
        const Counter          = 0x4000000;
        const Gamble           = 0x8000000;
        const FusionRelated    = 0x10000000;
        const TunerRelated     = 0x20000000;
        const XyzRelated       = 0x40000000;
        const NegateEffect     = 0x80000000;
        const RitualRelated    = 0x100000000;
        const PendulumRelated  = 0x200000000;
        const LinkRelated      = 0x400000000;
        const HandTrap         = 0x800000000;
    }
}

bitflags! {
    /// Link arrow positions. Stored in the `def` slot of Link monsters.
    /// There is no Center bit (0x10 is unused).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LinkMarker: u32 {
        const BottomLeft  = 0x01;
        const Bottom      = 0x02;
        const BottomRight = 0x04;
        const Left        = 0x08;
        const Right       = 0x20;
        const TopLeft     = 0x40;
        const Top         = 0x80;
        const TopRight    = 0x100;
    }
}

/// Ban-list / region status (`datas.ot`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ocg = 1,
    Tcg = 2,
    Legal = 3,
    Illegal = 4,
}

impl Status {
    pub fn from_raw(raw: u8) -> Option<Status> {
        match raw {
            1 => Some(Status::Ocg),
            2 => Some(Status::Tcg),
            3 => Some(Status::Legal),
            4 => Some(Status::Illegal),
            _ => None,
        }
    }
}

/// Case-insensitive flag lookup by member name, used by the filter language.
fn flag_by_name<F>(token: &str) -> Option<F>
where
    F: bitflags::Flags + Copy,
{
    F::FLAGS
        .iter()
        .find(|f| f.name().eq_ignore_ascii_case(token))
        .map(|f| *f.value())
}

/// Names of all set members, in declaration order.
fn flag_names<F>(value: F) -> Vec<&'static str>
where
    F: bitflags::Flags + Copy,
{
    value.iter_names().map(|(name, _)| name).collect()
}

macro_rules! flag_token_impls {
    ($($ty:ty),+) => {
        $(impl $ty {
            /// Parse a single member from its name, ignoring case.
            pub fn from_token(token: &str) -> Option<Self> {
                flag_by_name(token)
            }

            /// Names of all set members, in declaration order.
            pub fn names(self) -> Vec<&'static str> {
                flag_names(self)
            }
        })+
    };
}

flag_token_impls!(CardType, Race, Attribute, Category, Genre, LinkMarker);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_token_is_case_insensitive() {
        assert_eq!(CardType::from_token("monster"), Some(CardType::Monster));
        assert_eq!(CardType::from_token("QUICKPLAY"), Some(CardType::QuickPlay));
        assert_eq!(Race::from_token("beastwarrior"), Some(Race::BeastWarrior));
        assert_eq!(Attribute::from_token("dark"), Some(Attribute::DARK));
        assert_eq!(CardType::from_token("nonsense"), None);
    }

    #[test]
    fn high_bit_race_decodes_unsigned() {
        // Galaxy occupies bit 31; a row read through a signed 32-bit lens
        // would flip negative, so the backing store is u64.
        let raw: u64 = 0x80000000;
        let race = Race::from_bits_truncate(raw);
        assert_eq!(race, Race::Galaxy);
        assert_eq!(race.names(), vec!["Galaxy"]);
    }

    #[test]
    fn names_follow_declaration_order() {
        let t = CardType::Monster | CardType::Effect | CardType::Pendulum;
        assert_eq!(t.names(), vec!["Monster", "Effect", "Pendulum"]);
    }

    #[test]
    fn type_sub_ranges_are_disjoint() {
        assert!(CardType::ED_MASK
            .intersection(CardType::ABILITY_MASK)
            .is_empty());
        assert!(CardType::ED_MASK
            .intersection(CardType::PROPERTY_MASK)
            .is_empty());
        assert!(CardType::ABILITY_MASK
            .intersection(CardType::PROPERTY_MASK)
            .is_empty());
    }

    #[test]
    fn status_from_raw() {
        assert_eq!(Status::from_raw(3), Some(Status::Legal));
        assert_eq!(Status::from_raw(0), None);
    }
}
