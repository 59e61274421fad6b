//! Shared test fixtures for the integration tests.
//!
//! Provides `sample_db()`, an in-memory [`RowSource`] populated with a small
//! hand-built card pool covering the packed-field decodings: a plain effect
//! monster, a pendulum, a link, spells/traps, and "?"-stat cards.

#![allow(dead_code)]

use yugidb_sdk::storage::{ArchetypeRow, CardRow, PackRow, RelationRow, RowSource};
use yugidb_sdk::{Result, YugiDb};

// Fixture passcodes.
pub const METEORAGON: u32 = 10497636;
pub const ODD_EYES: u32 = 16178681;
pub const DECODE_TALKER: u32 = 1861629;
pub const MONSTER_REBORN: u32 = 83764718;
pub const BLUE_EYES: u32 = 89631139;
pub const PROTO_TRAP: u32 = 900_001;
pub const UNKNOWN_STATS: u32 = 900_002;
pub const WAR_ROCK_MOUNTAIN: u32 = 900_003;
pub const REBORN_PRE_ERRATA: u32 = 90_000_004;

// Fixture archetype codes.
pub const WAR_ROCK_ARCH: u16 = 0x157;
pub const METEOR_ARCH: u16 = 0x299;

/// In-memory row source with a fixed card pool.
pub struct SampleSource;

impl RowSource for SampleSource {
    fn card_rows(&self) -> Result<Vec<CardRow>> {
        Ok(vec![
            // Effect monster with an archetype and a support archetype.
            CardRow {
                id: METEORAGON,
                name: "War Rock Meteoragon".into(),
                text: "If a \"War Rock\" monster battles, your opponent cannot \
                       activate cards or effects until the end of the Damage Step."
                    .into(),
                type_data: 0x21, // Monster | Effect
                race_data: 0x1,  // Warrior
                attribute_data: 0x1, // EARTH
                level_data: 7,
                atk: 2600,
                def_data: 2600,
                status: 3,
                arch_code: WAR_ROCK_ARCH as u64,
                support_code: METEOR_ARCH as u64,
                scripted: true,
                koid: Some(16278),
                ..Default::default()
            },
            // Pendulum: scale 4 in the high bytes, level 7 in the low.
            CardRow {
                id: ODD_EYES,
                name: "Odd-Eyes Pendulum Dragon".into(),
                text: "You can reduce the battle damage you take to 0.".into(),
                type_data: 0x0100_0021, // Monster | Effect | Pendulum
                race_data: 0x2000,      // Dragon
                attribute_data: 0x20,   // DARK
                level_data: 0x0404_0007,
                atk: 2500,
                def_data: 2000,
                status: 3,
                scripted: true,
                ..Default::default()
            },
            // Link: level slot carries the rating, def slot the arrows.
            CardRow {
                id: DECODE_TALKER,
                name: "Decode Talker".into(),
                text: "Gains 500 ATK for each monster it points to.".into(),
                type_data: 0x0400_0021, // Monster | Effect | Link
                race_data: 0x0100_0000, // Cyberse
                attribute_data: 0x20,   // DARK
                level_data: 3,
                atk: 2300,
                def_data: 0x85, // Top | BottomLeft | BottomRight
                status: 3,
                scripted: true,
                ..Default::default()
            },
            CardRow {
                id: MONSTER_REBORN,
                name: "Monster Reborn".into(),
                text: "Target 1 monster in either GY; Special Summon it.".into(),
                type_data: 0x2, // Spell
                status: 3,
                scripted: true,
                ..Default::default()
            },
            // Pre-errata reprint sharing Monster Reborn's name; the lower id
            // wins name lookups.
            CardRow {
                id: REBORN_PRE_ERRATA,
                name: "Monster Reborn".into(),
                text: "Special Summon 1 monster from either GY.".into(),
                type_data: 0x2,
                category_data: 0x100, // PreErrata
                status: 4,
                scripted: true,
                ..Default::default()
            },
            // Normal monster, OCG-only, atk == def is false here.
            CardRow {
                id: BLUE_EYES,
                name: "Blue-Eyes White Dragon".into(),
                text: "This legendary dragon is a powerful engine of destruction."
                    .into(),
                type_data: 0x11, // Monster | Normal
                race_data: 0x2000,
                attribute_data: 0x10, // LIGHT
                level_data: 8,
                atk: 3000,
                def_data: 2500,
                status: 1,
                scripted: true,
                ..Default::default()
            },
            // Unscripted continuous trap.
            CardRow {
                id: PROTO_TRAP,
                name: "Prototype Barrier".into(),
                text: "Monsters you control cannot be destroyed by battle.".into(),
                type_data: 0x0002_0004, // Trap | Continuous
                status: 3,
                scripted: false,
                ..Default::default()
            },
            // All three stats unknown ("?").
            CardRow {
                id: UNKNOWN_STATS,
                name: "Slashing Phantom".into(),
                text: "Its stats cannot be known.".into(),
                type_data: 0x21,
                race_data: 0x8, // Fiend
                attribute_data: 0x20,
                genre_data: 0x8_0000_0000, // HandTrap, above bit 32
                level_data: -2,
                atk: -2,
                def_data: -2,
                status: 3,
                scripted: true,
                ..Default::default()
            },
            // Spell that names Meteoragon in its text; related archetype in
            // the high half of the support code.
            CardRow {
                id: WAR_ROCK_MOUNTAIN,
                name: "War Rock Mountain".into(),
                text: "Add 1 \"War Rock Meteoragon\" or 1 \"War Rock\" monster \
                       from your Deck to your hand."
                    .into(),
                type_data: 0x0008_0002, // Spell | Field
                status: 3,
                arch_code: WAR_ROCK_ARCH as u64,
                support_code: (METEOR_ARCH as u64) << 32,
                scripted: true,
                ..Default::default()
            },
        ])
    }

    fn archetype_rows(&self) -> Result<Vec<ArchetypeRow>> {
        Ok(vec![
            // Reserved "no archetype" row, never becomes an entity.
            ArchetypeRow {
                name: "".into(),
                official_code: 0,
                beta_code: 0,
            },
            ArchetypeRow {
                name: "War Rock".into(),
                official_code: WAR_ROCK_ARCH,
                beta_code: WAR_ROCK_ARCH,
            },
            // Beta-only archetype, canonicalized to its beta code.
            ArchetypeRow {
                name: "Meteor".into(),
                official_code: 0,
                beta_code: METEOR_ARCH,
            },
            // Conflicting codes, dropped by the loader.
            ArchetypeRow {
                name: "Broken Row".into(),
                official_code: 5,
                beta_code: 7,
            },
        ])
    }

    fn pack_rows(&self) -> Result<Vec<PackRow>> {
        Ok(vec![
            PackRow {
                id: 1,
                abbr: "LIOV".into(),
                name: "Lightning Overdrive".into(),
                tcg_date: 1622764800,
                ocg_date: 1610755200,
            },
            PackRow {
                id: 2,
                abbr: "DUPO".into(),
                name: "Duel Power".into(),
                tcg_date: 1554336000,
                ocg_date: 1554336000,
            },
        ])
    }

    fn relation_rows(&self) -> Result<Vec<RelationRow>> {
        Ok(vec![
            RelationRow {
                card_id: METEORAGON,
                pack_id: 1,
            },
            RelationRow {
                card_id: WAR_ROCK_MOUNTAIN,
                pack_id: 1,
            },
            RelationRow {
                card_id: DECODE_TALKER,
                pack_id: 2,
            },
            RelationRow {
                card_id: BLUE_EYES,
                pack_id: 2,
            },
        ])
    }
}

/// An empty row source; every table loads to zero rows.
pub struct EmptySource;

impl RowSource for EmptySource {
    fn card_rows(&self) -> Result<Vec<CardRow>> {
        Ok(Vec::new())
    }

    fn archetype_rows(&self) -> Result<Vec<ArchetypeRow>> {
        Ok(Vec::new())
    }

    fn pack_rows(&self) -> Result<Vec<PackRow>> {
        Ok(Vec::new())
    }

    fn relation_rows(&self) -> Result<Vec<RelationRow>> {
        Ok(Vec::new())
    }
}

/// Load the sample pool into a database.
pub fn sample_db() -> YugiDb {
    YugiDb::load(&SampleSource).unwrap()
}
