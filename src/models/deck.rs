//! Deck entity and the two deck-code wire formats.
//!
//! *Omega code*: `[main+extra count][side count]` then 4-byte little-endian
//! card ids (one per physical copy), optionally followed by a 4-byte cover
//! card id, raw-deflated and base64-encoded. The main/extra split is not in
//! the wire format; it is recovered from extra-deck membership.
//!
//! *YDKE*: `ydke://` plus three base64 segments separated by `!`, each a
//! flat uncompressed run of 4-byte little-endian ids.

use std::fmt;
use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::db::YugiDb;
use crate::error::{Result, YugidbError};

pub const MAIN_DECK_MIN_SIZE: u32 = 40;
pub const MAIN_DECK_MAX_SIZE: u32 = 60;
pub const EXTRA_DECK_MAX_SIZE: u32 = 15;
pub const SIDE_DECK_MAX_SIZE: u32 = 15;

// ---------------------------------------------------------------------------
// Deck
// ---------------------------------------------------------------------------

/// A deck list: three zones of `(card id, copy count)` pairs plus an
/// optional cover card (0 = none).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    pub name: String,
    pub main: Vec<(u32, u32)>,
    pub extra: Vec<(u32, u32)>,
    pub side: Vec<(u32, u32)>,
    pub cover_card: u32,
}

impl Deck {
    pub fn total_main(&self) -> u32 {
        self.main.iter().map(|&(_, n)| n).sum()
    }

    pub fn total_extra(&self) -> u32 {
        self.extra.iter().map(|&(_, n)| n).sum()
    }

    pub fn total_side(&self) -> u32 {
        self.side.iter().map(|&(_, n)| n).sum()
    }

    /// All zones chained, main first.
    pub fn all_cards(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.main
            .iter()
            .chain(self.extra.iter())
            .chain(self.side.iter())
            .copied()
    }

    /// Tournament legality of the deck shape: main 40-60, extra and side at
    /// most 15, no more than 3 copies of any card.
    pub fn is_valid(&self) -> bool {
        let main_ok =
            (MAIN_DECK_MIN_SIZE..=MAIN_DECK_MAX_SIZE).contains(&self.total_main());
        let extra_ok = self.total_extra() <= EXTRA_DECK_MAX_SIZE;
        let side_ok = self.total_side() <= SIDE_DECK_MAX_SIZE;
        let counts_ok = self.all_cards().all(|(_, n)| n <= 3);
        main_ok && extra_ok && side_ok && counts_ok
    }

    // -- Omega code --------------------------------------------------------

    /// Decode an omega deck code. The database is consulted to split the
    /// interleaved main+extra run into its two zones.
    pub fn from_omega_code(db: &YugiDb, code: &str, name: &str) -> Result<Deck> {
        let compressed = BASE64.decode(code)?;
        let mut bytes = Vec::new();
        DeflateDecoder::new(&compressed[..])
            .read_to_end(&mut bytes)
            .map_err(|e| YugidbError::DeckCode(format!("inflate failed: {}", e)))?;

        if bytes.len() < 2 {
            return Err(YugidbError::DeckCode(
                "omega payload shorter than its two count bytes".into(),
            ));
        }
        let deck_count = bytes[0] as usize;
        let side_count = bytes[1] as usize;
        let side_offset = 2 + 4 * deck_count;
        let cover_offset = side_offset + 4 * side_count;
        if bytes.len() < cover_offset {
            return Err(YugidbError::DeckCode(format!(
                "omega payload truncated: expected {} bytes, got {}",
                cover_offset,
                bytes.len()
            )));
        }

        let main_extra = count_ids(read_ids(&bytes[2..side_offset]));
        let mut main = Vec::new();
        let mut extra = Vec::new();
        for (id, count) in main_extra {
            let card = db.get_card_by_id(id).ok_or_else(|| {
                YugidbError::NotFound(format!("deck code references unknown card {}", id))
            })?;
            if card.is_extra_deck_monster() {
                extra.push((id, count));
            } else {
                main.push((id, count));
            }
        }
        let side = count_ids(read_ids(&bytes[side_offset..cover_offset]));

        let cover_card = bytes
            .get(cover_offset..cover_offset + 4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .unwrap_or(0);

        Ok(Deck {
            name: name.to_string(),
            main,
            extra,
            side,
            cover_card,
        })
    }

    /// Encode as an omega deck code.
    pub fn omega_code(&self) -> Result<String> {
        let deck_count = self.total_main() + self.total_extra();
        let side_count = self.total_side();
        // Each count is one wire byte; a larger deck has no omega encoding.
        if deck_count > u8::MAX as u32 || side_count > u8::MAX as u32 {
            return Err(YugidbError::DeckCode(format!(
                "deck too large for an omega code: {} main+extra, {} side (max 255 each)",
                deck_count, side_count
            )));
        }

        let mut payload = vec![deck_count as u8, side_count as u8];
        for (id, count) in self.all_cards() {
            for _ in 0..count {
                payload.extend_from_slice(&id.to_le_bytes());
            }
        }
        payload.extend_from_slice(&self.cover_card.to_le_bytes());

        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&payload)?;
        let compressed = encoder.finish()?;
        Ok(BASE64.encode(compressed))
    }

    // -- YDKE --------------------------------------------------------------

    /// Decode a `ydke://` code. Zones are explicit in the format, so no
    /// database lookup is needed.
    pub fn from_ydke(code: &str, name: &str) -> Result<Deck> {
        let body = code.strip_prefix("ydke://").ok_or_else(|| {
            YugidbError::DeckCode("missing ydke:// prefix".into())
        })?;
        let segments: Vec<&str> = body.split('!').collect();
        if segments.len() < 3 {
            return Err(YugidbError::DeckCode(format!(
                "expected 3 ydke segments, got {}",
                segments.len()
            )));
        }

        let decode_zone = |segment: &str| -> Result<Vec<(u32, u32)>> {
            let bytes = BASE64.decode(segment)?;
            if bytes.len() % 4 != 0 {
                return Err(YugidbError::DeckCode(format!(
                    "ydke segment length {} is not a multiple of 4",
                    bytes.len()
                )));
            }
            Ok(count_ids(read_ids(&bytes)))
        };

        Ok(Deck {
            name: name.to_string(),
            main: decode_zone(segments[0])?,
            extra: decode_zone(segments[1])?,
            side: decode_zone(segments[2])?,
            cover_card: 0,
        })
    }

    /// Encode as a `ydke://` code.
    pub fn ydke_code(&self) -> String {
        let encode_zone = |zone: &[(u32, u32)]| -> String {
            let mut bytes = Vec::with_capacity(zone.len() * 4);
            for &(id, count) in zone {
                for _ in 0..count {
                    bytes.extend_from_slice(&id.to_le_bytes());
                }
            }
            BASE64.encode(bytes)
        };
        format!(
            "ydke://{}!{}!{}!",
            encode_zone(&self.main),
            encode_zone(&self.extra),
            encode_zone(&self.side)
        )
    }

    // -- Small World -------------------------------------------------------

    /// All ordered (hand, deck, add) triples of distinct main-deck monsters
    /// from main+side that satisfy the Small World chain rule.
    pub fn small_world_triples(&self, db: &YugiDb) -> Vec<[u32; 3]> {
        use crate::models::Card;

        let candidates: Vec<Card> = self
            .main
            .iter()
            .chain(self.side.iter())
            .filter_map(|&(id, _)| db.get_card_by_id(id))
            .filter(|c| c.is_main_deck_monster())
            .collect();

        let mut triples = Vec::new();
        for (i, hand) in candidates.iter().enumerate() {
            for (j, deck) in candidates.iter().enumerate() {
                if j == i {
                    continue;
                }
                for (k, add) in candidates.iter().enumerate() {
                    if k == i || k == j {
                        continue;
                    }
                    if Card::compare_small_world(hand, deck, add) {
                        triples.push([hand.id, deck.id, add.id]);
                    }
                }
            }
        }
        triples
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} (main {}, extra {}, side {})",
            if self.name.is_empty() {
                "Anonymous Deck"
            } else {
                &self.name
            },
            self.total_main(),
            self.total_extra(),
            self.total_side()
        )
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read a flat run of 4-byte little-endian ids.
fn read_ids(bytes: &[u8]) -> impl Iterator<Item = u32> + '_ {
    bytes
        .chunks_exact(4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Collapse an id run into `(id, count)` pairs, first-seen order.
fn count_ids(ids: impl Iterator<Item = u32>) -> Vec<(u32, u32)> {
    let mut counts: Vec<(u32, u32)> = Vec::new();
    for id in ids {
        match counts.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, n)) => *n += 1,
            None => counts.push((id, 1)),
        }
    }
    counts
}
