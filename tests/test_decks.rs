//! Deck-code and deck-analysis integration tests.

mod common;

use yugidb_sdk::models::Deck;
use yugidb_sdk::queries::DeckQuery;
use yugidb_sdk::YugidbError;

fn sample_deck() -> Deck {
    Deck {
        name: "war rock pile".into(),
        main: vec![
            (common::METEORAGON, 3),
            (common::ODD_EYES, 2),
            (common::MONSTER_REBORN, 1),
            (common::WAR_ROCK_MOUNTAIN, 3),
        ],
        extra: vec![(common::DECODE_TALKER, 2)],
        side: vec![(common::BLUE_EYES, 1)],
        cover_card: common::METEORAGON,
    }
}

// ---------------------------------------------------------------------------
// Omega codes
// ---------------------------------------------------------------------------

#[test]
fn omega_code_round_trips() {
    let db = common::sample_db();
    let dq = DeckQuery::new(&db);

    let deck = sample_deck();
    let code = deck.omega_code().unwrap();
    let back = dq.from_omega_code(&code, "war rock pile").unwrap();

    // The main/extra split is not on the wire; the database recovers it.
    assert_eq!(back, deck);
}

#[test]
fn omega_code_rejects_unknown_cards() {
    let db = common::sample_db();
    let dq = DeckQuery::new(&db);

    let mut deck = sample_deck();
    deck.main.push((424242, 1));
    let code = deck.omega_code().unwrap();

    let err = dq.from_omega_code(&code, "bad").unwrap_err();
    assert!(matches!(err, YugidbError::NotFound(_)));
}

#[test]
fn omega_code_refuses_oversized_decks() {
    let deck = Deck {
        name: "tower".into(),
        main: (1..=300u32).map(|id| (id, 1)).collect(),
        ..Default::default()
    };
    assert!(matches!(
        deck.omega_code().unwrap_err(),
        YugidbError::DeckCode(_)
    ));
}

#[test]
fn omega_code_rejects_garbage() {
    let db = common::sample_db();
    let dq = DeckQuery::new(&db);

    // Valid base64 but not a deflate stream.
    assert!(dq.from_omega_code("AAAA", "x").is_err());
    // Not base64 at all.
    assert!(dq.from_omega_code("!!not base64!!", "x").is_err());
}

// ---------------------------------------------------------------------------
// YDKE codes
// ---------------------------------------------------------------------------

#[test]
fn ydke_code_round_trips() {
    let deck = sample_deck();
    let code = deck.ydke_code();
    assert!(code.starts_with("ydke://"));

    let back = Deck::from_ydke(&code, "war rock pile").unwrap();
    // YDKE carries no cover card.
    assert_eq!(back.main, deck.main);
    assert_eq!(back.extra, deck.extra);
    assert_eq!(back.side, deck.side);
    assert_eq!(back.cover_card, 0);
}

#[test]
fn ydke_requires_prefix_and_three_segments() {
    assert!(matches!(
        Deck::from_ydke("http://nope", "x").unwrap_err(),
        YugidbError::DeckCode(_)
    ));
    assert!(matches!(
        Deck::from_ydke("ydke://AAAA!AAAA", "x").unwrap_err(),
        YugidbError::DeckCode(_)
    ));
    // Segment length not a multiple of 4.
    assert!(Deck::from_ydke("ydke://AAA!!!", "x").is_err());
}

// ---------------------------------------------------------------------------
// Shape validation
// ---------------------------------------------------------------------------

#[test]
fn is_valid_enforces_zone_sizes_and_copy_limits() {
    let mut deck = Deck {
        name: "shape".into(),
        main: (0..40).map(|i| (1000 + i, 1)).collect(),
        extra: (0..15).map(|i| (2000 + i, 1)).collect(),
        side: (0..15).map(|i| (3000 + i, 1)).collect(),
        cover_card: 0,
    };
    assert!(deck.is_valid());

    deck.main.pop();
    assert!(!deck.is_valid()); // 39 main

    deck.main.push((5000, 4));
    assert!(!deck.is_valid()); // 4 copies

    deck.main.pop();
    deck.main.push((5000, 1));
    deck.extra.push((2100, 1));
    assert!(!deck.is_valid()); // 16 extra
}

// ---------------------------------------------------------------------------
// Deck analysis
// ---------------------------------------------------------------------------

#[test]
fn deck_query_resolves_cards_and_cover() {
    let db = common::sample_db();
    let dq = DeckQuery::new(&db);

    let deck = sample_deck();
    let cards = dq.cards(&deck);
    assert_eq!(cards.len(), 12); // one entry per physical copy
    assert_eq!(cards[0].id, common::METEORAGON);

    let cover = dq.cover_card(&deck).unwrap();
    assert_eq!(cover.name, "War Rock Meteoragon");

    let no_cover = Deck::default();
    assert!(dq.cover_card(&no_cover).is_none());
}

#[test]
fn small_world_chains_need_exactly_one_shared_stat() {
    let db = common::sample_db();
    let dq = DeckQuery::new(&db);

    let deck = sample_deck();
    let triples = dq.small_world_triples(&deck);

    // Meteoragon and Odd-Eyes share only their level; Odd-Eyes and
    // Blue-Eyes (side) share only their race. Meteoragon and Blue-Eyes
    // share nothing, so Odd-Eyes must sit in the middle.
    assert!(triples.contains(&[common::METEORAGON, common::ODD_EYES, common::BLUE_EYES]));
    assert!(triples.contains(&[common::BLUE_EYES, common::ODD_EYES, common::METEORAGON]));
    assert!(!triples
        .iter()
        .any(|t| t[1] == common::METEORAGON || t[1] == common::BLUE_EYES));
}
