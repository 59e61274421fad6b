//! Filter-language integration tests: field expressions evaluated over the
//! whole sample pool through the search façade.

mod common;

use std::collections::HashMap;

use yugidb_sdk::YugidbError;

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|&(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn ids(cards: &[yugidb_sdk::Card]) -> Vec<u32> {
    cards.iter().map(|c| c.id).collect()
}

// ---------------------------------------------------------------------------
// Grammar
// ---------------------------------------------------------------------------

#[test]
fn comma_is_and() {
    let db = common::sample_db();

    // Dragons that are Normal monsters: only Blue-Eyes.
    let found = db
        .get_cards_by_values(&params(&[("type", "monster,normal"), ("race", "dragon")]))
        .unwrap();
    assert_eq!(ids(&found), vec![common::BLUE_EYES]);
}

#[test]
fn pipe_is_or_of_and_groups() {
    let db = common::sample_db();

    let found = db
        .get_cards_by_values(&params(&[("type", "monster,normal|monster,pendulum")]))
        .unwrap();
    let mut found = ids(&found);
    found.sort_unstable();
    let mut expected = vec![common::ODD_EYES, common::BLUE_EYES];
    expected.sort_unstable();
    assert_eq!(found, expected);
}

#[test]
fn dnf_selects_the_union_of_groups() {
    let db = common::sample_db();

    let found = db
        .get_cards_by_values(&params(&[("type", "monster,normal|monster,effect")]))
        .unwrap();
    let mut found = ids(&found);
    found.sort_unstable();

    // Every monster in the pool is Normal or Effect; the spells and the
    // trap fall outside both groups.
    let mut expected = vec![
        common::METEORAGON,
        common::ODD_EYES,
        common::DECODE_TALKER,
        common::BLUE_EYES,
        common::UNKNOWN_STATS,
    ];
    expected.sort_unstable();
    assert_eq!(found, expected);
}

#[test]
fn bare_negation_excludes_the_flag() {
    let db = common::sample_db();

    let found = db.get_cards_by_value("type", "~link").unwrap();
    assert_eq!(found.len(), db.card_count() - 1);
    assert!(!ids(&found).contains(&common::DECODE_TALKER));
}

#[test]
fn tilde_negates_one_term() {
    let db = common::sample_db();

    // Monsters that are not Link monsters.
    let found = db
        .get_cards_by_values(&params(&[("type", "monster,~link")]))
        .unwrap();
    assert!(!ids(&found).contains(&common::DECODE_TALKER));
    assert!(ids(&found).contains(&common::METEORAGON));
}

#[test]
fn comparators_apply_to_int_fields() {
    let db = common::sample_db();

    let found = db.get_cards_by_value("atk", ">=2600").unwrap();
    let mut found = ids(&found);
    found.sort_unstable();
    let mut expected = vec![common::METEORAGON, common::BLUE_EYES];
    expected.sort_unstable();
    assert_eq!(found, expected);

    let found = db.get_cards_by_value("level", "!=7").unwrap();
    assert!(!ids(&found).contains(&common::METEORAGON));
    assert!(!ids(&found).contains(&common::ODD_EYES));
    assert!(ids(&found).contains(&common::BLUE_EYES));
}

#[test]
fn multiple_keys_are_anded() {
    let db = common::sample_db();

    let found = db
        .get_cards_by_values(&params(&[("attribute", "dark"), ("atk", ">2300")]))
        .unwrap();
    assert_eq!(ids(&found), vec![common::ODD_EYES]);
}

// ---------------------------------------------------------------------------
// Field semantics
// ---------------------------------------------------------------------------

#[test]
fn flag_fields_test_bit_presence() {
    let db = common::sample_db();

    let traps = db.get_cards_by_value("type", "trap").unwrap();
    assert_eq!(ids(&traps), vec![common::PROTO_TRAP]);

    let warriors = db.get_cards_by_value("race", "warrior").unwrap();
    assert_eq!(ids(&warriors), vec![common::METEORAGON]);
}

#[test]
fn text_fields_fold_case() {
    let db = common::sample_db();

    let found = db.get_cards_by_value("name", "decode talker").unwrap();
    assert_eq!(ids(&found), vec![common::DECODE_TALKER]);

    let found = db.get_cards_by_value("in_name", "WAR ROCK").unwrap();
    let mut found = ids(&found);
    found.sort_unstable();
    let mut expected = vec![common::METEORAGON, common::WAR_ROCK_MOUNTAIN];
    expected.sort_unstable();
    assert_eq!(found, expected);

    let found = db.get_cards_by_value("mentions", "damage step").unwrap();
    assert_eq!(ids(&found), vec![common::METEORAGON]);
}

#[test]
fn koid_lookup_skips_cards_without_one() {
    let db = common::sample_db();

    let found = db.get_cards_by_value("koid", "16278").unwrap();
    assert_eq!(ids(&found), vec![common::METEORAGON]);

    // Only Meteoragon carries a koid, so nothing else may leak through a
    // comparator or a negated equality.
    let found = db.get_cards_by_value("koid", "!=16278").unwrap();
    assert!(found.is_empty());

    let found = db.get_cards_by_value("koid", "<100000").unwrap();
    assert_eq!(ids(&found), vec![common::METEORAGON]);
}

#[test]
fn genre_and_category_are_flag_fields() {
    let db = common::sample_db();

    // HandTrap sits above bit 32 of the genre space.
    let found = db.get_cards_by_value("genre", "handtrap").unwrap();
    assert_eq!(ids(&found), vec![common::UNKNOWN_STATS]);

    let found = db.get_cards_by_value("category", "preerrata").unwrap();
    assert_eq!(ids(&found), vec![common::REBORN_PRE_ERRATA]);
}

#[test]
fn scale_filter_only_sees_pendulums() {
    let db = common::sample_db();

    let found = db.get_cards_by_value("scale", "4").unwrap();
    assert_eq!(ids(&found), vec![common::ODD_EYES]);

    // Plain monsters never match a scale constraint, even "0".
    let found = db.get_cards_by_value("scale", "0").unwrap();
    assert!(found.is_empty());
}

#[test]
fn linkmarker_filter_only_sees_links() {
    let db = common::sample_db();

    let found = db.get_cards_by_value("linkmarker", "top").unwrap();
    assert_eq!(ids(&found), vec![common::DECODE_TALKER]);

    let found = db.get_cards_by_value("linkmarker", "left").unwrap();
    assert!(found.is_empty());
}

#[test]
fn question_mark_matches_unknown_stats() {
    let db = common::sample_db();

    for key in ["atk", "def", "level"] {
        let found = db.get_cards_by_value(key, "?").unwrap();
        assert_eq!(ids(&found), vec![common::UNKNOWN_STATS], "key {}", key);
    }
}

#[test]
fn atk_def_cross_reference_special() {
    let db = common::sample_db();

    // The "?" card matches too: -2 == -2.
    let found = db.get_cards_by_value("atk", "def").unwrap();
    let mut found = ids(&found);
    found.sort_unstable();
    let mut expected = vec![common::METEORAGON, common::UNKNOWN_STATS];
    expected.sort_unstable();
    assert_eq!(found, expected);
}

#[test]
fn status_is_an_int_field() {
    let db = common::sample_db();

    let ocg_only = db.get_cards_by_value("status", "1").unwrap();
    assert_eq!(ids(&ocg_only), vec![common::BLUE_EYES]);

    // Everything but the illegal pre-errata reprint.
    let either = db.get_cards_by_value("status", "1|3").unwrap();
    assert_eq!(either.len(), db.card_count() - 1);
}

// ---------------------------------------------------------------------------
// Errors and degenerate queries
// ---------------------------------------------------------------------------

#[test]
fn unknown_keys_are_ignored() {
    let db = common::sample_db();

    // Only unrecognized keys: no constraints, so nothing matches.
    let found = db
        .get_cards_by_values(&params(&[("flavor", "tasty")]))
        .unwrap();
    assert!(found.is_empty());

    // Mixed with a real key, the unknown one contributes nothing.
    let found = db
        .get_cards_by_values(&params(&[("flavor", "tasty"), ("race", "warrior")]))
        .unwrap();
    assert_eq!(ids(&found), vec![common::METEORAGON]);
}

#[test]
fn bad_tokens_error_loudly() {
    let db = common::sample_db();

    let err = db.get_cards_by_value("type", "mosnter").unwrap_err();
    assert!(matches!(err, YugidbError::InvalidFilter(_)));

    let err = db.get_cards_by_value("level", "four").unwrap_err();
    assert!(matches!(err, YugidbError::InvalidFilter(_)));

    let err = db.get_cards_by_value("atk", "3|").unwrap_err();
    assert!(matches!(err, YugidbError::InvalidFilter(_)));
}

#[test]
fn empty_params_match_nothing() {
    let db = common::sample_db();

    let found = db.get_cards_by_values(&HashMap::new()).unwrap();
    assert!(found.is_empty());
}
