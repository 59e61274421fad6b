//! Filter-expression interpreter.
//!
//! Each queryable field takes a small expression string:
//!
//! ```text
//! filter   := group ("|" group)*          OR across groups
//! group    := term ("," term)*            AND within a group
//! term     := ["~"] [cmp] token           "~" negates one term
//! cmp      := ">=" | "<=" | "!=" | ">" | "<"   int fields only
//! ```
//!
//! so `"monster,normal|monster,effect"` selects (Monster AND Normal) OR
//! (Monster AND Effect). Flag-valued fields test bit presence; int fields
//! compare; text fields match case-folded, exactly or by substring.
//!
//! Fields are described by a static descriptor table per entity type.
//! Unknown keys in a query are ignored; a token that does not parse for its
//! field kind is a loud [`YugidbError::InvalidFilter`], since that is a
//! caller bug rather than absence of data.

use std::collections::HashMap;

use crate::enums::{Attribute, Category, CardType, Genre, LinkMarker, Race};
use crate::error::{Result, YugidbError};
use crate::models::{Archetype, Card, CardSet};

// ---------------------------------------------------------------------------
// Field descriptors
// ---------------------------------------------------------------------------

/// A field value surfaced to the interpreter.
pub enum FieldValue<'a> {
    Int(i64),
    Text(&'a str),
    Bits(u64),
}

/// How tokens for a field are parsed and matched.
pub enum FieldKind {
    /// Case-insensitive exact string match.
    Text,
    /// Case-insensitive substring match.
    Substring,
    /// Integer comparison; supports the `cmp` prefixes.
    Int,
    /// Bit presence test; the function resolves a member name to its bits.
    Flags(fn(&str) -> Option<u64>),
}

/// One entry of a descriptor table.
pub struct FieldSpec<T: 'static> {
    pub key: &'static str,
    pub kind: FieldKind,
    pub accessor: for<'a> fn(&'a T) -> FieldValue<'a>,
    /// Precondition rows must additionally satisfy (e.g. `scale` only
    /// applies to Pendulum cards).
    pub condition: Option<fn(&T) -> bool>,
    /// Tokens that short-circuit to a fixed predicate instead of the
    /// generic comparator (e.g. `"?"` = value unknown).
    pub special: &'static [(&'static str, fn(&T) -> bool)],
}

// ---------------------------------------------------------------------------
// Compiled filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CmpOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CmpOp {
    fn compare(self, lhs: i64, rhs: i64) -> bool {
        match self {
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Lt => lhs < rhs,
            CmpOp::Ge => lhs >= rhs,
            CmpOp::Le => lhs <= rhs,
        }
    }
}

enum TermKind<T: 'static> {
    Cmp(CmpOp, i64),
    BitTest(u64),
    TextEq(String),
    Contains(String),
    Special(fn(&T) -> bool),
}

struct Term<T: 'static> {
    negated: bool,
    kind: TermKind<T>,
}

impl<T> Term<T> {
    fn eval(&self, spec: &FieldSpec<T>, entity: &T) -> bool {
        let base = match &self.kind {
            TermKind::Special(pred) => pred(entity),
            TermKind::Cmp(op, rhs) => match (spec.accessor)(entity) {
                FieldValue::Int(lhs) => op.compare(lhs, *rhs),
                _ => false,
            },
            TermKind::BitTest(bits) => match (spec.accessor)(entity) {
                FieldValue::Bits(value) => value & bits != 0,
                _ => false,
            },
            TermKind::TextEq(wanted) => match (spec.accessor)(entity) {
                FieldValue::Text(value) => value.to_lowercase() == *wanted,
                _ => false,
            },
            TermKind::Contains(wanted) => match (spec.accessor)(entity) {
                FieldValue::Text(value) => value.to_lowercase().contains(wanted.as_str()),
                _ => false,
            },
        };
        base != self.negated
    }
}

/// A parsed filter expression bound to one field descriptor.
pub struct CompiledFilter<T: 'static> {
    spec: &'static FieldSpec<T>,
    groups: Vec<Vec<Term<T>>>,
}

impl<T> CompiledFilter<T> {
    /// Parse one field's filter string against its descriptor.
    fn compile(spec: &'static FieldSpec<T>, raw: &str) -> Result<Self> {
        let mut groups = Vec::new();
        for group_src in raw.split('|') {
            let mut terms = Vec::new();
            for term_src in group_src.split(',') {
                terms.push(parse_term(spec, term_src.trim())?);
            }
            groups.push(terms);
        }
        Ok(CompiledFilter { spec, groups })
    }

    /// Evaluate against one entity: the field's precondition, then OR over
    /// groups of ANDed terms.
    pub fn matches(&self, entity: &T) -> bool {
        if let Some(condition) = self.spec.condition {
            if !condition(entity) {
                return false;
            }
        }
        self.groups
            .iter()
            .any(|terms| terms.iter().all(|t| t.eval(self.spec, entity)))
    }
}

fn parse_term<T>(spec: &'static FieldSpec<T>, src: &str) -> Result<Term<T>> {
    let (negated, body) = match src.strip_prefix('~') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, src),
    };
    if body.is_empty() {
        return Err(YugidbError::InvalidFilter(format!(
            "empty term in filter for '{}'",
            spec.key
        )));
    }

    // Special tokens bypass the generic comparator entirely.
    if let Some(&(_, pred)) = spec
        .special
        .iter()
        .find(|(token, _)| token.eq_ignore_ascii_case(body))
    {
        return Ok(Term {
            negated,
            kind: TermKind::Special(pred),
        });
    }

    let kind = match &spec.kind {
        FieldKind::Text => TermKind::TextEq(body.to_lowercase()),
        FieldKind::Substring => TermKind::Contains(body.to_lowercase()),
        FieldKind::Int => {
            let (op, rest) = split_cmp(body);
            let value: i64 = rest.trim().parse().map_err(|_| {
                YugidbError::InvalidFilter(format!(
                    "'{}' is not an integer (field '{}')",
                    rest, spec.key
                ))
            })?;
            TermKind::Cmp(op, value)
        }
        FieldKind::Flags(lookup) => {
            let bits = lookup(body).ok_or_else(|| {
                YugidbError::InvalidFilter(format!(
                    "unknown {} member '{}'",
                    spec.key, body
                ))
            })?;
            TermKind::BitTest(bits)
        }
    };

    Ok(Term { negated, kind })
}

/// Strip an optional comparison prefix. Two-character operators first.
fn split_cmp(src: &str) -> (CmpOp, &str) {
    for (prefix, op) in [
        (">=", CmpOp::Ge),
        ("<=", CmpOp::Le),
        ("!=", CmpOp::Ne),
        (">", CmpOp::Gt),
        ("<", CmpOp::Lt),
    ] {
        if let Some(rest) = src.strip_prefix(prefix) {
            return (op, rest);
        }
    }
    (CmpOp::Eq, src)
}

// ---------------------------------------------------------------------------
// Query compilation
// ---------------------------------------------------------------------------

/// Compile a multi-field query against a descriptor table.
///
/// Unrecognized keys and empty value strings contribute nothing. The
/// returned filters are AND-combined by [`matches_all`]; an empty vector
/// means no recognized constraints, which callers treat as "match nothing".
pub fn compile_query<T>(
    table: &'static [FieldSpec<T>],
    params: &HashMap<String, String>,
) -> Result<Vec<CompiledFilter<T>>> {
    let mut filters = Vec::new();
    for spec in table {
        match params.get(spec.key) {
            Some(raw) if !raw.trim().is_empty() => {
                filters.push(CompiledFilter::compile(spec, raw)?);
            }
            _ => {}
        }
    }
    Ok(filters)
}

/// AND across all compiled per-field filters.
pub fn matches_all<T>(filters: &[CompiledFilter<T>], entity: &T) -> bool {
    filters.iter().all(|f| f.matches(entity))
}

// ---------------------------------------------------------------------------
// Card descriptor table
// ---------------------------------------------------------------------------

fn card_name(c: &Card) -> FieldValue<'_> {
    FieldValue::Text(&c.name)
}

fn card_id(c: &Card) -> FieldValue<'_> {
    FieldValue::Int(i64::from(c.id))
}

fn card_race(c: &Card) -> FieldValue<'_> {
    FieldValue::Bits(c.race().bits())
}

fn card_attribute(c: &Card) -> FieldValue<'_> {
    FieldValue::Bits(u64::from(c.attribute().bits()))
}

fn card_atk(c: &Card) -> FieldValue<'_> {
    FieldValue::Int(i64::from(c.atk))
}

fn card_def(c: &Card) -> FieldValue<'_> {
    FieldValue::Int(i64::from(c.def_()))
}

fn card_level(c: &Card) -> FieldValue<'_> {
    // Mask off the scale bytes, but let the -2 "?" sentinel through.
    let raw = c.raw_level();
    FieldValue::Int(if raw < 0 { raw } else { raw & 0xFFFF })
}

fn card_scale(c: &Card) -> FieldValue<'_> {
    FieldValue::Int(i64::from(c.scale()))
}

fn card_koid(c: &Card) -> FieldValue<'_> {
    FieldValue::Int(c.koid.map(i64::from).unwrap_or_default())
}

fn has_koid(c: &Card) -> bool {
    c.koid.is_some()
}

fn card_type(c: &Card) -> FieldValue<'_> {
    FieldValue::Bits(u64::from(c.card_type().bits()))
}

fn card_category(c: &Card) -> FieldValue<'_> {
    FieldValue::Bits(u64::from(c.category().bits()))
}

fn card_genre(c: &Card) -> FieldValue<'_> {
    FieldValue::Bits(c.genre().bits())
}

fn card_linkmarker(c: &Card) -> FieldValue<'_> {
    FieldValue::Bits(u64::from(c.linkmarkers().bits()))
}

fn card_status(c: &Card) -> FieldValue<'_> {
    FieldValue::Int(i64::from(c.status))
}

fn card_text(c: &Card) -> FieldValue<'_> {
    FieldValue::Text(c.text())
}

fn is_pendulum(c: &Card) -> bool {
    c.has_type(CardType::Pendulum)
}

fn is_link(c: &Card) -> bool {
    c.has_type(CardType::Link)
}

fn race_unknown(c: &Card) -> bool {
    c.race().is_empty() && c.has_type(CardType::Monster)
}

fn attribute_unknown(c: &Card) -> bool {
    c.attribute().is_empty() && c.has_type(CardType::Monster)
}

fn atk_unknown(c: &Card) -> bool {
    c.atk == -2
}

fn def_unknown(c: &Card) -> bool {
    c.raw_def() == -2
}

fn level_unknown(c: &Card) -> bool {
    c.raw_level() == -2
}

fn atk_equals_def(c: &Card) -> bool {
    c.has_atk_equ_def()
}

fn parse_type_token(t: &str) -> Option<u64> {
    CardType::from_token(t).map(|f| u64::from(f.bits()))
}

fn parse_race_token(t: &str) -> Option<u64> {
    Race::from_token(t).map(|f| f.bits())
}

fn parse_attribute_token(t: &str) -> Option<u64> {
    Attribute::from_token(t).map(|f| u64::from(f.bits()))
}

fn parse_category_token(t: &str) -> Option<u64> {
    Category::from_token(t).map(|f| u64::from(f.bits()))
}

fn parse_genre_token(t: &str) -> Option<u64> {
    Genre::from_token(t).map(|f| f.bits())
}

fn parse_linkmarker_token(t: &str) -> Option<u64> {
    LinkMarker::from_token(t).map(|f| u64::from(f.bits()))
}

pub static CARD_FIELDS: &[FieldSpec<Card>] = &[
    FieldSpec {
        key: "name",
        kind: FieldKind::Text,
        accessor: card_name,
        condition: None,
        special: &[],
    },
    FieldSpec {
        key: "id",
        kind: FieldKind::Int,
        accessor: card_id,
        condition: None,
        special: &[],
    },
    FieldSpec {
        key: "race",
        kind: FieldKind::Flags(parse_race_token),
        accessor: card_race,
        condition: None,
        special: &[("?", race_unknown)],
    },
    FieldSpec {
        key: "attribute",
        kind: FieldKind::Flags(parse_attribute_token),
        accessor: card_attribute,
        condition: None,
        special: &[("?", attribute_unknown)],
    },
    FieldSpec {
        key: "atk",
        kind: FieldKind::Int,
        accessor: card_atk,
        condition: None,
        special: &[("?", atk_unknown), ("def", atk_equals_def)],
    },
    FieldSpec {
        key: "def",
        kind: FieldKind::Int,
        accessor: card_def,
        condition: None,
        special: &[("?", def_unknown), ("atk", atk_equals_def)],
    },
    FieldSpec {
        key: "level",
        kind: FieldKind::Int,
        accessor: card_level,
        condition: None,
        special: &[("?", level_unknown)],
    },
    FieldSpec {
        key: "scale",
        kind: FieldKind::Int,
        accessor: card_scale,
        condition: Some(is_pendulum),
        special: &[],
    },
    FieldSpec {
        key: "koid",
        kind: FieldKind::Int,
        accessor: card_koid,
        condition: Some(has_koid),
        special: &[],
    },
    FieldSpec {
        key: "type",
        kind: FieldKind::Flags(parse_type_token),
        accessor: card_type,
        condition: None,
        special: &[],
    },
    FieldSpec {
        key: "category",
        kind: FieldKind::Flags(parse_category_token),
        accessor: card_category,
        condition: None,
        special: &[],
    },
    FieldSpec {
        key: "genre",
        kind: FieldKind::Flags(parse_genre_token),
        accessor: card_genre,
        condition: None,
        special: &[],
    },
    FieldSpec {
        key: "linkmarker",
        kind: FieldKind::Flags(parse_linkmarker_token),
        accessor: card_linkmarker,
        condition: Some(is_link),
        special: &[],
    },
    FieldSpec {
        key: "status",
        kind: FieldKind::Int,
        accessor: card_status,
        condition: None,
        special: &[],
    },
    FieldSpec {
        key: "in_name",
        kind: FieldKind::Substring,
        accessor: card_name,
        condition: None,
        special: &[],
    },
    FieldSpec {
        key: "mentions",
        kind: FieldKind::Substring,
        accessor: card_text,
        condition: None,
        special: &[],
    },
];

// ---------------------------------------------------------------------------
// Archetype / set descriptor tables
// ---------------------------------------------------------------------------

fn arch_name(a: &Archetype) -> FieldValue<'_> {
    FieldValue::Text(&a.name)
}

fn arch_id(a: &Archetype) -> FieldValue<'_> {
    FieldValue::Int(i64::from(a.id))
}

pub static ARCHETYPE_FIELDS: &[FieldSpec<Archetype>] = &[
    FieldSpec {
        key: "name",
        kind: FieldKind::Text,
        accessor: arch_name,
        condition: None,
        special: &[],
    },
    FieldSpec {
        key: "id",
        kind: FieldKind::Int,
        accessor: arch_id,
        condition: None,
        special: &[],
    },
    FieldSpec {
        key: "in_name",
        kind: FieldKind::Substring,
        accessor: arch_name,
        condition: None,
        special: &[],
    },
];

fn set_name(s: &CardSet) -> FieldValue<'_> {
    FieldValue::Text(&s.name)
}

fn set_abbr(s: &CardSet) -> FieldValue<'_> {
    FieldValue::Text(&s.abbr)
}

fn set_id(s: &CardSet) -> FieldValue<'_> {
    FieldValue::Int(i64::from(s.id))
}

pub static SET_FIELDS: &[FieldSpec<CardSet>] = &[
    FieldSpec {
        key: "name",
        kind: FieldKind::Text,
        accessor: set_name,
        condition: None,
        special: &[],
    },
    FieldSpec {
        key: "abbr",
        kind: FieldKind::Text,
        accessor: set_abbr,
        condition: None,
        special: &[],
    },
    FieldSpec {
        key: "id",
        kind: FieldKind::Int,
        accessor: set_id,
        condition: None,
        special: &[],
    },
    FieldSpec {
        key: "in_name",
        kind: FieldKind::Substring,
        accessor: set_name,
        condition: None,
        special: &[],
    },
];
