//! Row sources: the storage collaborator contract.
//!
//! The entity loader does not care where rows come from -- a read-only
//! SQLite `.cdb` snapshot, or in-memory fixtures in tests. Anything that
//! implements [`RowSource`] can feed [`crate::db::YugiDb::load`].

use std::path::Path;

use rusqlite::{Connection as SqliteConnection, OpenFlags, OptionalExtension};

use crate::error::Result;

// ---------------------------------------------------------------------------
// Raw row shapes
// ---------------------------------------------------------------------------

/// One row of `datas INNER JOIN texts LEFT JOIN koids`.
///
/// Packed integer columns are carried verbatim; decoding happens in
/// [`crate::models::Card`].
#[derive(Debug, Clone, Default)]
pub struct CardRow {
    pub id: u32,
    pub name: String,
    pub text: String,
    pub type_data: u32,
    pub race_data: u64,
    pub attribute_data: u32,
    pub category_data: u32,
    pub genre_data: u64,
    /// Raw level field: plain level, or pendulum-packed, or link rating.
    /// `-2` means "?". Signed on purpose.
    pub level_data: i64,
    pub atk: i32,
    /// Raw def field: defense value, or linkmarker bits for Link cards.
    pub def_data: i32,
    pub status: u8,
    pub arch_code: u64,
    pub support_code: u64,
    pub alias: u32,
    pub scripted: bool,
    pub tcg_date: i64,
    pub ocg_date: i64,
    pub koid: Option<u32>,
}

/// One row of the `setcodes` relation, pre-canonicalization.
#[derive(Debug, Clone)]
pub struct ArchetypeRow {
    pub name: String,
    pub official_code: u16,
    pub beta_code: u16,
}

/// One row of the `packs` relation.
#[derive(Debug, Clone)]
pub struct PackRow {
    pub id: u32,
    pub abbr: String,
    pub name: String,
    pub tcg_date: i64,
    pub ocg_date: i64,
}

/// One card-to-pack membership row.
#[derive(Debug, Clone, Copy)]
pub struct RelationRow {
    pub card_id: u32,
    pub pack_id: u32,
}

// ---------------------------------------------------------------------------
// RowSource
// ---------------------------------------------------------------------------

/// Supplies raw rows for the three logical relations the loader consumes.
///
/// An empty source is a valid degenerate state; the loader builds empty
/// tables from it without complaint.
pub trait RowSource {
    fn card_rows(&self) -> Result<Vec<CardRow>>;
    fn archetype_rows(&self) -> Result<Vec<ArchetypeRow>>;
    fn pack_rows(&self) -> Result<Vec<PackRow>>;
    fn relation_rows(&self) -> Result<Vec<RelationRow>>;
}

// ---------------------------------------------------------------------------
// SqliteStorage
// ---------------------------------------------------------------------------

/// Read-only row source over an Omega-format SQLite snapshot.
///
/// Optional tables (`koids`, `packs`/`relations`) are probed once at open;
/// queries adapt so older snapshots without them still load.
pub struct SqliteStorage {
    conn: SqliteConnection,
    has_koids: bool,
    has_packs: bool,
}

impl SqliteStorage {
    /// Open a `.cdb` file read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = SqliteConnection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let has_koids = Self::table_exists(&conn, "koids")?;
        let has_packs = Self::table_exists(&conn, "packs")?
            && Self::table_exists(&conn, "relations")?;
        Ok(Self {
            conn,
            has_koids,
            has_packs,
        })
    }

    fn table_exists(conn: &SqliteConnection, name: &str) -> Result<bool> {
        let found: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

impl RowSource for SqliteStorage {
    fn card_rows(&self) -> Result<Vec<CardRow>> {
        let koid_col = if self.has_koids { "koids.koid" } else { "NULL" };
        let sql = format!(
            "SELECT datas.id, texts.name, texts.desc, \
                    datas.type, datas.race, datas.attribute, datas.category, \
                    datas.genre, datas.level, datas.atk, datas.def, datas.ot, \
                    datas.setcode, datas.support, datas.alias, datas.script, \
                    datas.tcgdate, datas.ocgdate, {} \
             FROM datas \
             INNER JOIN texts USING(id) \
             {}",
            koid_col,
            if self.has_koids {
                "LEFT JOIN koids USING(id)"
            } else {
                ""
            }
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(CardRow {
                id: row.get::<_, i64>(0)? as u32,
                name: row.get(1)?,
                text: row.get(2)?,
                type_data: row.get::<_, i64>(3)? as u32,
                race_data: row.get::<_, i64>(4)? as u64,
                attribute_data: row.get::<_, i64>(5)? as u32,
                category_data: row.get::<_, i64>(6)? as u32,
                genre_data: row.get::<_, i64>(7)? as u64,
                level_data: row.get(8)?,
                atk: row.get::<_, i64>(9)? as i32,
                def_data: row.get::<_, i64>(10)? as i32,
                status: row.get::<_, i64>(11)? as u8,
                arch_code: row.get::<_, i64>(12)? as u64,
                support_code: row.get::<_, i64>(13)? as u64,
                alias: row.get::<_, i64>(14)? as u32,
                // `script` is a BLOB that sometimes holds a bare integer;
                // only null-ness matters here.
                scripted: !matches!(
                    row.get::<_, rusqlite::types::Value>(15)?,
                    rusqlite::types::Value::Null
                ),
                tcg_date: row.get::<_, Option<i64>>(16)?.unwrap_or(0),
                ocg_date: row.get::<_, Option<i64>>(17)?.unwrap_or(0),
                koid: row.get::<_, Option<i64>>(18)?.map(|k| k as u32),
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    fn archetype_rows(&self) -> Result<Vec<ArchetypeRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, officialcode, betacode FROM setcodes")?;
        let rows = stmt.query_map([], |row| {
            Ok(ArchetypeRow {
                name: row.get(0)?,
                official_code: row.get::<_, i64>(1)? as u16,
                beta_code: row.get::<_, i64>(2)? as u16,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    fn pack_rows(&self) -> Result<Vec<PackRow>> {
        if !self.has_packs {
            return Ok(Vec::new());
        }
        let mut stmt = self
            .conn
            .prepare("SELECT id, abbr, name, tcgdate, ocgdate FROM packs")?;
        let rows = stmt.query_map([], |row| {
            Ok(PackRow {
                id: row.get::<_, i64>(0)? as u32,
                abbr: row.get(1)?,
                name: row.get(2)?,
                tcg_date: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
                ocg_date: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    fn relation_rows(&self) -> Result<Vec<RelationRow>> {
        if !self.has_packs {
            return Ok(Vec::new());
        }
        let mut stmt = self
            .conn
            .prepare("SELECT cardid, packid FROM relations")?;
        let rows = stmt.query_map([], |row| {
            Ok(RelationRow {
                card_id: row.get::<_, i64>(0)? as u32,
                pack_id: row.get::<_, i64>(1)? as u32,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }
}
