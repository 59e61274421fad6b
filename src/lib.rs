//! Yu-Gi-Oh! card database SDK.
//!
//! Provides a high-level client over the Omega card database. The `.cdb`
//! SQLite snapshot is downloaded from the Omega server, cached locally, and
//! loaded into memory; all queries after that are in-process. Packed bit
//! fields (type, race, attribute, archetype codes, the overloaded level and
//! def columns) are decoded behind typed accessors, and every searchable
//! field takes a small filter expression language with AND/OR/negation and
//! comparators.
//!
//! # Quick start
//!
//! ```no_run
//! use yugidb_sdk::YugidbSdk;
//!
//! let sdk = YugidbSdk::builder().build().unwrap();
//!
//! // Look up cards
//! let card = sdk.cards().get_by_name("War Rock Meteoragon").unwrap();
//! println!("{}: ATK {}", card.name, card.atk);
//!
//! // Search with filter expressions
//! let low_levels = sdk.cards().search_by("level", "<=3").unwrap();
//!
//! // Parse a deck code
//! let deck = sdk.decks().from_ydke("ydke://...!!!", "my deck").unwrap();
//! assert!(deck.is_valid());
//! # let _ = (low_levels, deck);
//! ```

pub mod cache;
pub mod codec;
pub mod config;
pub mod db;
pub mod enums;
pub mod error;
pub mod filter;
pub mod models;
pub mod queries;
pub mod storage;

pub use cache::CacheManager;
pub use db::YugiDb;
pub use error::{Result, YugidbError};
pub use models::{Archetype, Card, CardExport, CardSet, Deck, DefField};
pub use storage::{RowSource, SqliteStorage};

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// YugidbSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`YugidbSdk`] instance.
///
/// Use [`YugidbSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](YugidbSdkBuilder::build).
pub struct YugidbSdkBuilder {
    cache_dir: Option<PathBuf>,
    db_file: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
}

impl Default for YugidbSdkBuilder {
    fn default() -> Self {
        Self {
            cache_dir: None,
            db_file: None,
            offline: false,
            timeout: Duration::from_secs(120),
        }
    }
}

impl YugidbSdkBuilder {
    /// Set a custom cache directory.
    ///
    /// If not set, the platform-appropriate default cache directory is used
    /// (e.g. `~/.cache/yugidb-sdk` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load from a local `.cdb` file instead of the Omega server. No
    /// download or staleness check happens when this is set.
    pub fn db_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.db_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, the SDK never downloads and only uses a previously
    /// cached snapshot. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout for downloads. Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the SDK: ensure the snapshot is available (downloading if
    /// missing or stale), open it, and load the entity tables into memory.
    pub fn build(self) -> Result<YugidbSdk> {
        let mut cache = CacheManager::new(self.cache_dir, self.offline, self.timeout)?;
        let db_path = match &self.db_file {
            Some(path) => path.clone(),
            None => cache.ensure_database()?,
        };
        let storage = SqliteStorage::open(&db_path)?;
        let db = YugiDb::load(&storage)?;
        Ok(YugidbSdk { cache, db })
    }
}

// ---------------------------------------------------------------------------
// YugidbSdk
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns the [`CacheManager`] and the loaded [`YugiDb`], and exposes the
/// entity query interfaces as lightweight borrowing wrappers. Created via
/// [`YugidbSdk::builder()`]; multiple instances can coexist.
pub struct YugidbSdk {
    cache: CacheManager,
    db: YugiDb,
}

impl YugidbSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> YugidbSdkBuilder {
        YugidbSdkBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the card query interface.
    pub fn cards(&self) -> queries::CardQuery<'_> {
        queries::CardQuery::new(&self.db)
    }

    /// Access the archetype query interface.
    pub fn archetypes(&self) -> queries::ArchetypeQuery<'_> {
        queries::ArchetypeQuery::new(&self.db)
    }

    /// Access the set query interface.
    pub fn sets(&self) -> queries::SetQuery<'_> {
        queries::SetQuery::new(&self.db)
    }

    /// Access the deck construction and deck-code interface.
    pub fn decks(&self) -> queries::DeckQuery<'_> {
        queries::DeckQuery::new(&self.db)
    }

    /// The underlying database, for direct access.
    pub fn db(&self) -> &YugiDb {
        &self.db
    }

    // -- Maintenance -------------------------------------------------------

    /// Check for a newer snapshot and reload if stale.
    ///
    /// Returns `true` if new data was downloaded and the in-memory tables
    /// were rebuilt, `false` if already up to date.
    pub fn refresh(&mut self) -> Result<bool> {
        if !self.cache.is_stale()? {
            return Ok(false);
        }
        let db_path = self.cache.ensure_database()?;
        let storage = SqliteStorage::open(&db_path)?;
        self.db = YugiDb::load(&storage)?;
        eprintln!("Database snapshot was stale; reloaded");
        Ok(true)
    }
}

impl fmt::Display for YugidbSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "YugidbSdk(cache_dir={}, cards={}, offline={})",
            self.cache.cache_dir.display(),
            self.db.card_count(),
            self.cache.offline
        )
    }
}
