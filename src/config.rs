use std::path::PathBuf;

pub const OMEGA_BASE_URL: &str = "https://duelistsunite.org/omega";
pub const DB_FILE: &str = "OmegaDB.cdb";
pub const HASH_FILE: &str = "Database.hash";

/// Sentinel timestamp the database stores for "release date unavailable".
pub const DATE_UNAVAILABLE: i64 = 253402214400;

pub fn db_url() -> String {
    format!("{}/{}", OMEGA_BASE_URL, DB_FILE)
}

pub fn hash_url() -> String {
    format!("{}/{}", OMEGA_BASE_URL, HASH_FILE)
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("yugidb-sdk")
    } else {
        PathBuf::from(".yugidb-sdk-cache")
    }
}
