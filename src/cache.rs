//! Download and local cache manager for the Omega database snapshot.
//!
//! Downloads `OmegaDB.cdb` from the Omega server and caches it locally.
//! Staleness is decided by comparing the server's published `Database.hash`
//! against the hash recorded at last download; the snapshot is only
//! re-fetched when the hashes differ.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;

use crate::config;
use crate::error::{Result, YugidbError};

/// Downloads and caches the Omega `.cdb` snapshot.
pub struct CacheManager {
    /// Directory where cached files are stored.
    pub cache_dir: PathBuf,
    /// If true, never download (use the cached snapshot only).
    pub offline: bool,
    timeout: Duration,
    client: Option<Client>,
    remote_hash: Option<String>,
}

impl CacheManager {
    /// Create a new cache manager.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache
    /// directory. Creates the cache directory if it does not exist.
    pub fn new(cache_dir: Option<PathBuf>, offline: bool, timeout: Duration) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            offline,
            timeout,
            client: None,
            remote_hash: None,
        })
    }

    /// Lazy HTTP client, created on first use.
    fn client(&mut self) -> Result<&Client> {
        if self.client.is_none() {
            self.client = Some(
                Client::builder()
                    .timeout(self.timeout)
                    .redirect(reqwest::redirect::Policy::limited(10))
                    .build()?,
            );
        }
        Ok(self.client.as_ref().unwrap())
    }

    /// The locally recorded hash of the cached snapshot, if any.
    fn local_hash(&self) -> Option<String> {
        fs::read_to_string(self.cache_dir.join(config::HASH_FILE))
            .ok()
            .map(|s| s.trim().to_string())
    }

    fn save_hash(&self, hash: &str) {
        let _ = fs::write(self.cache_dir.join(config::HASH_FILE), hash);
    }

    /// Fetch the server's current database hash.
    ///
    /// Returns `None` when offline or the server is unreachable. Caches the
    /// result for subsequent calls.
    pub fn remote_hash(&mut self) -> Result<Option<String>> {
        if self.remote_hash.is_some() {
            return Ok(self.remote_hash.clone());
        }
        if self.offline {
            return Ok(None);
        }
        let client = self.client()?.clone();
        match client.get(config::hash_url()).send() {
            Ok(resp) => {
                let hash = resp.error_for_status()?.text()?.trim().to_string();
                self.remote_hash = Some(hash.clone());
                Ok(Some(hash))
            }
            Err(e) => {
                eprintln!("Failed to fetch database hash: {}", e);
                Ok(None)
            }
        }
    }

    /// Check if the cached snapshot is out of date.
    ///
    /// Returns `true` if nothing is cached or the server publishes a
    /// different hash; `false` if up to date or the server is unreachable.
    pub fn is_stale(&mut self) -> Result<bool> {
        match self.local_hash() {
            None => Ok(true),
            Some(local) => match self.remote_hash()? {
                None => Ok(false), // Can't check, assume fresh
                Some(remote) => Ok(local != remote),
            },
        }
    }

    /// Download a file to a temp path first and rename on success, so an
    /// interrupted download never leaves a corrupt partial file behind.
    fn download_file(&mut self, url: &str, dest: &Path) -> Result<()> {
        eprintln!("Downloading {}", url);

        let tmp_dest = dest.with_extension(format!(
            "{}.tmp",
            dest.extension().and_then(|e| e.to_str()).unwrap_or("")
        ));

        let client = self.client()?.clone();
        let result = (|| -> Result<()> {
            let resp = client.get(url).send()?.error_for_status()?;
            let bytes = resp.bytes()?;
            fs::write(&tmp_dest, &bytes)?;
            fs::rename(&tmp_dest, dest)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp_dest);
        }

        result
    }

    /// Ensure the `.cdb` snapshot is cached locally, downloading if missing
    /// or stale. Returns the local path.
    pub fn ensure_database(&mut self) -> Result<PathBuf> {
        let local_path = self.cache_dir.join(config::DB_FILE);

        if !local_path.exists() || self.is_stale()? {
            if self.offline {
                if local_path.exists() {
                    return Ok(local_path);
                }
                return Err(YugidbError::NotFound(format!(
                    "{} not cached and offline mode is enabled",
                    config::DB_FILE
                )));
            }
            self.download_file(&config::db_url(), &local_path)?;
            if let Ok(Some(hash)) = self.remote_hash() {
                self.save_hash(&hash);
            }
        }

        Ok(local_path)
    }

    /// Remove all cached files and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}
