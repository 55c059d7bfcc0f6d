//! File-backed Response Cache
//!
//! Stores JSON values on disk, one file per key, with a time-to-live checked
//! on read. The cache is strictly best effort: any I/O problem is logged and
//! treated as a miss, so callers always get a value.
//!
//! Storage location (default):
//! - ~/.cache/movie-intent/<sha256(key)>.json

use anyhow::{Context, Result};
use chrono::Utc;
use fd_lock::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::CacheSettings;

/// Directory name within the platform cache dir
const CACHE_SUBDIR: &str = "movie-intent";

/// One persisted cache entry
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    key: String,
    /// Unix timestamp (seconds) of the write
    stored_at: i64,
    value: Value,
}

/// Default cache directory
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CACHE_SUBDIR)
}

pub struct FileCache {
    dir: PathBuf,
    enabled: bool,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            enabled: true,
        }
    }

    /// A cache that never stores anything; `remember` always computes
    pub fn disabled() -> Self {
        Self {
            dir: PathBuf::new(),
            enabled: false,
        }
    }

    pub fn from_config(settings: &CacheSettings) -> Self {
        if !settings.enabled {
            return Self::disabled();
        }
        Self::new(settings.dir.clone().unwrap_or_else(default_cache_dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{:x}.json", digest))
    }

    /// Return the stored value for `key` if it is younger than `ttl_secs`,
    /// otherwise compute it, store it (best effort) and return it.
    pub fn remember<F>(&self, key: &str, ttl_secs: u64, compute: F) -> Value
    where
        F: FnOnce() -> Value,
    {
        if let Some(value) = self.lookup(key, ttl_secs) {
            return value;
        }

        let value = compute();
        self.store_quietly(key, &value);
        value
    }

    /// Like [`FileCache::remember`], but `compute` may fail. Errors are
    /// returned to the caller and never cached.
    pub fn try_remember<F>(&self, key: &str, ttl_secs: u64, compute: F) -> Result<Value>
    where
        F: FnOnce() -> Result<Value>,
    {
        if let Some(value) = self.lookup(key, ttl_secs) {
            return Ok(value);
        }

        let value = compute()?;
        self.store_quietly(key, &value);
        Ok(value)
    }

    /// Remove a single entry
    pub fn forget(&self, key: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let path = self.entry_path(key);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove cache entry {}", path.display()))?;
        }
        Ok(())
    }

    /// Remove every entry in the cache directory
    pub fn clear(&self) -> Result<usize> {
        if !self.enabled || !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read cache directory {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn lookup(&self, key: &str, ttl_secs: u64) -> Option<Value> {
        if !self.enabled {
            return None;
        }

        match self.read_entry(key) {
            Ok(Some(entry)) => {
                let age = Utc::now().timestamp().saturating_sub(entry.stored_at);
                // An entry from the future (clock skew) counts as fresh.
                if age < 0 || (age as u64) < ttl_secs {
                    debug!(key, age, "cache hit");
                    Some(entry.value)
                } else {
                    debug!(key, age, ttl_secs, "cache entry expired");
                    None
                }
            }
            Ok(None) => {
                debug!(key, "cache miss");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "cache read failed, computing fresh value");
                None
            }
        }
    }

    fn read_entry(&self, key: &str) -> Result<Option<CacheEntry>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let entry: CacheEntry = serde_json::from_str(&content)
            .with_context(|| format!("Corrupt cache entry {}", path.display()))?;

        // Digest collision or a foreign file under our name
        if entry.key != key {
            return Ok(None);
        }
        Ok(Some(entry))
    }

    fn store_quietly(&self, key: &str, value: &Value) {
        if !self.enabled {
            return;
        }
        if let Err(e) = self.write_entry(key, value) {
            warn!(key, error = %e, "cache write failed");
        }
    }

    fn write_entry(&self, key: &str, value: &Value) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create cache directory {}", self.dir.display()))?;

        let entry = CacheEntry {
            key: key.to_string(),
            stored_at: Utc::now().timestamp(),
            value: value.clone(),
        };
        let bytes = serde_json::to_vec(&entry)?;

        let path = self.entry_path(key);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        // Truncate under the exclusive lock, never before it
        let mut lock = RwLock::new(file);
        let mut guard = lock.write().context("Failed to lock cache entry")?;
        guard.set_len(0)?;
        guard.write_all(&bytes)?;
        guard.flush()?;
        Ok(())
    }
}
