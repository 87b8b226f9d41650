//! Cache storage module
//!
//! This module provides persistent caching functionality using the system's
//! standard cache directory. Data is serialized to JSON format for storage,
//! wrapped in an envelope carrying the storage timestamp so entries can
//! expire after a configurable time to live.

use serde::{Deserialize, Serialize};
use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to determine cache directory location
    #[error("Failed to determine cache directory location")]
    CacheDirectoryNotFound,

    /// Failed to create or access cache directory
    #[error("Failed to create cache directory at {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read cached data
    #[error("Failed to read cache file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write cached data
    #[error("Failed to write cache file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to deserialize cached data
    #[error("Failed to deserialize cache file {path}: {source}")]
    DeserializationFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to serialize data for caching
    #[error("Failed to serialize data: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Envelope stored on disk around each cached value
#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope<T> {
    /// Seconds since the UNIX epoch at which the value was stored
    stored_at: u64,
    /// The cached value itself
    data: T,
}

/// A generic cache storage for serializable data
///
/// This structure provides persistent caching of data that implements
/// `Serialize` and `Deserialize`. Data is stored as JSON files in the
/// system's standard cache directory. An optional time to live turns stale
/// entries into cache misses on load.
pub struct CacheStorage<T> {
    /// The directory where cached data is stored
    cache_dir: PathBuf,
    /// How long entries stay valid; None means forever
    ttl: Option<Duration>,
    /// Phantom data for the generic type
    _phantom: PhantomData<T>,
}

impl<T> CacheStorage<T>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    /// Opens or creates a cache storage with the given name
    ///
    /// The cache will be stored in the system's standard cache directory
    /// under a subdirectory named after the application and the provided name.
    /// The name will be sanitized (lowercased, non-alphanumeric characters
    /// replaced with underscores).
    ///
    /// # Arguments
    ///
    /// * `name` - The name for this cache storage
    /// * `ttl` - How long entries stay valid, or None to keep them forever
    ///
    /// # Returns
    ///
    /// A Result containing the CacheStorage or a CacheError
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let cache: CacheStorage<SeriesRecord> =
    ///     CacheStorage::open("series", Some(Duration::from_secs(24 * 60 * 60)))?;
    /// ```
    pub fn open(name: &str, ttl: Option<Duration>) -> Result<Self, CacheError> {
        // Get the cache directory for this application
        let proj_dirs = directories::ProjectDirs::from("de", "westhoffswelt", "seasonsleuth")
            .ok_or(CacheError::CacheDirectoryNotFound)?;

        // Sanitize the cache name
        let sanitized_name = sanitize_name(name);

        // Build the full cache directory path
        let cache_dir = proj_dirs.cache_dir().join(&sanitized_name);

        // Create the directory if it doesn't exist
        fs::create_dir_all(&cache_dir).map_err(|e| CacheError::DirectoryCreationFailed {
            path: cache_dir.clone(),
            source: e,
        })?;

        Ok(Self {
            cache_dir,
            ttl,
            _phantom: PhantomData,
        })
    }

    /// Opens a cache storage rooted at an explicit directory, bypassing the
    /// platform directory lookup. Lets tests of cache consumers point a
    /// storage at a temporary location.
    #[cfg(test)]
    pub(crate) fn open_in(cache_dir: PathBuf, ttl: Option<Duration>) -> Self {
        Self {
            cache_dir,
            ttl,
            _phantom: PhantomData,
        }
    }

    /// Loads cached data for the given identifier
    ///
    /// # Arguments
    ///
    /// * `identifier` - A unique identifier for the cached data
    ///
    /// # Returns
    ///
    /// An Option containing the cached data if it exists and is still
    /// within its time to live, or None if the data doesn't exist or has
    /// expired. Returns an error if the data exists but cannot be read or
    /// deserialized.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// if let Some(record) = cache.load("Breaking Bad")? {
    ///     println!("Found cached record: {}", record.title);
    /// }
    /// ```
    pub fn load(&self, identifier: &str) -> Result<Option<T>, CacheError> {
        let sanitized_id = sanitize_name(identifier);
        let file_path = self.cache_dir.join(format!("{}.json", sanitized_id));

        // If file doesn't exist, return None
        if !file_path.exists() {
            return Ok(None);
        }

        // Read the file
        let content = fs::read_to_string(&file_path).map_err(|e| CacheError::ReadFailed {
            path: file_path.clone(),
            source: e,
        })?;

        // Deserialize the JSON
        let envelope: CacheEnvelope<T> =
            serde_json::from_str(&content).map_err(|e| CacheError::DeserializationFailed {
                path: file_path.clone(),
                source: e,
            })?;

        // An expired entry counts as a miss and is cleaned up on the way
        if self.is_expired(envelope.stored_at) {
            let _ = fs::remove_file(&file_path);
            return Ok(None);
        }

        Ok(Some(envelope.data))
    }

    /// Stores data in the cache with the given identifier
    ///
    /// # Arguments
    ///
    /// * `identifier` - A unique identifier for the cached data
    /// * `data` - The data to cache
    ///
    /// # Returns
    ///
    /// A Result indicating success or failure
    ///
    /// # Examples
    ///
    /// ```ignore
    /// cache.store("Breaking Bad", &record)?;
    /// ```
    pub fn store(&self, identifier: &str, data: &T) -> Result<(), CacheError> {
        let sanitized_id = sanitize_name(identifier);
        let file_path = self.cache_dir.join(format!("{}.json", sanitized_id));

        let envelope = CacheEnvelope {
            stored_at: now_unix(),
            data,
        };

        // Serialize to JSON
        let content = serde_json::to_string_pretty(&envelope)?;

        // Write to file
        fs::write(&file_path, content).map_err(|e| CacheError::WriteFailed {
            path: file_path,
            source: e,
        })?;

        Ok(())
    }

    /// Returns the path to the cache directory
    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    fn is_expired(&self, stored_at: u64) -> bool {
        match self.ttl {
            Some(ttl) => now_unix().saturating_sub(stored_at) > ttl.as_secs(),
            None => false,
        }
    }
}

/// Current time as seconds since the UNIX epoch
fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Sanitizes a name for use in file paths
///
/// Converts to lowercase and replaces all characters that are not
/// a-z, 0-9, or hyphen with underscores.
fn sanitize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_in(dir: &std::path::Path, ttl: Option<Duration>) -> CacheStorage<String> {
        CacheStorage::open_in(dir.to_path_buf(), ttl)
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Simple"), "simple");
        assert_eq!(sanitize_name("With Spaces"), "with_spaces");
        assert_eq!(sanitize_name("With-Hyphens"), "with-hyphens");
        assert_eq!(sanitize_name("Special!@#$%"), "special_____");
        assert_eq!(sanitize_name("Mixed123ABC"), "mixed123abc");
    }

    #[test]
    fn test_store_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = storage_in(dir.path(), None);

        cache.store("Breaking Bad", &"value".to_string()).unwrap();
        let loaded = cache.load("Breaking Bad").unwrap();

        assert_eq!(loaded, Some("value".to_string()));
    }

    #[test]
    fn test_load_missing_entry_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = storage_in(dir.path(), None);

        assert_eq!(cache.load("nothing here").unwrap(), None);
    }

    #[test]
    fn test_fresh_entry_survives_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let cache = storage_in(dir.path(), Some(Duration::from_secs(3600)));

        cache.store("entry", &"fresh".to_string()).unwrap();

        assert_eq!(cache.load("entry").unwrap(), Some("fresh".to_string()));
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = storage_in(dir.path(), Some(Duration::from_secs(60)));

        // Write an envelope stamped at the epoch, long past any TTL.
        let stale = serde_json::json!({ "stored_at": 0, "data": "stale" });
        fs::write(dir.path().join("entry.json"), stale.to_string()).unwrap();

        assert_eq!(cache.load("entry").unwrap(), None);
    }

    #[test]
    fn test_entry_without_ttl_never_expires() {
        let dir = tempfile::tempdir().unwrap();
        let cache = storage_in(dir.path(), None);

        let old = serde_json::json!({ "stored_at": 0, "data": "old" });
        fs::write(dir.path().join("entry.json"), old.to_string()).unwrap();

        assert_eq!(cache.load("entry").unwrap(), Some("old".to_string()));
    }
}
