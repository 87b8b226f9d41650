//! Search history module
//!
//! Keeps the titles of previously investigated series as an ordered,
//! deduplicated list, most recent first, capped at a fixed number of
//! entries. The whole list lives in one JSON file in the system's standard
//! data directory and is rewritten on every mutation; a missing or corrupt
//! file simply reads as an empty history.

use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Maximum number of titles the history retains.
pub const HISTORY_CAPACITY: usize = 10;

/// Errors that can occur while accessing history storage
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Failed to determine data directory location
    #[error("Failed to determine data directory location")]
    DataDirectoryNotFound,

    /// Failed to create or access data directory
    #[error("Failed to create data directory at {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the history file
    #[error("Failed to write history file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to serialize the history for storage
    #[error("Failed to serialize history: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// The single named storage slot holding the history list.
///
/// One JSON file containing an ordered array of title strings. Reads are
/// forgiving and degrade absent or unparseable content to an empty list;
/// writes report their failure and leave the decision to the caller.
#[derive(Debug)]
pub struct HistoryStore {
    slot: PathBuf,
}

impl HistoryStore {
    /// Opens the default history slot in the system's data directory.
    pub fn open() -> Result<Self, HistoryError> {
        let proj_dirs = directories::ProjectDirs::from("de", "westhoffswelt", "seasonsleuth")
            .ok_or(HistoryError::DataDirectoryNotFound)?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        fs::create_dir_all(&data_dir).map_err(|e| HistoryError::DirectoryCreationFailed {
            path: data_dir.clone(),
            source: e,
        })?;

        Ok(Self {
            slot: data_dir.join("search_history.json"),
        })
    }

    /// Reads the stored list. Absent or corrupt content yields an empty
    /// list, never an error.
    fn read_slot(&self) -> Vec<String> {
        let Ok(content) = fs::read_to_string(&self.slot) else {
            return Vec::new();
        };

        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Replaces the slot content with the given list.
    fn write_slot(&self, entries: &[String]) -> Result<(), HistoryError> {
        let content = serde_json::to_string_pretty(entries)?;

        fs::write(&self.slot, content).map_err(|e| HistoryError::WriteFailed {
            path: self.slot.clone(),
            source: e,
        })
    }
}

/// Ordered, deduplicated list of previously investigated titles.
///
/// Titles are stored exactly as the user searched them, not as the
/// provider canonicalized them, so re-running an entry reproduces the
/// original search. Duplicate detection is case-sensitive for the same
/// reason.
#[derive(Debug)]
pub struct SearchHistory {
    entries: Vec<String>,
    store: Option<HistoryStore>,
}

impl SearchHistory {
    /// Loads the history from the default storage slot.
    ///
    /// When no storage location can be resolved the history still works,
    /// it just does not survive the session.
    pub fn open() -> Self {
        match HistoryStore::open() {
            Ok(store) => Self::with_store(store),
            Err(_) => Self::in_memory(),
        }
    }

    /// Loads the history from a specific storage slot.
    pub fn with_store(store: HistoryStore) -> Self {
        let entries = store.read_slot();
        Self {
            entries,
            store: Some(store),
        }
    }

    /// Creates an empty history without backing storage.
    pub fn in_memory() -> Self {
        Self {
            entries: Vec::new(),
            store: None,
        }
    }

    /// Records a successfully investigated title.
    ///
    /// An existing entry equal to `title` is removed first, then the title
    /// is prepended and the list truncated to [`HISTORY_CAPACITY`]. The
    /// updated list is persisted; write failures are swallowed and the
    /// in-memory list stays authoritative for the session.
    pub fn record(&mut self, title: &str) {
        self.entries.retain(|entry| entry != title);
        self.entries.insert(0, title.to_string());
        self.entries.truncate(HISTORY_CAPACITY);
        self.persist();
    }

    /// Empties the list, in memory and in the slot.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// The remembered titles, most recent first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Whether the history holds no titles.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            let _ = store.write_slot(&self.entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &std::path::Path) -> HistoryStore {
        HistoryStore {
            slot: dir.join("search_history.json"),
        }
    }

    #[test]
    fn test_record_prepends_most_recent() {
        let mut history = SearchHistory::in_memory();

        history.record("Breaking Bad");
        history.record("The Wire");

        assert_eq!(history.entries(), &["The Wire", "Breaking Bad"]);
    }

    #[test]
    fn test_record_moves_duplicate_to_front() {
        let mut history = SearchHistory::in_memory();

        history.record("A");
        history.record("B");
        history.record("C");
        history.record("A");

        assert_eq!(history.entries(), &["A", "C", "B"]);
    }

    #[test]
    fn test_duplicate_detection_is_case_sensitive() {
        let mut history = SearchHistory::in_memory();

        history.record("the wire");
        history.record("The Wire");

        assert_eq!(history.entries(), &["The Wire", "the wire"]);
    }

    #[test]
    fn test_capacity_drops_oldest_entry() {
        let mut history = SearchHistory::in_memory();

        for i in 1..=11 {
            history.record(&format!("Series {}", i));
        }

        assert_eq!(history.entries().len(), HISTORY_CAPACITY);
        assert_eq!(history.entries()[0], "Series 11");
        assert!(!history.entries().contains(&"Series 1".to_string()));
    }

    #[test]
    fn test_clear_empties_history() {
        let mut history = SearchHistory::in_memory();

        history.record("Breaking Bad");
        history.clear();

        assert!(history.is_empty());
    }

    #[test]
    fn test_history_survives_reload() {
        let dir = tempfile::tempdir().unwrap();

        let mut history = SearchHistory::with_store(store_in(dir.path()));
        history.record("Breaking Bad");
        history.record("The Wire");
        drop(history);

        let reloaded = SearchHistory::with_store(store_in(dir.path()));
        assert_eq!(reloaded.entries(), &["The Wire", "Breaking Bad"]);
    }

    #[test]
    fn test_missing_slot_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();

        let history = SearchHistory::with_store(store_in(dir.path()));
        assert!(history.is_empty());
    }

    #[test]
    fn test_corrupt_slot_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("search_history.json"), "not json {").unwrap();

        let history = SearchHistory::with_store(store_in(dir.path()));
        assert!(history.is_empty());
    }

    #[test]
    fn test_clear_persists_to_slot() {
        let dir = tempfile::tempdir().unwrap();

        let mut history = SearchHistory::with_store(store_in(dir.path()));
        history.record("Breaking Bad");
        history.clear();
        drop(history);

        let reloaded = SearchHistory::with_store(store_in(dir.path()));
        assert!(reloaded.is_empty());
    }
}
