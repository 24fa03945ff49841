//! Persisted list of recent place searches.
//!
//! Stored as a JSON array of strings. At most [`MAX_HISTORY`] entries,
//! most recent first, without duplicates.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Maximum number of queries retained.
pub const MAX_HISTORY: usize = 5;

/// Default location of the history file.
pub const DEFAULT_HISTORY_PATH: &str = "data/search_history.json";

/// Errors writing the history file.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Recent search queries backed by a JSON file.
#[derive(Debug, Clone)]
pub struct SearchHistory {
    path: Option<PathBuf>,
    entries: Vec<String>,
}

impl SearchHistory {
    /// Creates a history that is never written to disk.
    #[must_use]
    pub const fn in_memory() -> Self {
        Self {
            path: None,
            entries: Vec::new(),
        }
    }

    /// Loads the history from `path`.
    ///
    /// A missing file yields an empty history. An unreadable or corrupt
    /// file is logged and also yields an empty history.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<Vec<String>>(&text) {
                Ok(mut entries) => {
                    entries.truncate(MAX_HISTORY);
                    entries
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt search history {}: {e}", path.display());
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                log::warn!("Could not read search history {}: {e}", path.display());
                Vec::new()
            }
        };

        Self {
            path: Some(path.to_path_buf()),
            entries,
        }
    }

    /// Moves `query` to the front, dropping older duplicates and anything
    /// past [`MAX_HISTORY`].
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.entries.retain(|q| q != query);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(MAX_HISTORY);
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Writes the history to its file, creating parent directories.
    /// An empty history removes the file.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the file cannot be written.
    pub fn save(&self) -> Result<(), HistoryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if self.entries.is_empty() {
            return match std::fs::remove_file(path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string(&self.entries)?)?;
        Ok(())
    }

    /// Queries, most recent first.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_dedupes_and_caps() {
        let mut history = SearchHistory::in_memory();
        for q in ["Pune", "Delhi", "Patna", "Pune", "Surat", "Agra", "Goa"] {
            history.record(q);
        }
        assert_eq!(history.entries(), ["Goa", "Agra", "Surat", "Pune", "Patna"]);
    }

    #[test]
    fn blank_query_is_not_recorded() {
        let mut history = SearchHistory::in_memory();
        history.record("   ");
        assert!(history.entries().is_empty());
    }

    #[test]
    fn save_and_reload() {
        let path = std::env::temp_dir().join("risk_lens_history_test/history.json");
        let _ = std::fs::remove_file(&path);

        let mut history = SearchHistory::load(&path);
        assert!(history.entries().is_empty());
        history.record("Springfield");
        history.record("Chennai");
        history.save().unwrap();

        let reloaded = SearchHistory::load(&path);
        assert_eq!(reloaded.entries(), ["Chennai", "Springfield"]);

        let mut cleared = reloaded;
        cleared.clear();
        cleared.save().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = std::env::temp_dir().join("risk_lens_history_corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("history.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(SearchHistory::load(&path).entries().is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
