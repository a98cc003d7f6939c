//! The on-disk cache record.
//!
//! Stored as `.kilncache` in the project root: a single JSON object whose
//! `timestamps` field maps each source path to the modification time (seconds
//! since the Unix epoch) it had when it was last compiled successfully.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Name of the cache file within the project root.
pub const CACHE_FILE: &str = ".kilncache";

/// Persisted source → timestamp mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Last successfully compiled mtime per source, keyed by root-relative path.
    #[serde(default)]
    pub timestamps: BTreeMap<PathBuf, i64>,
}

impl CacheRecord {
    /// Loads the record from `root`, returning `None` if the file doesn't
    /// exist or can't be parsed.
    pub fn load(root: &Path) -> Option<Self> {
        let path = root.join(CACHE_FILE);
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("ignoring malformed {}: {e}", path.display());
                None
            }
        }
    }

    /// Writes the record to `root` as pretty-printed JSON.
    pub fn save(&self, root: &Path) -> Result<(), CacheError> {
        let path = root.join(CACHE_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json).map_err(|source| CacheError::Write { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_empty() {
        assert!(CacheRecord::default().timestamps.is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = CacheRecord::default();
        record.timestamps.insert(PathBuf::from("src/util.cpp"), 1_700_000_000);
        record.save(dir.path()).unwrap();

        let loaded = CacheRecord::load(dir.path()).unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn file_format() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = CacheRecord::default();
        record.timestamps.insert(PathBuf::from("main.cpp"), 42);
        record.save(dir.path()).unwrap();

        let raw = std::fs::read_to_string(dir.path().join(CACHE_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["timestamps"]["main.cpp"], 42);
    }

    #[test]
    fn load_nonexistent_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CacheRecord::load(dir.path()).is_none());
    }

    #[test]
    fn load_corrupt_json_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CACHE_FILE), "not valid json {{{").unwrap();
        assert!(CacheRecord::load(dir.path()).is_none());
    }

    #[test]
    fn load_wrong_shape_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CACHE_FILE),
            r#"{"timestamps": {"main.cpp": "yesterday"}}"#,
        )
        .unwrap();
        assert!(CacheRecord::load(dir.path()).is_none());
    }

    #[test]
    fn missing_field_is_empty_mapping() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CACHE_FILE), "{}").unwrap();
        let record = CacheRecord::load(dir.path()).unwrap();
        assert!(record.timestamps.is_empty());
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = CacheRecord::default().save(&dir.path().join("absent"));
        assert!(matches!(result, Err(CacheError::Write { .. })));
    }
}
