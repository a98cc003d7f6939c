//! Rebuild decisions for source/object pairs.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::CacheError;
use crate::record::CacheRecord;

/// Converts a timestamp to whole seconds relative to the Unix epoch.
fn to_secs(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}

/// Returns the modification time of `path` in whole seconds, if it can be read.
pub fn modified_secs(path: &Path) -> Option<i64> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(to_secs(modified))
}

/// Loaded staleness state for one project root.
///
/// Paths passed to this type are relative to the root. A source present in
/// the record was compiled successfully at the recorded timestamp.
#[derive(Debug)]
pub struct StalenessCache {
    root: PathBuf,
    record: CacheRecord,
}

impl StalenessCache {
    /// Loads the cache for `root`, starting empty if there is no usable file.
    pub fn load(root: &Path) -> Self {
        let record = CacheRecord::load(root).unwrap_or_else(|| {
            tracing::debug!("starting with an empty cache in {}", root.display());
            CacheRecord::default()
        });
        Self {
            root: root.to_path_buf(),
            record,
        }
    }

    /// Creates an empty cache for `root` without reading anything.
    pub fn empty(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            record: CacheRecord::default(),
        }
    }

    /// Returns `true` if `object` must be rebuilt from `source`.
    ///
    /// Stale when the object is missing, older than the source, the source
    /// can't be inspected, or the recorded timestamp disagrees with the
    /// source's current one.
    pub fn needs_rebuild(&self, source: &Path, object: &Path) -> bool {
        let Ok(obj_meta) = std::fs::metadata(self.root.join(object)) else {
            return true;
        };
        if !obj_meta.is_file() {
            return true;
        }
        let Ok(src_meta) = std::fs::metadata(self.root.join(source)) else {
            return true;
        };
        let (Ok(src_time), Ok(obj_time)) = (src_meta.modified(), obj_meta.modified()) else {
            return true;
        };
        if obj_time < src_time {
            return true;
        }
        self.record.timestamps.get(source) != Some(&to_secs(src_time))
    }

    /// Records that `source` was just compiled successfully.
    pub fn record_success(&mut self, source: &Path) {
        match modified_secs(&self.root.join(source)) {
            Some(secs) => {
                self.record.timestamps.insert(source.to_path_buf(), secs);
            }
            None => tracing::debug!("cannot stat {} after compiling it", source.display()),
        }
    }

    /// The recorded timestamp for `source`.
    pub fn timestamp(&self, source: &Path) -> Option<i64> {
        self.record.timestamps.get(source).copied()
    }

    /// Number of recorded sources.
    pub fn len(&self) -> usize {
        self.record.timestamps.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.record.timestamps.is_empty()
    }

    /// Persists the cache to the project root.
    pub fn save(&self) -> Result<(), CacheError> {
        self.record.save(&self.root)
    }
}
