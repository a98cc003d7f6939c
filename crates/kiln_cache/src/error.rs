//! Cache persistence errors.

use std::path::PathBuf;

/// Failure to persist the staleness cache.
///
/// Loading has no error type: an unreadable cache is an empty one. These come
/// only from [`StalenessCache::save`](crate::StalenessCache::save) and the
/// planner downgrades them to warnings.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache file could not be written.
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        /// The cache file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The record could not be encoded as JSON.
    #[error("cannot encode build cache: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_display_names_the_file() {
        let err = CacheError::Write {
            path: PathBuf::from("/project/.kilncache"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("cannot write /project/.kilncache"));
        assert!(msg.ends_with("denied"));
    }

    #[test]
    fn encode_display() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = CacheError::from(json_err);
        assert!(err.to_string().starts_with("cannot encode build cache:"));
    }
}
