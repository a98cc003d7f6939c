//! Error types for source discovery.

use std::path::PathBuf;

/// Errors that can occur while discovering project sources.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The directory walk failed (unreadable directory, broken entry).
    #[error("failed to walk {path}: {source}")]
    Walk {
        /// The path being visited when the walk failed.
        path: PathBuf,
        /// The underlying walk error.
        source: walkdir::Error,
    },
}
