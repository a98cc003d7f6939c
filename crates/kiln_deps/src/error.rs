//! Error types for dependency resolution.

use crate::discovery::MissingHeader;

/// Errors that stop a build before compilation starts.
#[derive(Debug, thiserror::Error)]
pub enum DepsError {
    /// Headers could not be found and sloppy mode is off.
    #[error("{} missing header(s): {}; install them or rerun with --sloppy", .missing.len(), names(.missing))]
    MissingHeaders {
        /// Every unresolved header with its package hint.
        missing: Vec<MissingHeader>,
    },
}

fn names(missing: &[MissingHeader]) -> String {
    missing
        .iter()
        .map(|m| m.header.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
