//! Source discovery, classification and include scanning.
//!
//! This crate walks a project tree for C and C++ translation units, tags each
//! one as entry point, test or normal source ([`SourceSet`]), and extracts the
//! headers each unit includes directly.

#![warn(missing_docs)]

pub mod classify;
pub mod error;
pub mod includes;

pub use classify::{classify, discover_sources, SourceFile, SourceKind, SourceSet};
pub use error::SourceError;
pub use includes::{gather_includes, scan_includes};
