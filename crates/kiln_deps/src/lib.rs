//! Header resolution and package discovery.
//!
//! Decides which directly included headers a project cannot satisfy
//! ([`HeaderResolver`]), maps each missing header to a distribution package
//! ([`hint_for`]), and folds the compiler and linker flags reported by
//! `pkg-config` back into the [`BuildConfig`](kiln_config::BuildConfig)
//! ([`resolve_dependencies`]).

#![warn(missing_docs)]

pub mod discovery;
pub mod error;
pub mod flags;
pub mod hints;
pub mod resolve;
pub mod search;

pub use discovery::{resolve_dependencies, DependencyReport, MissingHeader};
pub use error::DepsError;
pub use flags::{classify_flag, merge_flags, FlagQuery, FlagTarget, PkgConfig};
pub use hints::{hint_for, PackageHint};
pub use resolve::{is_standard_header, HeaderResolution, HeaderResolver, ResolutionReport};
pub use search::SearchPaths;
