//! Build configuration for a single kiln run.
//!
//! This crate owns the [`BuildConfig`] value threaded through dependency
//! resolution and command assembly, the [`BuildConfigBuilder`] that layers
//! defaults, the optional `kiln.toml` file and command-line overrides, and the
//! loader for `kiln.toml` itself.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_project_file, load_project_file_from_str, PROJECT_FILE};
pub use types::*;
