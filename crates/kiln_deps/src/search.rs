//! Include search path discovery.

use std::path::{Path, PathBuf};

/// Conventional local include directories, relative to the project root.
const LOCAL_DIRS: &[&str] = &["include", ".", "common", "../include", "../common"];

/// Default system include directories.
const SYSTEM_DIRS: &[&str] = &["/usr/include", "/usr/local/include"];

/// Ordered include directories: local directories are searched before system
/// directories, each list in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchPaths {
    /// Project-local include directories.
    pub local: Vec<PathBuf>,
    /// System include directories.
    pub system: Vec<PathBuf>,
}

impl SearchPaths {
    /// Creates search paths from explicit lists.
    pub fn new(local: Vec<PathBuf>, system: Vec<PathBuf>) -> Self {
        Self { local, system }
    }

    /// Discovers the search paths of the project at `root`.
    ///
    /// `extra_local` are configured directories relative to `root`. Only
    /// directories that exist are kept.
    pub fn discover(root: &Path, extra_local: &[String]) -> Self {
        let local = LOCAL_DIRS
            .iter()
            .copied()
            .chain(extra_local.iter().map(String::as_str))
            .map(|d| root.join(d))
            .filter(|d| d.is_dir())
            .collect();

        let mut system: Vec<PathBuf> = SYSTEM_DIRS.iter().map(PathBuf::from).collect();
        let multiarch = PathBuf::from(format!("/usr/include/{}-linux-gnu", std::env::consts::ARCH));
        if multiarch.is_dir() {
            system.push(multiarch);
        }

        Self { local, system }
    }
}
