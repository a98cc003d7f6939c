//! Source discovery and classification.
//!
//! Every discovered translation unit is exactly one of [`SourceKind::EntryPoint`],
//! [`SourceKind::Test`] or [`SourceKind::Normal`], and at most one entry point
//! is chosen per project.

use std::path::{Path, PathBuf};

use kiln_common::{executable_name, TargetOs};
use walkdir::{DirEntry, WalkDir};

use crate::error::SourceError;

/// File extensions recognized as C or C++ translation units (lowercase).
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx"];

/// Text that marks a file as defining the program entry point.
const ENTRY_SIGNATURE: &str = " main(";

/// Artifact name used when sources exist but none is an entry point.
const FALLBACK_OUTPUT: &str = "main";

/// The role a translation unit plays in the build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Defines `main` for the project executable.
    EntryPoint,
    /// A standalone test program (`*_test.cpp`, `test.cpp`).
    Test,
    /// Any other translation unit.
    Normal,
}

/// A classified translation unit. `path` is relative to the project root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the project root.
    pub path: PathBuf,
    /// Derived role of the file.
    pub kind: SourceKind,
}

/// The classified sources of one build run, in directory-walk order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceSet {
    files: Vec<SourceFile>,
}

impl SourceSet {
    /// All files in walk order.
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Returns `true` if no sources were discovered.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The chosen entry point, if any.
    pub fn entry_point(&self) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.kind == SourceKind::EntryPoint)
    }

    /// Test sources in walk order.
    pub fn tests(&self) -> Vec<&Path> {
        self.of_kind(|k| k == SourceKind::Test)
    }

    /// Normal sources (entry point excluded) in walk order.
    pub fn normals(&self) -> Vec<&Path> {
        self.of_kind(|k| k == SourceKind::Normal)
    }

    /// Sources that make up the main executable: entry point and normal
    /// sources, in walk order.
    pub fn buildable(&self) -> Vec<&Path> {
        self.of_kind(|k| k != SourceKind::Test)
    }

    fn of_kind(&self, pred: impl Fn(SourceKind) -> bool) -> Vec<&Path> {
        self.files
            .iter()
            .filter(|f| pred(f.kind))
            .map(|f| f.path.as_path())
            .collect()
    }

    /// Name of the main artifact for `os`.
    ///
    /// The entry point's file stem when there is one, `main` when only other
    /// non-test sources exist, and `None` for a tests-only project.
    pub fn output_name(&self, os: TargetOs) -> Option<String> {
        let base = match self.entry_point() {
            Some(entry) => entry
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .filter(|s| !s.is_empty())
                .unwrap_or(FALLBACK_OUTPUT)
                .to_string(),
            None if !self.buildable().is_empty() => FALLBACK_OUTPUT.to_string(),
            None => return None,
        };
        Some(executable_name(&base, os))
    }
}

/// Discovers C and C++ sources under `root`, relative to `root`.
///
/// Hidden directories are skipped. Entries are visited in file-name order so
/// the result is stable across runs.
pub fn discover_sources(root: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let mut out = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden_dir(e));

    for entry in walker {
        let entry = entry.map_err(|e| SourceError::Walk {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e,
        })?;
        if entry.file_type().is_file() && has_source_extension(entry.path()) {
            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            out.push(rel.to_path_buf());
        }
    }

    tracing::debug!("discovered {} source(s) under {}", out.len(), root.display());
    Ok(out)
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Splits a base name into lowercase `(stem, extension)` if it is a source file.
fn lower_stem(path: &Path) -> Option<(String, String)> {
    let name = path.file_name()?.to_str()?.to_ascii_lowercase();
    let (stem, ext) = name.rsplit_once('.')?;
    SOURCE_EXTENSIONS
        .contains(&ext)
        .then(|| (stem.to_string(), ext.to_string()))
}

/// Returns `true` for `*_test.<ext>` and `test.<ext>`, case-insensitively.
pub fn is_test_source(path: &Path) -> bool {
    lower_stem(path).is_some_and(|(stem, _)| stem == "test" || stem.ends_with("_test"))
}

fn is_main_named(path: &Path) -> bool {
    lower_stem(path).is_some_and(|(stem, _)| stem == "main")
}

/// Searches the raw bytes, so sources in any 8-bit encoding qualify.
fn defines_entry_point(root: &Path, path: &Path) -> bool {
    let signature = ENTRY_SIGNATURE.as_bytes();
    std::fs::read(root.join(path))
        .map(|bytes| bytes.windows(signature.len()).any(|w| w == signature))
        .unwrap_or(false)
}

/// Classifies discovered sources.
///
/// Rules, in priority order: test naming, a file named `main.<ext>`, the only
/// non-test source, the first non-test source containing ` main(`.
pub fn classify(root: &Path, paths: &[PathBuf]) -> SourceSet {
    let non_tests: Vec<&PathBuf> = paths.iter().filter(|p| !is_test_source(p)).collect();

    let entry = non_tests
        .iter()
        .find(|p| is_main_named(p))
        .or_else(|| match non_tests.as_slice() {
            [only] => Some(only),
            _ => None,
        })
        .or_else(|| non_tests.iter().find(|p| defines_entry_point(root, p)))
        .map(|p| (*p).clone());

    let files = paths
        .iter()
        .map(|path| {
            let kind = if is_test_source(path) {
                SourceKind::Test
            } else if entry.as_ref() == Some(path) {
                SourceKind::EntryPoint
            } else {
                SourceKind::Normal
            };
            SourceFile {
                path: path.clone(),
                kind,
            }
        })
        .collect();

    SourceSet { files }
}
