//! `kiln clean`: removes build outputs.

use std::path::{Path, PathBuf};

use kiln_build::{object_path, test_executable};
use kiln_cache::CACHE_FILE;
use kiln_config::BuildConfig;
use kiln_source::{classify, discover_sources};
use walkdir::WalkDir;

use crate::pipeline::{build_config, resolve_project_root};
use crate::{BuildArgs, GlobalArgs};

/// Extensions of object files left by any kiln run, matched case-insensitively.
const OBJECT_EXTENSIONS: &[&str] = &["o", "obj"];

/// Runs the `kiln clean` command.
///
/// Works even when the project has no sources left.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let root = resolve_project_root(global)?;
    let project = kiln_config::load_project_file(&root)?;
    let config = build_config(args, &project);

    for path in clean_project(&root, &config)? {
        if !global.quiet {
            eprintln!("   Removed {}", path.display());
        }
    }
    Ok(0)
}

/// Deletes objects, the main artifact, test executables and the cache file.
/// Returns the removed paths relative to `root`.
pub fn clean_project(
    root: &Path,
    config: &BuildConfig,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut targets = object_files(root)?;

    let sources = classify(root, &discover_sources(root)?);
    let os = config.target_os();
    if let Some(name) = sources.output_name(os) {
        targets.push(PathBuf::from(name));
    }
    for test in sources.tests() {
        targets.push(test_executable(&object_path(test), os));
    }
    targets.push(PathBuf::from(CACHE_FILE));

    let mut removed = Vec::new();
    for target in targets {
        let path = root.join(&target);
        if !path.is_file() {
            continue;
        }
        std::fs::remove_file(&path)
            .map_err(|e| format!("cannot remove {}: {e}", path.display()))?;
        removed.push(target);
    }
    Ok(removed)
}

fn object_files(root: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e.file_type().is_dir()
                || !e.file_name().to_string_lossy().starts_with('.')
        });

    let mut found = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_object = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| OBJECT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if is_object {
            if let Ok(relative) = entry.path().strip_prefix(root) {
                found.push(relative.to_path_buf());
            }
        }
    }
    Ok(found)
}
