//! Header satisfiability checks.
//!
//! Every header name resolves to exactly one [`HeaderResolution`]. The check is
//! satisfiability, not selection: the first directory that has the file wins
//! and no attempt is made to pick "the" providing file.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::search::SearchPaths;

/// Standard library headers that never need a search (C++ names; the C names
/// normalize to the same keys).
const STANDARD_HEADERS: &[&str] = &[
    "algorithm", "any", "array", "atomic", "barrier", "bit", "bitset", "cassert", "ccomplex",
    "cctype", "cerrno", "cfenv", "cfloat", "charconv", "chrono", "cinttypes", "ciso646",
    "climits", "clocale", "cmath", "codecvt", "compare", "complex", "concepts",
    "condition_variable", "coroutine", "csetjmp", "csignal", "cstdarg", "cstdbool", "cstddef",
    "cstdint", "cstdio", "cstdlib", "cstring", "ctime", "cuchar", "cwchar", "cwctype", "deque",
    "exception", "execution", "expected", "filesystem", "format", "forward_list", "fstream",
    "functional", "future", "initializer_list", "iomanip", "ios", "iosfwd", "iostream",
    "istream", "iterator", "latch", "limits", "list", "locale", "map", "mdspan", "memory",
    "memory_resource", "mutex", "new", "numbers", "numeric", "optional", "ostream", "print",
    "queue", "random", "ranges", "ratio", "regex", "scoped_allocator", "semaphore", "set",
    "shared_mutex", "source_location", "span", "spanstream", "sstream", "stack",
    "stacktrace", "stdatomic", "stdexcept", "stop_token", "streambuf", "string",
    "string_view", "strstream", "syncstream", "system_error", "tgmath", "thread", "threads",
    "tuple", "type_traits", "typeindex", "typeinfo", "unordered_map", "unordered_set",
    "utility", "valarray", "variant", "vector", "version",
];

static STANDARD_KEYS: LazyLock<HashSet<String>> =
    LazyLock::new(|| STANDARD_HEADERS.iter().map(|h| normalize(h)).collect());

/// Strips the extension, lowercases and drops one leading `c`.
fn normalize(header: &str) -> String {
    let file_start = header.rfind('/').map_or(0, |i| i + 1);
    let stem = match header[file_start..].rfind('.') {
        Some(dot) => &header[..file_start + dot],
        None => header,
    };
    let lower = stem.to_lowercase();
    match lower.strip_prefix('c') {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

/// Returns `true` if `header` is on the standard-library allow-list.
///
/// `<cstdio>` and `<stdio.h>` are both recognized.
pub fn is_standard_header(header: &str) -> bool {
    STANDARD_KEYS.contains(&normalize(header))
}

/// Where a header was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderResolution {
    /// On the standard-library allow-list.
    Standard,
    /// Found at this path under a local include directory.
    Local(PathBuf),
    /// Found at this path under a system include directory.
    System(PathBuf),
    /// Not found anywhere.
    Missing,
}

impl HeaderResolution {
    /// Returns `true` for [`HeaderResolution::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, HeaderResolution::Missing)
    }
}

/// Resolution of every header of a build, in header-set order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// `(header, resolution)` pairs.
    pub entries: Vec<(String, HeaderResolution)>,
}

impl ResolutionReport {
    /// The headers that resolved to nothing.
    pub fn missing(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, r)| r.is_missing())
            .map(|(h, _)| h.clone())
            .collect()
    }
}

/// Checks headers against the allow-list and the search paths.
#[derive(Clone, Debug)]
pub struct HeaderResolver {
    paths: SearchPaths,
}

impl HeaderResolver {
    /// Creates a resolver over `paths`.
    pub fn new(paths: SearchPaths) -> Self {
        Self { paths }
    }

    /// Resolves one header: allow-list, then local, then system directories.
    pub fn resolve(&self, header: &str) -> HeaderResolution {
        if is_standard_header(header) {
            return HeaderResolution::Standard;
        }
        if let Some(found) = first_existing(&self.paths.local, header) {
            return HeaderResolution::Local(found);
        }
        if let Some(found) = first_existing(&self.paths.system, header) {
            return HeaderResolution::System(found);
        }
        HeaderResolution::Missing
    }

    /// Resolves every header in `headers`.
    pub fn partition(&self, headers: &BTreeSet<String>) -> ResolutionReport {
        let entries = headers
            .iter()
            .map(|h| {
                let resolution = self.resolve(h);
                tracing::debug!("header {h}: {resolution:?}");
                (h.clone(), resolution)
            })
            .collect();
        ResolutionReport { entries }
    }
}

fn first_existing(dirs: &[PathBuf], header: &str) -> Option<PathBuf> {
    dirs.iter()
        .map(|d| d.join(header))
        .find(|candidate| Path::is_file(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn resolver_with(local: &[(&str, &str)], system: &[(&str, &str)]) -> (TempDir, HeaderResolver) {
        let tmp = TempDir::new().unwrap();
        let mut local_dirs = Vec::new();
        let mut system_dirs = Vec::new();
        for (dir, file) in local {
            let d = tmp.path().join("local").join(dir);
            fs::create_dir_all(d.join(file).parent().unwrap()).unwrap();
            fs::write(d.join(file), "").unwrap();
            if !local_dirs.contains(&d) {
                local_dirs.push(d);
            }
        }
        for (dir, file) in system {
            let d = tmp.path().join("system").join(dir);
            fs::create_dir_all(d.join(file).parent().unwrap()).unwrap();
            fs::write(d.join(file), "").unwrap();
            if !system_dirs.contains(&d) {
                system_dirs.push(d);
            }
        }
        let resolver = HeaderResolver::new(SearchPaths::new(local_dirs, system_dirs));
        (tmp, resolver)
    }

    #[test]
    fn standard_headers() {
        for h in ["vector", "iostream", "cstdio", "stdio.h", "CMath", "math.h", "chrono", "string.h"] {
            assert!(is_standard_header(h), "{h} should be standard");
        }
        for h in ["boost/lexical_cast.hpp", "SDL2/SDL.h", "util.h", "gtk/gtk.h"] {
            assert!(!is_standard_header(h), "{h} should not be standard");
        }
    }

    #[test]
    fn normalize_strips_only_final_extension() {
        assert_eq!(normalize("boost/lexical_cast.hpp"), "boost/lexical_cast");
        assert_eq!(normalize("v1.2/thing"), "v1.2/thing");
        assert_eq!(normalize("cstdint"), "stdint");
        assert_eq!(normalize("Stdint.H"), "stdint");
    }

    #[test]
    fn standard_wins_over_filesystem() {
        let (_tmp, resolver) = resolver_with(&[("inc", "vector")], &[]);
        assert_eq!(resolver.resolve("vector"), HeaderResolution::Standard);
    }

    #[test]
    fn local_before_system() {
        let (tmp, resolver) = resolver_with(&[("inc", "util.h")], &[("usr", "util.h")]);
        assert_eq!(
            resolver.resolve("util.h"),
            HeaderResolution::Local(tmp.path().join("local/inc/util.h"))
        );
    }

    #[test]
    fn system_resolution() {
        let (tmp, resolver) = resolver_with(&[], &[("usr", "zlib.h")]);
        assert_eq!(
            resolver.resolve("zlib.h"),
            HeaderResolution::System(tmp.path().join("system/usr/zlib.h"))
        );
    }

    #[test]
    fn nested_relative_names() {
        let (tmp, resolver) = resolver_with(&[("inc", "engine/render.hpp")], &[]);
        assert_eq!(
            resolver.resolve("engine/render.hpp"),
            HeaderResolution::Local(tmp.path().join("local/inc/engine/render.hpp"))
        );
        assert!(resolver.resolve("render.hpp").is_missing());
    }

    #[test]
    fn missing_header() {
        let (_tmp, resolver) = resolver_with(&[("inc", "a.h")], &[("usr", "b.h")]);
        assert_eq!(
            resolver.resolve("boost/lexical_cast.hpp"),
            HeaderResolution::Missing
        );
    }

    #[test]
    fn directory_does_not_satisfy() {
        let (_tmp, resolver) = resolver_with(&[("inc", "sub/x.h")], &[]);
        assert!(resolver.resolve("sub").is_missing());
    }

    #[test]
    fn partition_is_total() {
        let (_tmp, resolver) = resolver_with(&[("inc", "local.h")], &[("usr", "sys.h")]);
        let headers: BTreeSet<String> = ["vector", "local.h", "sys.h", "nowhere.h"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let report = resolver.partition(&headers);
        assert_eq!(report.entries.len(), headers.len());

        let classes: Vec<_> = report
            .entries
            .iter()
            .map(|(h, r)| {
                let class = match r {
                    HeaderResolution::Standard => "standard",
                    HeaderResolution::Local(_) => "local",
                    HeaderResolution::System(_) => "system",
                    HeaderResolution::Missing => "missing",
                };
                (h.as_str(), class)
            })
            .collect();
        assert_eq!(
            classes,
            vec![
                ("local.h", "local"),
                ("nowhere.h", "missing"),
                ("sys.h", "system"),
                ("vector", "standard"),
            ]
        );
        assert_eq!(report.missing(), vec!["nowhere.h"]);
    }
}
