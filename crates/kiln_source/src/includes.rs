//! Direct include extraction.
//!
//! This is a line-based approximation of the preprocessor, not a preprocessor:
//! there is no handling of line continuations, comments or conditional
//! compilation. A header named inside `/* ... */` or an `#if 0` block is
//! reported like a live include, and headers included by headers are never
//! visited.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// `#include "x"` or `#include <x>`, with optional whitespace around `#`.
static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*#\s*include\s*["<]([^">]+)[">]"#).expect("include pattern is valid")
});

/// Returns the header names included by `text`, in line order.
///
/// Only the first header token on a line is captured.
pub fn scan_includes(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| INCLUDE_RE.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Collects the set of headers included directly by any of `sources`.
///
/// Source paths are resolved against `root`. Files need not be UTF-8;
/// invalid bytes are replaced before scanning. Unreadable files contribute
/// nothing.
pub fn gather_includes(root: &Path, sources: &[PathBuf]) -> BTreeSet<String> {
    let mut headers = BTreeSet::new();
    for source in sources {
        match std::fs::read(root.join(source)) {
            Ok(bytes) => headers.extend(scan_includes(&String::from_utf8_lossy(&bytes))),
            Err(e) => tracing::debug!("skipping includes of {}: {e}", source.display()),
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_and_angled() {
        let text = "#include <vector>\n#include \"util.h\"\n";
        assert_eq!(scan_includes(text), vec!["vector", "util.h"]);
    }

    #[test]
    fn whitespace_variants() {
        let text = "  #  include<boost/lexical_cast.hpp>\n\t#include \"a/b.h\"\n";
        assert_eq!(
            scan_includes(text),
            vec!["boost/lexical_cast.hpp", "a/b.h"]
        );
    }

    #[test]
    fn non_include_lines_ignored() {
        let text = "int x = 1;\n#define FOO <bar>\n// include <nope>\n#pragma once\n";
        assert!(scan_includes(text).is_empty());
    }

    #[test]
    fn not_line_anchored_after_code() {
        assert!(scan_includes("int y; #include <vector>").is_empty());
    }

    #[test]
    fn first_token_per_line_only() {
        assert_eq!(scan_includes("#include <a.h> <b.h>"), vec!["a.h"]);
    }

    #[test]
    fn comments_and_disabled_branches_are_not_understood() {
        let text = "#if 0\n#include <ghost.h>\n#endif\n/*\n#include \"commented.h\"\n*/\n";
        assert_eq!(scan_includes(text), vec!["ghost.h", "commented.h"]);
    }

    #[test]
    fn empty_delimiters_do_not_match() {
        assert!(scan_includes("#include <>\n#include \"\"\n").is_empty());
    }

    #[test]
    fn gather_collapses_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.cpp"), "#include <vector>\n#include \"x.h\"\n").unwrap();
        std::fs::write(dir.path().join("b.cpp"), "#include <vector>\n#include <map>\n").unwrap();

        let headers = gather_includes(
            dir.path(),
            &[
                PathBuf::from("a.cpp"),
                PathBuf::from("b.cpp"),
                PathBuf::from("missing.cpp"),
            ],
        );
        let expected: BTreeSet<String> = ["map", "vector", "x.h"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(headers, expected);
    }

    #[test]
    fn gather_reads_latin1_sources() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("main.cpp"),
            b"// caf\xe9\n#include <boost/lexical_cast.hpp>\nint main() {}\n",
        )
        .unwrap();

        let headers = gather_includes(dir.path(), &[PathBuf::from("main.cpp")]);
        assert!(headers.contains("boost/lexical_cast.hpp"));
        assert_eq!(headers.len(), 1);
    }
}
