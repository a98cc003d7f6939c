//! Package flag queries and flag classification.

use std::path::PathBuf;
use std::process::Command;

use kiln_config::BuildConfig;

/// Name of the package-metadata query tool.
const PKG_CONFIG: &str = "pkg-config";

/// Source of compile/link flags for a package.
pub trait FlagQuery {
    /// Returns the raw flag string for `package`, or `None` when the tool is
    /// unavailable or knows nothing about it.
    fn query(&mut self, package: &str) -> Option<String>;
}

/// Queries `pkg-config --cflags --libs`.
#[derive(Clone, Debug)]
pub struct PkgConfig {
    program: Option<PathBuf>,
}

impl PkgConfig {
    /// Looks for `pkg-config` on `PATH`. Absence disables flag enrichment.
    pub fn detect() -> Self {
        let program = kiln_common::find_program(PKG_CONFIG);
        if program.is_none() {
            tracing::debug!("{PKG_CONFIG} not found; package flags disabled");
        }
        Self { program }
    }

    /// Returns `true` if a `pkg-config` binary was found.
    pub fn is_available(&self) -> bool {
        self.program.is_some()
    }
}

impl FlagQuery for PkgConfig {
    fn query(&mut self, package: &str) -> Option<String> {
        let program = self.program.as_ref()?;
        let lower = package.to_lowercase();
        let output = Command::new(program)
            .args(["--cflags", "--libs"])
            .args(lower.split_whitespace())
            .output()
            .ok()?;
        if !output.status.success() {
            tracing::debug!("{PKG_CONFIG} has no information for {package}");
            return None;
        }
        let flags = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!flags.is_empty()).then_some(flags)
    }
}

/// Which flag lists a token belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlagTarget {
    /// Goes into the extra compile flags.
    pub compile: bool,
    /// Goes into the extra link flags.
    pub link: bool,
}

/// Classifies one flag token.
///
/// Include paths, defines, framework paths, frameworks and warnings (but not
/// `-Wl,` linker passthrough) are compile flags. Library paths, libraries,
/// linker passthrough and frameworks are link flags. `-framework` is both.
pub fn classify_flag(token: &str) -> FlagTarget {
    let compile = ["-I", "-D", "-F", "-framework"]
        .iter()
        .any(|p| token.starts_with(p))
        || (token.starts_with("-W") && !token.starts_with("-Wl,"));
    let link = ["-l", "-L", "-Wl,", "-framework"]
        .iter()
        .any(|p| token.starts_with(p));
    FlagTarget { compile, link }
}

/// Appends the classified tokens of `flags` to `config`. Unclassified tokens
/// are dropped.
pub fn merge_flags(mut config: BuildConfig, flags: &str) -> BuildConfig {
    for token in flags.split_whitespace() {
        let target = classify_flag(token);
        if target.compile {
            config.push_compile_flag(token);
        }
        if target.link {
            config.push_link_flag(token);
        }
        if !target.compile && !target.link {
            tracing::debug!("dropping unrecognized flag {token}");
        }
    }
    config
}
