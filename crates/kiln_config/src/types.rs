//! The build configuration value and its builder.

use kiln_common::TargetOs;
use serde::Deserialize;

/// Compiler used when nothing else is requested.
pub const DEFAULT_COMPILER: &str = "g++";

/// Language standard used when nothing else is requested.
pub const DEFAULT_STD: &str = "c++20";

/// Compiler selected by `--clang` on native builds.
pub const CLANG_COMPILER: &str = "clang++";

/// Optional project overrides parsed from `kiln.toml`.
///
/// Every field is optional; a project without the file builds with defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectFile {
    /// Toolchain overrides.
    #[serde(default)]
    pub build: BuildSection,
}

/// The `[build]` table of `kiln.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct BuildSection {
    /// Compiler binary (e.g. `"clang++"`).
    pub compiler: Option<String>,
    /// Language standard tag without the `-std=` prefix (e.g. `"c++17"`).
    pub std: Option<String>,
    /// Extra compile flags appended after the mode-derived flags.
    #[serde(default)]
    pub cflags: Vec<String>,
    /// Extra link flags appended at the end of link commands.
    #[serde(default)]
    pub ldflags: Vec<String>,
    /// Additional local include directories, relative to the project root.
    #[serde(default)]
    pub include_dirs: Vec<String>,
}

/// Mode switches that select flag groups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeFlags {
    /// `-O0 -g`; takes precedence over `optimized`.
    pub debug: bool,
    /// `-Wextra -Wconversion`.
    pub strict: bool,
    /// `-w -fpermissive`; also lets the build proceed past missing headers.
    pub sloppy: bool,
    /// `-O2`.
    pub optimized: bool,
}

/// A foreign platform the build can be delegated to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrossTarget {
    /// 64-bit Windows through a MinGW toolchain running in Docker.
    Win64Docker,
}

impl CrossTarget {
    /// The compiler binary inside the cross-compilation container.
    pub fn compiler(self) -> &'static str {
        match self {
            CrossTarget::Win64Docker => "x86_64-w64-mingw32-g++",
        }
    }

    /// The operating system produced artifacts run on.
    pub fn target_os(self) -> TargetOs {
        match self {
            CrossTarget::Win64Docker => TargetOs::Windows,
        }
    }
}

/// Configuration for one build run.
///
/// Extra flag lists are append-only: package discovery pushes onto them and
/// nothing removes entries for the lifetime of the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildConfig {
    /// Compiler binary name.
    pub compiler: String,
    /// Language standard tag; empty means no `-std=` flag.
    pub std: String,
    /// Mode switches.
    pub mode: ModeFlags,
    /// Cross-compilation target, if any.
    pub cross: Option<CrossTarget>,
    extra_compile_flags: Vec<String>,
    extra_link_flags: Vec<String>,
}

impl BuildConfig {
    /// Starts a builder with kiln's defaults.
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder::default()
    }

    /// Returns `true` if missing headers should not stop the build.
    pub fn is_sloppy(&self) -> bool {
        self.mode.sloppy
    }

    /// The OS produced artifacts are built for.
    pub fn target_os(&self) -> TargetOs {
        self.cross
            .map(CrossTarget::target_os)
            .unwrap_or_else(TargetOs::host)
    }

    /// Returns `true` if artifacts cannot be executed on this host.
    pub fn is_cross(&self) -> bool {
        self.cross.is_some()
    }

    /// Extra compile flags in the order they were added.
    pub fn extra_compile_flags(&self) -> &[String] {
        &self.extra_compile_flags
    }

    /// Extra link flags in the order they were added.
    pub fn extra_link_flags(&self) -> &[String] {
        &self.extra_link_flags
    }

    /// Appends a compile flag.
    pub fn push_compile_flag(&mut self, flag: impl Into<String>) {
        self.extra_compile_flags.push(flag.into());
    }

    /// Appends a link flag.
    pub fn push_link_flag(&mut self, flag: impl Into<String>) {
        self.extra_link_flags.push(flag.into());
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfigBuilder::default().build()
    }
}

/// Layers defaults, `kiln.toml` and command-line choices into a [`BuildConfig`].
///
/// Compiler precedence, highest first: an explicit compiler, the cross
/// target's compiler, `clang`, the project file, [`DEFAULT_COMPILER`].
#[derive(Debug, Default)]
pub struct BuildConfigBuilder {
    explicit_compiler: Option<String>,
    project_compiler: Option<String>,
    clang: bool,
    std: Option<String>,
    project_std: Option<String>,
    mode: ModeFlags,
    cross: Option<CrossTarget>,
    compile_flags: Vec<String>,
    link_flags: Vec<String>,
}

impl BuildConfigBuilder {
    /// Applies the overrides of a `kiln.toml` file.
    pub fn project(mut self, file: &ProjectFile) -> Self {
        self.project_compiler = file.build.compiler.clone();
        self.project_std = file.build.std.clone();
        self.compile_flags.extend(
            file.build
                .include_dirs
                .iter()
                .map(|dir| format!("-I{dir}")),
        );
        self.compile_flags.extend(file.build.cflags.iter().cloned());
        self.link_flags.extend(file.build.ldflags.iter().cloned());
        self
    }

    /// Forces a specific compiler binary.
    pub fn compiler(mut self, compiler: Option<String>) -> Self {
        self.explicit_compiler = compiler;
        self
    }

    /// Prefers `clang++` for native builds.
    pub fn clang(mut self, clang: bool) -> Self {
        self.clang = clang;
        self
    }

    /// Overrides the language standard.
    pub fn std(mut self, std: Option<String>) -> Self {
        self.std = std;
        self
    }

    /// Sets the mode switches.
    pub fn mode(mut self, mode: ModeFlags) -> Self {
        self.mode = mode;
        self
    }

    /// Delegates compilation to a cross target.
    pub fn cross(mut self, cross: Option<CrossTarget>) -> Self {
        self.cross = cross;
        self
    }

    /// Produces the configuration.
    pub fn build(self) -> BuildConfig {
        let compiler = match (self.explicit_compiler, self.cross) {
            (Some(c), _) => c,
            (None, Some(cross)) => cross.compiler().to_string(),
            (None, None) if self.clang => CLANG_COMPILER.to_string(),
            (None, None) => self
                .project_compiler
                .unwrap_or_else(|| DEFAULT_COMPILER.to_string()),
        };
        let std = self
            .std
            .or(self.project_std)
            .unwrap_or_else(|| DEFAULT_STD.to_string());

        BuildConfig {
            compiler,
            std,
            mode: self.mode,
            cross: self.cross,
            extra_compile_flags: self.compile_flags,
            extra_link_flags: self.link_flags,
        }
    }
}
