//! Scenario test helpers for the kiln build pipeline.
//!
//! Provides on-disk project fixtures and a recording [`Executor`] that
//! behaves like a compiler that always succeeds: it remembers every command
//! and creates the files named by `-o`. The [`run_pipeline`] function chains
//! discovery, header resolution, package discovery and planning the way the
//! CLI does, with the search paths and flag query supplied by the test.

#![warn(missing_docs)]

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use kiln_build::{
    Arg, BuildError, BuildReport, BuildRequest, CommandLine, ExitStatus, Executor, Planner,
};
use kiln_cache::StalenessCache;
use kiln_common::PlatformFamily;
use kiln_config::BuildConfig;
use kiln_deps::{resolve_dependencies, DepsError, FlagQuery, HeaderResolver, SearchPaths};
use kiln_source::{classify, discover_sources, gather_includes, SourceSet};
use tempfile::TempDir;

/// A throwaway project directory.
pub struct Project {
    dir: TempDir,
}

impl Project {
    /// Creates a project from `(relative path, contents)` pairs.
    ///
    /// Source timestamps are set a minute in the past so anything the
    /// recording executor writes afterwards is strictly newer.
    pub fn new(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let project = Self { dir };
        for (path, body) in files {
            project.write(path, body);
            project.set_mtime(path, SystemTime::now() - Duration::from_secs(60));
        }
        project
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes a file, creating parent directories.
    pub fn write(&self, path: &str, body: &str) {
        let full = self.root().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(full, body).expect("write fixture file");
    }

    /// Sets a file's modification time.
    pub fn set_mtime(&self, path: &str, time: SystemTime) {
        File::options()
            .write(true)
            .open(self.root().join(path))
            .and_then(|f| f.set_modified(time))
            .expect("set mtime");
    }

    /// Moves a file's modification time two minutes into the future.
    pub fn touch(&self, path: &str) {
        self.set_mtime(path, SystemTime::now() + Duration::from_secs(120));
    }

    /// Returns `true` if `path` exists under the root.
    pub fn exists(&self, path: &str) -> bool {
        self.root().join(path).exists()
    }

    /// Discovers and classifies the project's sources.
    pub fn sources(&self) -> SourceSet {
        let paths = discover_sources(self.root()).expect("walk project");
        classify(self.root(), &paths)
    }
}

/// Records commands and fabricates their outputs.
#[derive(Default)]
pub struct RecordingExecutor {
    /// Every command received, in order.
    pub commands: Vec<CommandLine>,
}

impl RecordingExecutor {
    /// Outputs of compile (`-c`) commands, in order.
    pub fn compiled(&self) -> Vec<String> {
        self.commands
            .iter()
            .filter(|c| c.args.contains(&Arg::CompileOnly))
            .flat_map(|c| c.outputs().map(display))
            .collect()
    }

    /// Link commands as `(inputs, output)`, in order.
    pub fn links(&self) -> Vec<(Vec<String>, String)> {
        self.commands
            .iter()
            .filter(|c| !c.args.contains(&Arg::CompileOnly))
            .filter_map(|c| {
                let output = c.outputs().next().map(display)?;
                let inputs = c
                    .args
                    .iter()
                    .filter_map(|a| match a {
                        Arg::Input(p) => Some(display(p)),
                        _ => None,
                    })
                    .collect();
                Some((inputs, output))
            })
            .collect()
    }

    /// Commands that executed a built program (no `-o`, no `-c`).
    pub fn executed(&self) -> Vec<PathBuf> {
        self.commands
            .iter()
            .filter(|c| c.outputs().next().is_none())
            .map(|c| PathBuf::from(&c.program))
            .collect()
    }

    /// Forgets recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Executor for RecordingExecutor {
    fn execute(&mut self, command: &CommandLine, cwd: &Path) -> io::Result<ExitStatus> {
        self.commands.push(command.clone());
        for output in command.outputs() {
            File::create(cwd.join(output))?;
        }
        Ok(ExitStatus::from_code(0))
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// A flag query that knows nothing.
pub struct NoFlags;

impl FlagQuery for NoFlags {
    fn query(&mut self, _package: &str) -> Option<String> {
        None
    }
}

/// Why [`run_pipeline`] stopped.
#[derive(Debug)]
pub enum PipelineError {
    /// Headers were missing and the build was not sloppy.
    Deps(DepsError),
    /// The planner failed.
    Build(BuildError),
}

/// Runs discovery, header checks, package discovery and the planner against
/// `project`, resolving headers with `search` only.
pub fn run_pipeline(
    project: &Project,
    config: BuildConfig,
    search: SearchPaths,
    request: BuildRequest,
    exec: &mut RecordingExecutor,
) -> Result<BuildReport, PipelineError> {
    let root = project.root();
    let paths = discover_sources(root).expect("walk project");
    let sources = classify(root, &paths);

    let includes = gather_includes(root, &paths);
    let missing = HeaderResolver::new(search).partition(&includes).missing();
    let (config, _) = resolve_dependencies(config, &missing, PlatformFamily::Debian, &mut NoFlags)
        .map_err(PipelineError::Deps)?;

    let cache = StalenessCache::load(root);
    Planner::new(root, config, cache, exec)
        .execute(&sources, request)
        .map_err(PipelineError::Build)
}

/// Search paths with only the project's own `include` directory.
pub fn local_only(project: &Project) -> SearchPaths {
    SearchPaths::new(vec![project.root().join("include")], Vec::new())
}
