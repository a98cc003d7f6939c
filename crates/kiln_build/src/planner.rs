//! Build planning and execution.
//!
//! A [`Planner`] owns everything one build run needs: the project root, the
//! enriched configuration, the staleness cache and an [`Executor`]. It
//! produces the main artifact, then optionally builds and runs tests and the
//! artifact itself.
//!
//! Every object is evaluated at most once per run. The first request for a
//! source's object decides whether to compile it; later requests reuse that
//! decision, so a normal source shared by several test executables is never
//! compiled twice.
//!
//! The cache is saved once at the end of a run that used it, whether the run
//! succeeded or not. Save failures are reported as warnings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use kiln_cache::StalenessCache;
use kiln_common::{executable_name, TargetOs};
use kiln_config::BuildConfig;
use kiln_source::SourceSet;
use tracing::{debug, info, warn};

use crate::command::CommandLine;
use crate::error::BuildError;
use crate::executor::{CrossSandbox, ExitStatus, Executor};
use crate::strategy::Strategy;

/// The object file for `source`: same path, `.o` extension.
pub fn object_path(source: &Path) -> PathBuf {
    source.with_extension("o")
}

/// The test executable linked from `object`: the object path without `.o`,
/// with the target's executable suffix.
pub fn test_executable(object: &Path, os: TargetOs) -> PathBuf {
    let stem = object.with_extension("");
    PathBuf::from(executable_name(&stem.to_string_lossy(), os))
}

/// Fails if two sources that this run compiles share an object path, as
/// `foo.c` and `foo.cpp` do.
fn check_object_paths(sources: &SourceSet, with_tests: bool) -> Result<(), BuildError> {
    let mut compiled = sources.buildable();
    if with_tests {
        compiled.extend(sources.tests());
    }

    let mut owners: BTreeMap<PathBuf, &Path> = BTreeMap::new();
    for source in compiled {
        let object = object_path(source);
        if let Some(first) = owners.get(&object) {
            return Err(BuildError::ObjectCollision {
                object,
                first: first.to_path_buf(),
                second: source.to_path_buf(),
            });
        }
        owners.insert(object, source);
    }
    Ok(())
}

/// What a run should do beyond producing the main artifact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildRequest {
    /// Build and execute test sources.
    pub test: bool,
    /// Execute the main artifact after building it.
    pub run: bool,
}

/// A test that was built during the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestOutcome {
    /// The test source.
    pub source: PathBuf,
    /// The linked test executable.
    pub executable: PathBuf,
    /// `false` when execution was skipped because of cross-compilation.
    pub executed: bool,
}

/// Summary of what a run did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildReport {
    /// How the main artifact was produced.
    pub strategy: Strategy,
    /// Sources that were compiled to objects, in compile order.
    pub compiled: Vec<PathBuf>,
    /// The main artifact, if there were buildable sources.
    pub artifact: Option<PathBuf>,
    /// Tests that were built, in execution order.
    pub tests: Vec<TestOutcome>,
    /// Whether the main artifact was executed.
    pub ran: bool,
}

impl BuildReport {
    fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            compiled: Vec::new(),
            artifact: None,
            tests: Vec::new(),
            ran: false,
        }
    }
}

/// Drives one build run.
pub struct Planner<'e> {
    root: PathBuf,
    config: BuildConfig,
    cache: StalenessCache,
    executor: &'e mut dyn Executor,
    sandbox: Option<CrossSandbox>,
    /// Source → object, for every object already evaluated this run.
    objects: BTreeMap<PathBuf, PathBuf>,
}

impl<'e> Planner<'e> {
    /// Creates a planner. Commands run with `root` as their working
    /// directory, inside a container when `config` cross-compiles.
    pub fn new(
        root: &Path,
        config: BuildConfig,
        cache: StalenessCache,
        executor: &'e mut dyn Executor,
    ) -> Self {
        let sandbox = config.cross.map(CrossSandbox::for_target);
        Self {
            root: root.to_path_buf(),
            config,
            cache,
            executor,
            sandbox,
            objects: BTreeMap::new(),
        }
    }

    /// Builds `sources` and carries out `request`.
    pub fn execute(
        mut self,
        sources: &SourceSet,
        request: BuildRequest,
    ) -> Result<BuildReport, BuildError> {
        let strategy = Strategy::choose(sources, request.test);
        if strategy == Strategy::MultiStep {
            check_object_paths(sources, request.test)?;
        }
        let mut report = BuildReport::new(strategy);

        let built = self.build_artifact(sources, strategy, &mut report).and_then(|()| {
            if request.test {
                self.run_tests(sources, &mut report)
            } else {
                Ok(())
            }
        });

        if strategy.uses_cache() {
            if let Err(e) = self.cache.save() {
                warn!("could not save build cache: {e}");
            }
        }
        built?;

        if request.run {
            self.run_artifact(&mut report)?;
        }
        Ok(report)
    }

    fn build_artifact(
        &mut self,
        sources: &SourceSet,
        strategy: Strategy,
        report: &mut BuildReport,
    ) -> Result<(), BuildError> {
        let Some(output) = sources.output_name(self.config.target_os()) else {
            debug!("no buildable sources, skipping the main artifact");
            return Ok(());
        };
        let output = PathBuf::from(output);
        let buildable = sources.buildable();

        match strategy {
            Strategy::SingleStep => {
                let cmd = CommandLine::single_step(&self.config, buildable[0], &output);
                self.invoke(&cmd)?;
                report.compiled.push(buildable[0].to_path_buf());
            }
            Strategy::MultiStep => {
                let mut objects = Vec::with_capacity(buildable.len());
                for source in buildable {
                    objects.push(self.object_for(source, report)?);
                }
                let cmd = CommandLine::link(&self.config, &objects, &output);
                self.invoke(&cmd)?;
            }
        }
        report.artifact = Some(output);
        Ok(())
    }

    /// Compiles normal sources once, then compiles, links and runs each test
    /// in turn. The first failure stops the sequence.
    fn run_tests(
        &mut self,
        sources: &SourceSet,
        report: &mut BuildReport,
    ) -> Result<(), BuildError> {
        let tests = sources.tests();
        if tests.is_empty() {
            info!("No tests found.");
            return Ok(());
        }

        let mut shared = Vec::new();
        for source in sources.normals() {
            shared.push(self.object_for(source, report)?);
        }

        let os = self.config.target_os();
        for source in tests {
            let object = self.object_for(source, report)?;
            let executable = test_executable(&object, os);

            let mut objects = Vec::with_capacity(shared.len() + 1);
            objects.push(object);
            objects.extend(shared.iter().cloned());
            self.invoke(&CommandLine::link(&self.config, &objects, &executable))?;

            let mut outcome = TestOutcome {
                source: source.to_path_buf(),
                executable: executable.clone(),
                executed: false,
            };
            if self.config.is_cross() {
                info!(
                    "cannot run {} on this host, skipping",
                    executable.display()
                );
                report.tests.push(outcome);
                continue;
            }

            info!("Testing {}", executable.display());
            let status = self.spawn(&self.local_command(&executable))?;
            outcome.executed = true;
            report.tests.push(outcome);
            if !status.success() {
                return Err(BuildError::TestFailed { executable, status });
            }
        }
        Ok(())
    }

    fn run_artifact(&mut self, report: &mut BuildReport) -> Result<(), BuildError> {
        let Some(artifact) = report.artifact.clone() else {
            info!("nothing to run");
            return Ok(());
        };
        if self.config.is_cross() {
            info!("cannot run {} on this host, skipping", artifact.display());
            return Ok(());
        }
        info!("Running {}", artifact.display());
        let status = self.spawn(&self.local_command(&artifact))?;
        report.ran = true;
        if !status.success() {
            return Err(BuildError::RunFailed { artifact, status });
        }
        Ok(())
    }

    /// Returns the object for `source`, compiling it first if it is stale and
    /// has not been evaluated yet this run.
    fn object_for(
        &mut self,
        source: &Path,
        report: &mut BuildReport,
    ) -> Result<PathBuf, BuildError> {
        if let Some(object) = self.objects.get(source) {
            return Ok(object.clone());
        }
        let object = object_path(source);
        if self.cache.needs_rebuild(source, &object) {
            self.invoke(&CommandLine::compile(&self.config, source, &object))?;
            self.cache.record_success(source);
            report.compiled.push(source.to_path_buf());
        } else {
            debug!("{} is up to date", object.display());
        }
        self.objects.insert(source.to_path_buf(), object.clone());
        Ok(object)
    }

    /// Echoes and runs a compiler or linker command, inside the sandbox when
    /// cross-compiling.
    fn invoke(&mut self, command: &CommandLine) -> Result<(), BuildError> {
        let wrapped = self.sandbox.as_ref().map(|s| s.wrap(command, &self.root));
        let command = wrapped.as_ref().unwrap_or(command);
        info!("{command}");
        let status = self.spawn(command)?;
        if status.success() {
            Ok(())
        } else {
            Err(BuildError::ToolFailed {
                program: command.program.clone(),
                status,
            })
        }
    }

    fn spawn(&mut self, command: &CommandLine) -> Result<ExitStatus, BuildError> {
        self.executor
            .execute(command, &self.root)
            .map_err(|source| BuildError::Spawn {
                program: command.program.clone(),
                source,
            })
    }

    /// A command that runs a built executable from the project root.
    fn local_command(&self, relative: &Path) -> CommandLine {
        CommandLine::new(self.root.join(relative).to_string_lossy().into_owned())
    }
}
