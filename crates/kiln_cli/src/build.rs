//! `kiln build`, `kiln run` and `kiln test`.
//!
//! All three share the same pipeline: prepare the project (discovery, header
//! checks, package flags), then hand the sources to the planner. They differ
//! only in what the planner does after the main artifact exists.

use kiln_build::{BuildError, BuildReport, BuildRequest, Planner, ProcessExecutor, Strategy};
use kiln_cache::StalenessCache;

use crate::pipeline::{prepare, Prepared};
use crate::{BuildArgs, GlobalArgs};

/// What a building command should do beyond producing the artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Goal {
    /// Build only.
    Build,
    /// Build, then run the artifact.
    Run,
    /// Build, then build and run tests.
    Test,
}

impl Goal {
    fn request(self) -> BuildRequest {
        BuildRequest {
            test: self == Goal::Test,
            run: self == Goal::Run,
        }
    }
}

/// Runs a building command.
///
/// Returns exit code 0 on success. A failing test or program passes its own
/// exit code through; other build failures exit with 1.
pub fn run(
    args: &BuildArgs,
    global: &GlobalArgs,
    goal: Goal,
) -> Result<i32, Box<dyn std::error::Error>> {
    let Some(project) = prepare(args, global)? else {
        return Ok(0);
    };
    let Prepared {
        root,
        config,
        sources,
        platform,
    } = project;

    if !global.quiet {
        eprintln!(
            "   Building {} ({} source(s), {} {})",
            root.display(),
            sources.files().len(),
            config.compiler,
            config.std
        );
    }

    let request = goal.request();
    let cache = if Strategy::choose(&sources, request.test).uses_cache() {
        StalenessCache::load(&root)
    } else {
        StalenessCache::empty(&root)
    };

    let mut executor = ProcessExecutor;
    let report = match Planner::new(&root, config, cache, &mut executor).execute(&sources, request)
    {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(failure_code(&e));
        }
    };

    if !global.quiet {
        print_summary(&report);
        eprintln!("Build complete on {}", platform.name);
    }
    Ok(0)
}

fn failure_code(error: &BuildError) -> i32 {
    match error {
        BuildError::TestFailed { .. } | BuildError::RunFailed { .. } => {
            error.exit_code().filter(|c| *c != 0).unwrap_or(1)
        }
        _ => 1,
    }
}

fn print_summary(report: &BuildReport) {
    if let Some(artifact) = &report.artifact {
        eprintln!(
            "    Linked {} ({} compiled)",
            artifact.display(),
            report.compiled.len()
        );
    }
    if !report.tests.is_empty() {
        let executed = report.tests.iter().filter(|t| t.executed).count();
        eprintln!(
            "     Tests {} built, {} passed",
            report.tests.len(),
            executed
        );
    }
}
