//! Shared pipeline helpers for CLI commands.
//!
//! Resolves the project directory, layers the configuration, and runs the
//! steps every building command needs before the planner takes over: source
//! discovery, include scanning, header resolution and package discovery.

use std::path::PathBuf;

use kiln_common::Platform;
use kiln_config::{BuildConfig, CrossTarget, ModeFlags, ProjectFile};
use kiln_deps::{
    resolve_dependencies, DependencyReport, DepsError, HeaderResolver, MissingHeader, PkgConfig,
    SearchPaths,
};
use kiln_source::{classify, discover_sources, gather_includes, SourceSet};

use crate::{BuildArgs, GlobalArgs};

/// Everything known about a project once its headers check out.
pub struct Prepared {
    /// Absolute project root.
    pub root: PathBuf,
    /// Configuration enriched with package flags.
    pub config: BuildConfig,
    /// Classified sources.
    pub sources: SourceSet,
    /// The host platform.
    pub platform: Platform,
}

/// Resolves the project root from `--dir`, defaulting to the current
/// directory. The result is absolute.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = match &global.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    std::fs::canonicalize(&dir)
        .map_err(|e| format!("cannot open project directory {}: {e}", dir.display()).into())
}

/// Layers command-line choices over `kiln.toml`.
pub fn build_config(args: &BuildArgs, project: &ProjectFile) -> BuildConfig {
    BuildConfig::builder()
        .project(project)
        .compiler(args.cxx.clone())
        .clang(args.clang)
        .std(args.std.clone())
        .mode(ModeFlags {
            debug: args.debug,
            strict: args.strict,
            sloppy: args.sloppy,
            optimized: args.opt,
        })
        .cross(args.win64_docker.then_some(CrossTarget::Win64Docker))
        .build()
}

/// Runs the pre-build steps.
///
/// Returns `Ok(None)` after printing "No sources found." when the project has
/// nothing to build. Missing headers are printed with install hints; unless
/// the build is sloppy they end the run with an error.
pub fn prepare(
    args: &BuildArgs,
    global: &GlobalArgs,
) -> Result<Option<Prepared>, Box<dyn std::error::Error>> {
    let root = resolve_project_root(global)?;
    let project = kiln_config::load_project_file(&root)?;
    let config = build_config(args, &project);
    let platform = Platform::detect();
    tracing::debug!("host platform: {platform}");

    let paths = discover_sources(&root)?;
    let sources = classify(&root, &paths);
    if sources.is_empty() {
        println!("No sources found.");
        return Ok(None);
    }

    let includes = gather_includes(&root, &paths);
    let search = SearchPaths::discover(&root, &project.build.include_dirs);
    let resolution = HeaderResolver::new(search).partition(&includes);
    let missing = resolution.missing();

    let mut pkg_config = PkgConfig::detect();
    let config = match resolve_dependencies(config, &missing, platform.family, &mut pkg_config) {
        Ok((config, report)) => {
            report_missing(&report.missing);
            if !global.quiet {
                for note in dependency_notes(&report, pkg_config.is_available()) {
                    eprintln!("{note}");
                }
            }
            config
        }
        Err(e) => {
            let DepsError::MissingHeaders { missing } = &e;
            report_missing(missing);
            return Err(e.into());
        }
    };

    Ok(Some(Prepared {
        root,
        config,
        sources,
        platform,
    }))
}

/// Status lines describing where package flags came from.
fn dependency_notes(report: &DependencyReport, have_pkg_config: bool) -> Vec<String> {
    let mut notes: Vec<String> = report
        .enriched
        .iter()
        .map(|package| format!("     Using pkg-config flags for {package}"))
        .collect();
    if !report.is_clean() && !have_pkg_config {
        notes.push("     Note: pkg-config not found, no package flags added".to_string());
    }
    notes
}

fn report_missing(missing: &[MissingHeader]) {
    for entry in missing {
        eprintln!("Missing header: {}", entry.header);
        if let Some(hint) = &entry.hint {
            eprintln!("  Possibly install with: {}", hint.install_command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_config::load_project_file_from_str;
    use tempfile::TempDir;

    fn global(dir: Option<PathBuf>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            dir,
        }
    }

    #[test]
    fn cli_overrides_project_file() {
        let project = load_project_file_from_str(
            "[build]\ncompiler = \"g++-12\"\nstd = \"c++17\"\ncflags = [\"-DPROJECT\"]\n",
        )
        .unwrap();
        let args = BuildArgs {
            std: Some("c++23".to_string()),
            debug: true,
            ..BuildArgs::default()
        };
        let config = build_config(&args, &project);
        assert_eq!(config.compiler, "g++-12");
        assert_eq!(config.std, "c++23");
        assert!(config.mode.debug);
        assert_eq!(config.extra_compile_flags(), ["-DPROJECT"]);
    }

    #[test]
    fn cross_flag_selects_mingw() {
        let args = BuildArgs {
            win64_docker: true,
            clang: true,
            ..BuildArgs::default()
        };
        let config = build_config(&args, &ProjectFile::default());
        assert_eq!(config.compiler, "x86_64-w64-mingw32-g++");
        assert!(config.is_cross());
    }

    #[test]
    fn explicit_dir_is_canonicalized() {
        let tmp = TempDir::new().unwrap();
        let root = resolve_project_root(&global(Some(tmp.path().to_path_buf()))).unwrap();
        assert!(root.is_absolute());
        assert_eq!(root, std::fs::canonicalize(tmp.path()).unwrap());
    }

    #[test]
    fn missing_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = resolve_project_root(&global(Some(tmp.path().join("nope")))).unwrap_err();
        assert!(err.to_string().contains("cannot open project directory"));
    }

    #[test]
    fn empty_project_prepares_nothing() {
        let tmp = TempDir::new().unwrap();
        let prepared =
            prepare(&BuildArgs::default(), &global(Some(tmp.path().to_path_buf()))).unwrap();
        assert!(prepared.is_none());
    }

    #[test]
    fn missing_header_fails_unless_sloppy() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("main.cpp"),
            "#include \"nowhere_to_be_found.h\"\nint main() {}\n",
        )
        .unwrap();
        let g = global(Some(tmp.path().to_path_buf()));

        let err = prepare(&BuildArgs::default(), &g).err().unwrap();
        assert!(err.to_string().contains("nowhere_to_be_found.h"));

        let sloppy = BuildArgs {
            sloppy: true,
            ..BuildArgs::default()
        };
        let prepared = prepare(&sloppy, &g).unwrap().unwrap();
        assert_eq!(prepared.sources.files().len(), 1);
    }

    #[test]
    fn local_headers_resolve() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("include")).unwrap();
        std::fs::write(tmp.path().join("include").join("util.h"), "int f();\n").unwrap();
        std::fs::write(
            tmp.path().join("main.cpp"),
            "#include <vector>\n#include \"util.h\"\nint main() { return f(); }\n",
        )
        .unwrap();
        let prepared = prepare(
            &BuildArgs::default(),
            &global(Some(tmp.path().to_path_buf())),
        )
        .unwrap()
        .unwrap();
        assert!(prepared.config.extra_compile_flags().is_empty());
    }

    #[test]
    fn notes_name_enriched_packages() {
        let report = DependencyReport {
            missing: vec![MissingHeader {
                header: "SDL2/SDL.h".to_string(),
                hint: None,
            }],
            enriched: vec!["sdl2".to_string()],
        };
        assert_eq!(
            dependency_notes(&report, true),
            vec!["     Using pkg-config flags for sdl2".to_string()]
        );
    }

    #[test]
    fn notes_mention_absent_pkg_config_only_when_needed() {
        let clean = DependencyReport::default();
        assert!(dependency_notes(&clean, false).is_empty());

        let missing = DependencyReport {
            missing: vec![MissingHeader {
                header: "glm/glm.hpp".to_string(),
                hint: None,
            }],
            enriched: Vec::new(),
        };
        assert_eq!(dependency_notes(&missing, false).len(), 1);
        assert!(dependency_notes(&missing, true).is_empty());
    }
}
