//! Kiln CLI, zero-configuration builds for small C and C++ projects.
//!
//! `kiln` (or `kiln build`) discovers sources under the project directory,
//! checks their headers, and compiles and links them. `kiln run` and
//! `kiln test` build and then execute the program or its tests. `kiln clean`
//! removes build outputs and `kiln pro` writes a qmake project file.

#![warn(missing_docs)]

mod build;
mod clean;
mod pipeline;
mod project_file;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Kiln: build C and C++ projects without a build file.
#[derive(Parser, Debug)]
#[command(name = "kiln", version, about = "Zero-configuration C/C++ builds")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory (defaults to the current directory).
    #[arg(short = 'C', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Build options shared by every subcommand.
    #[command(flatten)]
    pub build: BuildArgs,

    /// The subcommand to run. Defaults to `build`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Compile and link the project.
    Build,
    /// Build, then run the program.
    Run,
    /// Build, then compile and run every test source.
    Test,
    /// Remove objects, executables and the build cache.
    Clean,
    /// Write a qmake `.pro` file instead of building.
    Pro,
}

/// Options that shape the compiler invocation.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Build without optimization and with debug info.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Enable extra warnings.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Silence warnings, relax conformance and tolerate missing headers.
    #[arg(long, global = true)]
    pub sloppy: bool,

    /// Optimize (`-O2`). Ignored with `--debug`.
    #[arg(long, global = true)]
    pub opt: bool,

    /// Use clang++ instead of g++.
    #[arg(long, global = true)]
    pub clang: bool,

    /// Use a specific compiler binary.
    #[arg(long, global = true, value_name = "BIN")]
    pub cxx: Option<String>,

    /// Language standard passed as `-std=<TAG>`.
    #[arg(long, global = true, value_name = "TAG")]
    pub std: Option<String>,

    /// Cross-compile for 64-bit Windows with MinGW in Docker.
    #[arg(long = "win64-docker", global = true)]
    pub win64_docker: bool,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional project directory.
    pub dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        dir: cli.dir,
    };
    init_logging(&global);

    let result = match cli.command.unwrap_or(Command::Build) {
        Command::Build => build::run(&cli.build, &global, build::Goal::Build),
        Command::Run => build::run(&cli.build, &global, build::Goal::Run),
        Command::Test => build::run(&cli.build, &global, build::Goal::Test),
        Command::Clean => clean::run(&cli.build, &global),
        Command::Pro => project_file::run(&cli.build, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// The default log filter for the verbosity flags. `RUST_LOG` wins over it.
fn default_filter(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "warn"
    } else if global.verbose {
        "debug"
    } else {
        "info"
    }
}

fn init_logging(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(global)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
