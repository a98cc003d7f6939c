//! Running commands.
//!
//! The planner never spawns processes itself; it hands [`CommandLine`]s to an
//! [`Executor`]. [`ProcessExecutor`] runs them for real. Tests substitute a
//! recording executor.

use std::fmt;
use std::io;
use std::path::Path;
use std::process::Command;

use kiln_config::CrossTarget;

use crate::command::{Arg, CommandLine};

/// Exit status of an executed command. `None` means the process was killed
/// by a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitStatus {
    code: Option<i32>,
}

impl ExitStatus {
    /// A status carrying `code`.
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// A successful status.
    pub fn success_status() -> Self {
        Self::from_code(0)
    }

    /// A status for a process terminated without an exit code.
    pub fn terminated() -> Self {
        Self { code: None }
    }

    /// Returns `true` for exit code zero.
    pub fn success(self) -> bool {
        self.code == Some(0)
    }

    /// The exit code, if the process exited normally.
    pub fn code(self) -> Option<i32> {
        self.code
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Runs a command in a working directory and reports how it exited.
pub trait Executor {
    /// Executes `command` with `cwd` as its working directory. An `Err`
    /// means the process could not be started.
    fn execute(&mut self, command: &CommandLine, cwd: &Path) -> io::Result<ExitStatus>;
}

/// Spawns real processes, inheriting stdio.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn execute(&mut self, command: &CommandLine, cwd: &Path) -> io::Result<ExitStatus> {
        let status = Command::new(&command.program)
            .args(command.arg_tokens())
            .current_dir(cwd)
            .status()?;
        Ok(status.into())
    }
}

/// Wraps compiler invocations so they run inside a container that mounts the
/// project root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrossSandbox {
    image: String,
    workdir: String,
}

impl CrossSandbox {
    /// MinGW image used for 64-bit Windows builds.
    pub const MINGW_IMAGE: &'static str = "jhasse/mingw:latest";

    /// The sandbox that hosts `target`'s toolchain.
    pub fn for_target(target: CrossTarget) -> Self {
        match target {
            CrossTarget::Win64Docker => Self {
                image: Self::MINGW_IMAGE.to_string(),
                workdir: "/home".to_string(),
            },
        }
    }

    /// `docker run -v <root>:<workdir> -w <workdir> --rm <image> <command…>`.
    pub fn wrap(&self, command: &CommandLine, root: &Path) -> CommandLine {
        let mount = format!("{}:{}", root.display(), self.workdir);
        let prefix: [&str; 7] = [
            "run",
            "-v",
            &mount,
            "-w",
            &self.workdir,
            "--rm",
            &self.image,
        ];
        CommandLine::new("docker")
            .args(prefix.iter().map(|t| Arg::Raw(t.to_string())))
            .args(command.tokens().into_iter().map(Arg::Raw))
    }
}
