//! Error types for build execution.

use std::path::PathBuf;

use crate::executor::ExitStatus;

/// Errors that stop a build run.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A tool could not be started at all.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Two sources would compile to the same object file.
    #[error(
        "{} and {} would both compile to {}; rename one of them",
        .first.display(),
        .second.display(),
        .object.display()
    )]
    ObjectCollision {
        /// The shared object path.
        object: PathBuf,
        /// The source claiming it first, in walk order.
        first: PathBuf,
        /// The source that collides with it.
        second: PathBuf,
    },

    /// A compiler or linker invocation reported failure.
    #[error("{program} failed ({status})")]
    ToolFailed {
        /// The program that failed.
        program: String,
        /// Its exit status.
        status: ExitStatus,
    },

    /// A test executable reported failure.
    #[error("test {} failed ({status})", .executable.display())]
    TestFailed {
        /// The test executable.
        executable: PathBuf,
        /// Its exit status.
        status: ExitStatus,
    },

    /// The built artifact reported failure when run.
    #[error("{} exited unsuccessfully ({status})", .artifact.display())]
    RunFailed {
        /// The artifact that was run.
        artifact: PathBuf,
        /// Its exit status.
        status: ExitStatus,
    },
}

impl BuildError {
    /// The process exit code to propagate, when one is known.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            BuildError::Spawn { .. } | BuildError::ObjectCollision { .. } => None,
            BuildError::ToolFailed { status, .. }
            | BuildError::TestFailed { status, .. }
            | BuildError::RunFailed { status, .. } => status.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_failed_display() {
        let err = BuildError::ToolFailed {
            program: "g++".to_string(),
            status: ExitStatus::from_code(1),
        };
        assert_eq!(err.to_string(), "g++ failed (exit code 1)");
        assert_eq!(err.exit_code(), Some(1));
    }

    #[test]
    fn spawn_display() {
        let err = BuildError::Spawn {
            program: "clang++".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("failed to run clang++"));
        assert!(msg.contains("not found"));
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn object_collision_display() {
        let err = BuildError::ObjectCollision {
            object: PathBuf::from("foo.o"),
            first: PathBuf::from("foo.c"),
            second: PathBuf::from("foo.cpp"),
        };
        assert_eq!(
            err.to_string(),
            "foo.c and foo.cpp would both compile to foo.o; rename one of them"
        );
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn test_failed_display() {
        let err = BuildError::TestFailed {
            executable: PathBuf::from("util_test"),
            status: ExitStatus::terminated(),
        };
        assert_eq!(err.to_string(), "test util_test failed (terminated by signal)");
    }

    #[test]
    fn run_failed_display() {
        let err = BuildError::RunFailed {
            artifact: PathBuf::from("main"),
            status: ExitStatus::from_code(3),
        };
        assert_eq!(err.to_string(), "main exited unsuccessfully (exit code 3)");
        assert_eq!(err.exit_code(), Some(3));
    }
}
