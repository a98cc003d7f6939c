//! Build planning and command assembly.
//!
//! The [`Planner`] picks a [`Strategy`] for a classified source set, builds
//! structured [`CommandLine`]s, consults the staleness cache, and hands each
//! command to an [`Executor`]. Commands are only turned into strings at the
//! process boundary.

#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod executor;
pub mod flags;
pub mod planner;
pub mod strategy;

pub use command::{Arg, CommandLine};
pub use error::BuildError;
pub use executor::{CrossSandbox, ExitStatus, Executor, ProcessExecutor};
pub use flags::{base_and_mode_flags, BASE_FLAGS};
pub use planner::{object_path, test_executable, BuildReport, BuildRequest, Planner, TestOutcome};
pub use strategy::Strategy;
