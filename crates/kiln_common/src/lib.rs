//! Shared foundational types used across the kiln build orchestrator.
//!
//! This crate provides host and distribution detection ([`Platform`],
//! [`PlatformFamily`]), executable naming rules for the target OS, and lookup
//! of helper programs on `PATH`.

#![warn(missing_docs)]

pub mod platform;
pub mod tool;

pub use platform::{executable_name, Platform, PlatformFamily, TargetOs};
pub use tool::find_program;
