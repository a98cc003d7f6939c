//! Structured command descriptors.
//!
//! A [`CommandLine`] is an ordered list of typed arguments. The category order
//! is fixed by the constructors (standard, base and mode flags, extra compile
//! flags, inputs, output, link flags), so equal inputs always produce equal
//! token sequences.

use std::fmt;
use std::path::{Path, PathBuf};

use kiln_config::BuildConfig;

use crate::flags::base_and_mode_flags;

/// One typed command-line argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Arg {
    /// Language standard, rendered as `-std=<tag>`.
    Std(String),
    /// A compile-side flag (base, mode or extra).
    Flag(String),
    /// `-c`.
    CompileOnly,
    /// A source or object path.
    Input(PathBuf),
    /// The output path, rendered as `-o <path>`.
    Output(PathBuf),
    /// A link flag.
    LinkFlag(String),
    /// A verbatim token.
    Raw(String),
}

impl Arg {
    fn push_tokens(&self, out: &mut Vec<String>) {
        match self {
            Arg::Std(std) => out.push(format!("-std={std}")),
            Arg::Flag(f) | Arg::LinkFlag(f) | Arg::Raw(f) => out.push(f.clone()),
            Arg::CompileOnly => out.push("-c".to_string()),
            Arg::Input(p) => out.push(p.to_string_lossy().into_owned()),
            Arg::Output(p) => {
                out.push("-o".to_string());
                out.push(p.to_string_lossy().into_owned());
            }
        }
    }
}

/// A program and its typed arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine {
    /// The program to invoke.
    pub program: String,
    /// Arguments in order.
    pub args: Vec<Arg>,
}

impl CommandLine {
    /// A command with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends an argument.
    pub fn arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }

    /// Appends several arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = Arg>) -> Self {
        self.args.extend(args);
        self
    }

    /// Program followed by the argument tokens.
    pub fn tokens(&self) -> Vec<String> {
        let mut out = vec![self.program.clone()];
        for arg in &self.args {
            arg.push_tokens(&mut out);
        }
        out
    }

    /// Argument tokens without the program.
    pub fn arg_tokens(&self) -> Vec<String> {
        let mut out = Vec::new();
        for arg in &self.args {
            arg.push_tokens(&mut out);
        }
        out
    }

    /// The paths of all [`Arg::Output`] arguments.
    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.args.iter().filter_map(|a| match a {
            Arg::Output(p) => Some(p.as_path()),
            _ => None,
        })
    }

    /// `<cc> -std=<std> <base> <mode> <extra-compile> -c <source> -o <object>`.
    pub fn compile(config: &BuildConfig, source: &Path, object: &Path) -> Self {
        Self::compiler_prefix(config)
            .arg(Arg::CompileOnly)
            .arg(Arg::Input(source.to_path_buf()))
            .arg(Arg::Output(object.to_path_buf()))
    }

    /// `<cc> -std=<std> <base> <mode> <extra-compile> <source> -o <out> <extra-link>`.
    pub fn single_step(config: &BuildConfig, source: &Path, output: &Path) -> Self {
        Self::compiler_prefix(config)
            .arg(Arg::Input(source.to_path_buf()))
            .arg(Arg::Output(output.to_path_buf()))
            .args(link_flags(config))
    }

    /// `<cc> <base> <mode> <objects…> -o <out> <extra-link>`.
    pub fn link(config: &BuildConfig, objects: &[PathBuf], output: &Path) -> Self {
        Self::new(config.compiler.clone())
            .args(base_and_mode_flags(config.mode).into_iter().map(Arg::Flag))
            .args(objects.iter().cloned().map(Arg::Input))
            .arg(Arg::Output(output.to_path_buf()))
            .args(link_flags(config))
    }

    fn compiler_prefix(config: &BuildConfig) -> Self {
        let mut cmd = Self::new(config.compiler.clone());
        if !config.std.is_empty() {
            cmd = cmd.arg(Arg::Std(config.std.clone()));
        }
        cmd.args(base_and_mode_flags(config.mode).into_iter().map(Arg::Flag))
            .args(config.extra_compile_flags().iter().cloned().map(Arg::Flag))
    }
}

fn link_flags(config: &BuildConfig) -> impl Iterator<Item = Arg> + '_ {
    config.extra_link_flags().iter().cloned().map(Arg::LinkFlag)
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens().join(" "))
    }
}
