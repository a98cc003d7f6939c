//! The package discovery step of a build.
//!
//! Takes the build configuration by value and hands back the enriched one,
//! so the flags gathered here are visible to the planner only through the
//! returned value.

use std::collections::BTreeSet;

use kiln_common::PlatformFamily;
use kiln_config::BuildConfig;

use crate::error::DepsError;
use crate::flags::{merge_flags, FlagQuery};
use crate::hints::{hint_for, PackageHint};

/// A header nobody provides, with the package that probably does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingHeader {
    /// The header as written in the include directive.
    pub header: String,
    /// Suggested package, if the header is in the hint table.
    pub hint: Option<PackageHint>,
}

/// Outcome of package discovery.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyReport {
    /// Missing headers in the order they were reported.
    pub missing: Vec<MissingHeader>,
    /// Packages whose flags were merged into the configuration.
    pub enriched: Vec<String>,
}

impl DependencyReport {
    /// Returns `true` if every header was satisfied.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Maps missing headers to packages and merges their flags into `config`.
///
/// Each distinct package is queried at most once. When anything is missing
/// and `config` is not sloppy the result is [`DepsError::MissingHeaders`];
/// in sloppy mode the build continues with whatever flags were gathered.
pub fn resolve_dependencies(
    mut config: BuildConfig,
    missing: &[String],
    family: PlatformFamily,
    query: &mut dyn FlagQuery,
) -> Result<(BuildConfig, DependencyReport), DepsError> {
    let mut report = DependencyReport::default();
    let mut queried = BTreeSet::new();

    for header in missing {
        let hint = hint_for(header, family);
        if let Some(hint) = &hint {
            if queried.insert(hint.package.clone()) {
                if let Some(flags) = query.query(&hint.package) {
                    tracing::debug!("{}: {flags}", hint.package);
                    config = merge_flags(config, &flags);
                    report.enriched.push(hint.package.clone());
                }
            }
        }
        report.missing.push(MissingHeader {
            header: header.clone(),
            hint,
        });
    }

    if !report.missing.is_empty() {
        if !config.is_sloppy() {
            return Err(DepsError::MissingHeaders {
                missing: report.missing,
            });
        }
        tracing::info!("continuing in sloppy mode, ignoring missing headers");
    }

    Ok((config, report))
}
