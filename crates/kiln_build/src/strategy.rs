//! Choosing between the single-step and multi-step build paths.

use kiln_source::SourceSet;

/// How the main artifact is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Compile and link the only source in one invocation, bypassing the
    /// cache.
    SingleStep,
    /// Compile stale sources to objects, then link.
    MultiStep,
}

impl Strategy {
    /// Single-step exactly when there is one buildable source, no tests and
    /// test mode is off.
    pub fn choose(sources: &SourceSet, test_mode: bool) -> Self {
        if !test_mode && sources.buildable().len() == 1 && sources.tests().is_empty() {
            Strategy::SingleStep
        } else {
            Strategy::MultiStep
        }
    }

    /// Returns `true` if this path reads and writes the staleness cache.
    pub fn uses_cache(self) -> bool {
        self == Strategy::MultiStep
    }
}
