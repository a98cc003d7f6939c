//! Staleness cache for incremental rebuilds.
//!
//! This crate persists the last successfully compiled modification time of
//! every translation unit and decides, per source/object pair, whether the
//! object must be rebuilt. All reads are fail-safe: a missing or corrupt cache
//! file is an empty cache, which means a full rebuild.

#![warn(missing_docs)]

pub mod error;
pub mod record;
pub mod staleness;

pub use error::CacheError;
pub use record::{CacheRecord, CACHE_FILE};
pub use staleness::{modified_secs, StalenessCache};
