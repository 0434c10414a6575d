use serde::Serialize;
use tether_types::CacheKey;

/// Outcome of [`crate::Lookup::clear`].
///
/// Each entry is removed independently; a failed removal is recorded and
/// the walk continues.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClearReport {
    /// Keys whose entry existed and was removed.
    pub removed: Vec<CacheKey>,
    /// Keys that had no entry.
    pub absent: Vec<CacheKey>,
    /// Keys whose removal failed.
    pub failed: Vec<CacheKey>,
}

impl ClearReport {
    /// Returns `true` if no removal failed.
    pub fn succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// One object [`crate::Resolver::index`] could not cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IndexFailure {
    /// The object, rendered for humans.
    pub model: String,
    pub reason: String,
}

/// Outcome of [`crate::Resolver::index`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    /// Keys written to the cache.
    pub populated: Vec<CacheKey>,
    /// Keys the cache declined to keep (e.g. caching disabled).
    pub skipped: Vec<CacheKey>,
    pub failed: Vec<IndexFailure>,
}

impl IndexReport {
    /// Returns `true` if every object was processed without error.
    pub fn succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}
