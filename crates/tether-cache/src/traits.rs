use tether_types::CacheKey;

use crate::error::CacheResult;

/// Key-value storage behind the identifier lookup cache.
///
/// Backends may be remote or flaky. They report failures as `Err`, but the
/// resolver downgrades every failed read to a miss and every failed write to
/// a no-op, so an implementation never has to be reliable to be correct.
pub trait CacheStore: Send + Sync {
    /// Read the value stored at `key`.
    ///
    /// Returns `Ok(None)` if there is no entry.
    fn get(&self, key: &CacheKey) -> CacheResult<Option<String>>;

    /// Store `value` at `key`, replacing any previous entry.
    ///
    /// Returns `Ok(false)` if the backend accepted the call but did not keep
    /// the value (e.g. caching is disabled).
    fn set(&self, key: &CacheKey, value: &str) -> CacheResult<bool>;

    /// Remove the entry at `key`. Returns `true` if an entry existed.
    fn remove(&self, key: &CacheKey) -> CacheResult<bool>;

    /// Remove every entry.
    fn flush(&self) -> CacheResult<()>;

    /// Check whether an entry exists at `key`.
    fn exists(&self, key: &CacheKey) -> CacheResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
