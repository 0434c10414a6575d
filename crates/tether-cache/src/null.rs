use tether_types::CacheKey;

use crate::error::CacheResult;
use crate::traits::CacheStore;

/// A cache that stores nothing.
///
/// Used when lookup caching is disabled: every read misses and every write
/// reports `false`, so all resolution goes through traversal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

impl CacheStore for NullCache {
    fn get(&self, _key: &CacheKey) -> CacheResult<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &CacheKey, _value: &str) -> CacheResult<bool> {
        Ok(false)
    }

    fn remove(&self, _key: &CacheKey) -> CacheResult<bool> {
        Ok(false)
    }

    fn flush(&self) -> CacheResult<()> {
        Ok(())
    }
}
