use std::collections::HashMap;
use std::sync::RwLock;

use tether_types::CacheKey;

use crate::error::{CacheError, CacheResult};
use crate::traits::CacheStore;

/// In-memory, HashMap-based lookup cache.
///
/// Entries live behind a `RwLock` and are lost when the cache is dropped.
pub struct InMemoryCache {
    entries: RwLock<HashMap<CacheKey, String>>,
}

impl InMemoryCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A sorted list of all cached keys.
    pub fn keys(&self) -> Vec<CacheKey> {
        let mut keys: Vec<CacheKey> = self
            .entries
            .read()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for InMemoryCache {
    fn get(&self, key: &CacheKey) -> CacheResult<Option<String>> {
        let map = self
            .entries
            .read()
            .map_err(|e| CacheError::Poisoned(e.to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &CacheKey, value: &str) -> CacheResult<bool> {
        let mut map = self
            .entries
            .write()
            .map_err(|e| CacheError::Poisoned(e.to_string()))?;
        map.insert(key.clone(), value.to_string());
        Ok(true)
    }

    fn remove(&self, key: &CacheKey) -> CacheResult<bool> {
        let mut map = self
            .entries
            .write()
            .map_err(|e| CacheError::Poisoned(e.to_string()))?;
        Ok(map.remove(key).is_some())
    }

    fn flush(&self) -> CacheResult<()> {
        let mut map = self
            .entries
            .write()
            .map_err(|e| CacheError::Poisoned(e.to_string()))?;
        map.clear();
        Ok(())
    }

    fn exists(&self, key: &CacheKey) -> CacheResult<bool> {
        let map = self
            .entries
            .read()
            .map_err(|e| CacheError::Poisoned(e.to_string()))?;
        Ok(map.contains_key(key))
    }
}

impl std::fmt::Debug for InMemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCache")
            .field("entry_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_types::EntityType;

    fn key(host: &str) -> CacheKey {
        CacheKey::new(EntityType::Page, host)
    }

    #[test]
    fn set_then_get() {
        let cache = InMemoryCache::new();
        assert!(cache.set(&key("test-a"), "a").unwrap());
        assert_eq!(cache.get(&key("test-a")).unwrap().as_deref(), Some("a"));
        assert!(cache.exists(&key("test-a")).unwrap());
    }

    #[test]
    fn get_missing_returns_none() {
        let cache = InMemoryCache::new();
        assert!(cache.get(&key("nope")).unwrap().is_none());
        assert!(!cache.exists(&key("nope")).unwrap());
    }

    #[test]
    fn set_overwrites() {
        let cache = InMemoryCache::new();
        cache.set(&key("test-a"), "a").unwrap();
        cache.set(&key("test-a"), "b/a").unwrap();
        assert_eq!(cache.get(&key("test-a")).unwrap().as_deref(), Some("b/a"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn remove_reports_existence() {
        let cache = InMemoryCache::new();
        cache.set(&key("test-a"), "a").unwrap();
        assert!(cache.remove(&key("test-a")).unwrap());
        assert!(!cache.remove(&key("test-a")).unwrap());
        assert!(cache.is_empty());
    }

    #[test]
    fn flush_empties_cache() {
        let cache = InMemoryCache::new();
        cache.set(&key("test-a"), "a").unwrap();
        cache.set(&key("test-b"), "b").unwrap();
        cache.flush().unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn keys_are_sorted() {
        let cache = InMemoryCache::new();
        cache.set(&key("zz"), "z").unwrap();
        cache.set(&key("aa"), "a").unwrap();
        let keys: Vec<String> = cache.keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["page/aa/", "page/zz/"]);
    }
}
