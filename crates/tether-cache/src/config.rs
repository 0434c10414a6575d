use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CacheResult;
use crate::file::FileCache;
use crate::memory::InMemoryCache;
use crate::null::NullCache;
use crate::traits::CacheStore;

/// Which storage backs the lookup cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local `HashMap`.
    Memory,
    /// One file per entry below `root`.
    File { root: PathBuf },
    /// No caching; every lookup traverses the content tree.
    Disabled,
}

/// Configuration for the lookup cache.
///
/// Accepts either a table naming the backend or a plain boolean:
///
/// ```toml
/// [cache]
/// type = "file"
/// root = "cache/uuid"
/// ```
///
/// `cache = true` selects the in-memory backend, `cache = false` disables
/// caching.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCacheConfig")]
pub struct CacheConfig {
    #[serde(flatten)]
    pub backend: CacheBackend,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCacheConfig {
    Toggle(bool),
    Backend(CacheBackend),
}

impl From<RawCacheConfig> for CacheConfig {
    fn from(raw: RawCacheConfig) -> Self {
        let backend = match raw {
            RawCacheConfig::Toggle(true) => CacheBackend::Memory,
            RawCacheConfig::Toggle(false) => CacheBackend::Disabled,
            RawCacheConfig::Backend(backend) => backend,
        };
        Self { backend }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
        }
    }
}

impl CacheConfig {
    /// A file-backed configuration rooted at `root`.
    pub fn file(root: impl Into<PathBuf>) -> Self {
        Self {
            backend: CacheBackend::File { root: root.into() },
        }
    }

    /// A configuration with caching turned off.
    pub fn disabled() -> Self {
        Self {
            backend: CacheBackend::Disabled,
        }
    }

    /// Open the configured backend.
    pub fn open(&self) -> CacheResult<Arc<dyn CacheStore>> {
        let store: Arc<dyn CacheStore> = match &self.backend {
            CacheBackend::Memory => Arc::new(InMemoryCache::new()),
            CacheBackend::File { root } => Arc::new(FileCache::open(root.clone())?),
            CacheBackend::Disabled => Arc::new(NullCache),
        };
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_types::{CacheKey, EntityType};

    #[derive(Deserialize)]
    struct Wrapper {
        cache: CacheConfig,
    }

    fn parse(toml_src: &str) -> CacheConfig {
        toml::from_str::<Wrapper>(toml_src).unwrap().cache
    }

    #[test]
    fn default_is_memory() {
        assert_eq!(CacheConfig::default().backend, CacheBackend::Memory);
    }

    #[test]
    fn boolean_toggle() {
        assert_eq!(parse("cache = true").backend, CacheBackend::Memory);
        assert_eq!(parse("cache = false").backend, CacheBackend::Disabled);
    }

    #[test]
    fn tagged_backends() {
        assert_eq!(
            parse("[cache]\ntype = \"memory\"").backend,
            CacheBackend::Memory
        );
        assert_eq!(
            parse("[cache]\ntype = \"file\"\nroot = \"cache/uuid\"").backend,
            CacheBackend::File {
                root: PathBuf::from("cache/uuid")
            }
        );
        assert_eq!(
            parse("[cache]\ntype = \"disabled\"").backend,
            CacheBackend::Disabled
        );
    }

    #[test]
    fn open_disabled_drops_writes() {
        let store = CacheConfig::disabled().open().unwrap();
        let key = CacheKey::new(EntityType::Page, "test-a");
        assert!(!store.set(&key, "a").unwrap());
    }

    #[test]
    fn open_file_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("uuid");
        let store = CacheConfig::file(&root).open().unwrap();
        assert!(root.is_dir());

        let key = CacheKey::new(EntityType::Page, "test-a");
        assert!(store.set(&key, "a").unwrap());
        assert!(store.exists(&key).unwrap());
    }
}
