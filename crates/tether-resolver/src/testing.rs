//! Shared fixtures for resolver tests.

use std::io;
use std::sync::Arc;

use serde_json::json;
use tether_cache::{CacheError, CacheResult, CacheStore, InMemoryCache};
use tether_content::InMemoryContentTree;
use tether_types::CacheKey;

use crate::resolver::Resolver;

pub(crate) struct Harness {
    pub resolver: Resolver,
    pub cache: Arc<InMemoryCache>,
    pub tree: Arc<InMemoryContentTree>,
}

/// A resolver over `value` with an in-memory cache.
pub(crate) fn harness(value: serde_json::Value) -> Harness {
    let tree = Arc::new(InMemoryContentTree::from_json(value).unwrap());
    let cache = Arc::new(InMemoryCache::new());
    let resolver = Resolver::new(tree.clone(), cache.clone(), tree.auth());
    Harness {
        resolver,
        cache,
        tree,
    }
}

pub(crate) fn with_cache(tree: Arc<InMemoryContentTree>, cache: Arc<dyn CacheStore>) -> Resolver {
    let auth = tree.auth();
    Resolver::new(tree, cache, auth)
}

/// One page with a file, one site file, one user file.
pub(crate) fn index_fixture() -> InMemoryContentTree {
    InMemoryContentTree::from_json(json!({
        "site": {
            "files": [ { "filename": "test.jpg", "content": { "uuid": "file-site-a" } } ],
            "children": [
                {
                    "slug": "a",
                    "content": { "uuid": "page-a" },
                    "files": [ { "filename": "test.jpg", "content": { "uuid": "file-a" } } ]
                }
            ]
        },
        "users": [
            {
                "id": "test",
                "files": [ { "filename": "test.jpg", "content": { "uuid": "file-user-a" } } ]
            }
        ]
    }))
    .unwrap()
}

/// A cache whose every call fails.
pub(crate) struct FailingCache;

fn offline() -> CacheError {
    CacheError::Io(io::Error::new(io::ErrorKind::Other, "cache offline"))
}

impl CacheStore for FailingCache {
    fn get(&self, _key: &CacheKey) -> CacheResult<Option<String>> {
        Err(offline())
    }

    fn set(&self, _key: &CacheKey, _value: &str) -> CacheResult<bool> {
        Err(offline())
    }

    fn remove(&self, _key: &CacheKey) -> CacheResult<bool> {
        Err(offline())
    }

    fn flush(&self) -> CacheResult<()> {
        Err(offline())
    }
}
