use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityType;
use crate::identifier::Identifier;

/// Sharded lookup-cache key: `{type}/{host[0:2]}/{host[2:]}`.
///
/// The first two characters of the host become their own segment so that
/// file-backed caches spread entries over many small directories instead of
/// one huge one.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a kind and host.
    pub fn new(kind: EntityType, host: &str) -> Self {
        // split on a char boundary so non-ASCII hosts cannot panic
        let split = host
            .char_indices()
            .nth(2)
            .map(|(i, _)| i)
            .unwrap_or(host.len());
        let (shard, rest) = host.split_at(split);
        Self(format!("{kind}/{shard}/{rest}"))
    }

    /// The key for an identifier. Path segments never take part in the key.
    pub fn for_identifier(id: &Identifier) -> Self {
        Self::new(id.kind(), id.host())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key's `/`-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Identifier> for CacheKey {
    fn from(id: &Identifier) -> Self {
        Self::for_identifier(id)
    }
}
