use std::path::Path;

use serde::{Deserialize, Serialize};
use tether_cache::CacheConfig;

use crate::error::{ResolveError, ResolveResult};

/// Configuration for a [`crate::Resolver`].
///
/// ```toml
/// max_parent_depth = 16
///
/// [cache]
/// type = "file"
/// root = ".tether/cache"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetherConfig {
    /// Lookup cache backend.
    pub cache: CacheConfig,
    /// How many compound parents a cached value may chain through before
    /// the lookup gives up and reports "not found".
    pub max_parent_depth: usize,
}

impl Default for TetherConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            max_parent_depth: 16,
        }
    }
}

impl TetherConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(src: &str) -> ResolveResult<Self> {
        toml::from_str(src).map_err(|e| ResolveError::Config(e.to_string()))
    }

    /// Load a TOML file.
    pub fn load(path: &Path) -> ResolveResult<Self> {
        let src = std::fs::read_to_string(path)?;
        Self::from_toml_str(&src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tether_cache::CacheBackend;

    #[test]
    fn default_config() {
        let c = TetherConfig::default();
        assert_eq!(c.cache.backend, CacheBackend::Memory);
        assert_eq!(c.max_parent_depth, 16);
    }

    #[test]
    fn empty_document_uses_defaults() {
        assert_eq!(TetherConfig::from_toml_str("").unwrap(), TetherConfig::default());
    }

    #[test]
    fn file_cache_config() {
        let c = TetherConfig::from_toml_str(
            "max_parent_depth = 4\n[cache]\ntype = \"file\"\nroot = \".tether/cache\"\n",
        )
        .unwrap();
        assert_eq!(c.max_parent_depth, 4);
        assert_eq!(
            c.cache.backend,
            CacheBackend::File {
                root: PathBuf::from(".tether/cache")
            }
        );
    }

    #[test]
    fn cache_toggle() {
        let c = TetherConfig::from_toml_str("cache = false").unwrap();
        assert_eq!(c.cache.backend, CacheBackend::Disabled);
    }

    #[test]
    fn invalid_document() {
        assert!(matches!(
            TetherConfig::from_toml_str("[cache]\ntype = \"redis\""),
            Err(ResolveError::Config(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tether.toml");
        std::fs::write(&path, "cache = true").unwrap();
        assert_eq!(TetherConfig::load(&path).unwrap().cache.backend, CacheBackend::Memory);
    }
}
