use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tether_types::CacheKey;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{CacheError, CacheResult};
use crate::traits::CacheStore;

/// Extension of every entry file. Keeps an empty final key segment
/// (`page/ab/`) mappable to a file name.
const ENTRY_EXTENSION: &str = "cache";

/// File-backed lookup cache.
///
/// Each key maps to one file below `root`: every `/`-separated key segment
/// but the last becomes a directory, the last becomes `{segment}.cache`.
/// The two-character shard of a [`CacheKey`] therefore becomes its own
/// directory (`page/te/st-b.cache`). Writes go through a temporary file in
/// the target directory and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Open (and create if needed) a file cache rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> CacheResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "file cache opened");
        Ok(Self { root })
    }

    /// The cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file an entry for `key` lives in.
    pub fn entry_path(&self, key: &CacheKey) -> CacheResult<PathBuf> {
        let segments: Vec<&str> = key.segments().collect();
        let Some((last, dirs)) = segments.split_last() else {
            return Err(invalid(key, "empty key"));
        };

        let mut path = self.root.clone();
        for dir in dirs {
            // only the host-less site key has an empty shard
            if dir.is_empty() {
                path.push("_");
                continue;
            }
            if *dir == "." || *dir == ".." || dir.contains('\\') {
                return Err(invalid(key, &format!("unusable directory segment {dir:?}")));
            }
            path.push(dir);
        }
        if *last == "." || *last == ".." || last.contains('\\') {
            return Err(invalid(key, &format!("unusable file segment {last:?}")));
        }
        path.push(format!("{last}.{ENTRY_EXTENSION}"));
        Ok(path)
    }

    /// Number of entries on disk.
    pub fn len(&self) -> usize {
        self.entry_files().count()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entry_files().next().is_none()
    }

    fn entry_files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable cache path");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            // `.cache` alone has no extension as far as `Path` is concerned
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| name.strip_suffix(ENTRY_EXTENSION))
                    .is_some_and(|stem| stem.ends_with('.'))
            })
    }
}

fn invalid(key: &CacheKey, reason: &str) -> CacheError {
    CacheError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &CacheKey) -> CacheResult<Option<String>> {
        let path = self.entry_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| CacheError::Corrupt {
                    path,
                    reason: e.to_string(),
                }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &CacheKey, value: &str) -> CacheResult<bool> {
        let path = self.entry_path(key)?;
        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(&path).map_err(|e| CacheError::Io(e.error))?;
        Ok(true)
    }

    fn remove(&self, key: &CacheKey) -> CacheResult<bool> {
        let path = self.entry_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn flush(&self) -> CacheResult<()> {
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
        }
        debug!(root = %self.root.display(), "file cache flushed");
        Ok(())
    }

    fn exists(&self, key: &CacheKey) -> CacheResult<bool> {
        Ok(self.entry_path(key)?.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_types::EntityType;

    fn temp_cache() -> (tempfile::TempDir, FileCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::open(dir.path().join("uuid")).unwrap();
        (dir, cache)
    }

    #[test]
    fn shard_becomes_directory() {
        let (_dir, cache) = temp_cache();
        let key = CacheKey::new(EntityType::Page, "test-b");
        cache.set(&key, "a/b").unwrap();

        let expected = cache.root().join("page").join("te").join("st-b.cache");
        assert_eq!(cache.entry_path(&key).unwrap(), expected);
        assert!(expected.is_file());
    }

    #[test]
    fn set_get_remove() {
        let (_dir, cache) = temp_cache();
        let key = CacheKey::new(EntityType::File, "file-a");

        assert!(cache.get(&key).unwrap().is_none());
        assert!(cache.set(&key, "page://page-a/test.jpg").unwrap());
        assert!(cache.exists(&key).unwrap());
        assert_eq!(
            cache.get(&key).unwrap().as_deref(),
            Some("page://page-a/test.jpg")
        );

        assert!(cache.remove(&key).unwrap());
        assert!(!cache.remove(&key).unwrap());
        assert!(!cache.exists(&key).unwrap());
    }

    #[test]
    fn overwrite_replaces_value() {
        let (_dir, cache) = temp_cache();
        let key = CacheKey::new(EntityType::Page, "test-a");
        cache.set(&key, "a").unwrap();
        cache.set(&key, "moved/a").unwrap();
        assert_eq!(cache.get(&key).unwrap().as_deref(), Some("moved/a"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn short_host_maps_to_extension_only_file() {
        let (_dir, cache) = temp_cache();
        let short = CacheKey::new(EntityType::User, "ab");
        let underscore = CacheKey::new(EntityType::User, "ab_");
        cache.set(&short, "ab").unwrap();
        cache.set(&underscore, "ab_").unwrap();
        assert_eq!(cache.get(&short).unwrap().as_deref(), Some("ab"));
        assert_eq!(cache.get(&underscore).unwrap().as_deref(), Some("ab_"));
    }

    #[test]
    fn extension_only_entries_are_counted() {
        let (_dir, cache) = temp_cache();
        cache.set(&CacheKey::new(EntityType::Page, "ab"), "a").unwrap();
        cache.set(&CacheKey::new(EntityType::Page, "test-a"), "b").unwrap();
        cache.set(&CacheKey::new(EntityType::Site, ""), "").unwrap();
        assert_eq!(cache.len(), 3);
        assert!(!cache.is_empty());

        cache.remove(&CacheKey::new(EntityType::Page, "test-a")).unwrap();
        cache.remove(&CacheKey::new(EntityType::Site, "")).unwrap();
        assert_eq!(cache.len(), 1);
        assert!(!cache.is_empty());
    }

    #[test]
    fn site_key_has_a_file() {
        let (_dir, cache) = temp_cache();
        let key = CacheKey::new(EntityType::Site, "");
        assert!(cache.set(&key, "").unwrap());
        assert_eq!(cache.get(&key).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn dot_segments_are_rejected() {
        let (_dir, cache) = temp_cache();
        let key = CacheKey::new(EntityType::Page, "..");
        assert!(matches!(
            cache.set(&key, "x"),
            Err(CacheError::InvalidKey { .. })
        ));
        assert!(cache.get(&key).is_err());
    }

    #[test]
    fn flush_removes_everything() {
        let (_dir, cache) = temp_cache();
        cache.set(&CacheKey::new(EntityType::Page, "test-a"), "a").unwrap();
        cache.set(&CacheKey::new(EntityType::File, "file-a"), "site://a.jpg").unwrap();
        assert_eq!(cache.len(), 2);

        cache.flush().unwrap();
        assert!(cache.is_empty());
        assert!(cache.root().is_dir());
    }

    #[test]
    fn reopen_sees_existing_entries() {
        let (dir, cache) = temp_cache();
        let key = CacheKey::new(EntityType::Page, "test-a");
        cache.set(&key, "a").unwrap();

        let reopened = FileCache::open(dir.path().join("uuid")).unwrap();
        assert_eq!(reopened.get(&key).unwrap().as_deref(), Some("a"));
    }
}
