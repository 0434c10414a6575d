use std::path::PathBuf;

/// Errors from cache store operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The key cannot be mapped onto this backend (e.g. a `..` segment in a
    /// file-backed cache).
    #[error("invalid cache key {key}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// A stored entry could not be decoded.
    #[error("corrupt cache entry at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// An internal lock was poisoned by a panicking writer.
    #[error("cache lock poisoned: {0}")]
    Poisoned(String),

    /// I/O error from the underlying storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
