use thiserror::Error;

/// Errors surfaced by the resolver.
///
/// Cache I/O failures never come out of lookups: a failed read is
/// a miss and a failed write is a skipped optimization. [`ResolveError::Cache`]
/// only comes out of opening a configured cache.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid identifier: {0}")]
    Identifier(#[from] tether_types::TypeError),

    #[error("content error: {0}")]
    Content(#[from] tether_content::ContentError),

    #[error("cache error: {0}")]
    Cache(#[from] tether_cache::CacheError),

    /// A cache value was requested for an identifier with no live object.
    #[error("{0} does not resolve to a content object")]
    Unresolved(String),

    #[error("invalid cache value {value:?}: {reason}")]
    InvalidCacheValue { value: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ResolveResult<T> = Result<T, ResolveError>;
