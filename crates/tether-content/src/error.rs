//! Error types for content-tree operations.

use thiserror::Error;

/// Errors that can occur while reading or writing the content tree.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The object is not part of the tree.
    #[error("content object not found: {model}")]
    NotFound { model: String },

    /// The acting user may not perform the write.
    #[error("permission denied for actor {actor:?}: {action}")]
    PermissionDenied {
        actor: Option<String>,
        action: String,
    },

    /// The tree description could not be parsed or rendered.
    #[error("invalid content description: {0}")]
    InvalidDescription(#[from] serde_json::Error),

    /// An internal lock was poisoned by a panicking writer.
    #[error("content lock poisoned: {0}")]
    Poisoned(String),

    /// I/O error while loading or saving the tree.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for content operations.
pub type ContentResult<T> = std::result::Result<T, ContentError>;
