use thiserror::Error;

/// Errors produced while parsing identifiers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid URL scheme: {scheme}")]
    InvalidScheme { scheme: String },

    #[error("malformed identifier: {input}: {reason}")]
    Malformed { input: String, reason: String },
}
