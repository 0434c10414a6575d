//! Cache value encoding.
//!
//! The value stored at a [`tether_types::CacheKey`] says how to find the
//! object again without the cache:
//!
//! | type                | value                                   |
//! |---------------------|-----------------------------------------|
//! | site, page, user    | the object's own id / tree path         |
//! | file                | `<parent-identifier>/<filename>`        |
//! | block, struct       | `<parent-identifier>/<field>/<entry-id>` |
//!
//! Compound values embed the parent's full identifier string, so decoding
//! one means resolving the parent first.

use tether_types::{EntityType, Identifier};

use crate::error::{ResolveError, ResolveResult};

/// A decoded cache value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CachedLocation {
    /// Tree path or own id of a site, page or user.
    Path(String),
    /// A file below the object named by `parent`.
    File { parent: Identifier, filename: String },
    /// A block or structure entry in `field` of the object named by `parent`.
    Entry {
        parent: Identifier,
        field: String,
        id: String,
    },
}

impl CachedLocation {
    /// Decode the value cached for an identifier of type `kind`.
    pub fn decode(kind: EntityType, value: &str) -> ResolveResult<Self> {
        if !kind.is_compound() {
            return Ok(CachedLocation::Path(value.to_string()));
        }

        let id = parse_compound(value)?;
        match (kind, id.path()) {
            (EntityType::File, [filename]) => Ok(CachedLocation::File {
                filename: filename.clone(),
                parent: id.without_path(),
            }),
            (EntityType::File, _) => Err(invalid(value, "expected <parent>/<filename>")),
            (_, [field, entry]) => Ok(CachedLocation::Entry {
                field: field.clone(),
                id: entry.clone(),
                parent: id.without_path(),
            }),
            _ => Err(invalid(value, "expected <parent>/<field>/<id>")),
        }
    }

    /// Render the value as stored in the cache.
    pub fn encode(&self) -> String {
        match self {
            CachedLocation::Path(path) => path.clone(),
            CachedLocation::File { parent, filename } => {
                parent.clone().with_path([filename.as_str()]).to_string()
            }
            CachedLocation::Entry { parent, field, id } => parent
                .clone()
                .with_path([field.as_str(), id.as_str()])
                .to_string(),
        }
    }

    /// The parent identifier of a compound value.
    pub fn parent(&self) -> Option<&Identifier> {
        match self {
            CachedLocation::Path(_) => None,
            CachedLocation::File { parent, .. } | CachedLocation::Entry { parent, .. } => {
                Some(parent)
            }
        }
    }
}

fn parse_compound(value: &str) -> ResolveResult<Identifier> {
    Identifier::parse(value).map_err(|e| invalid(value, &e.to_string()))
}

fn invalid(value: &str, reason: &str) -> ResolveError {
    ResolveError::InvalidCacheValue {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
