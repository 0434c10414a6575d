//! Locators for content objects.
//!
//! A [`Model`] names one object in the content tree without owning it: the
//! tree owns the content, a `Model` only says where to find it. Two models
//! are equal when they locate the same object.

use std::fmt;

use serde::{Deserialize, Serialize};
use tether_types::EntityType;

/// A non-owning reference to a content object.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Model {
    /// The singleton site.
    Site,

    /// A page, located by its slug path from the site root (e.g. `a/b`).
    Page { id: String },

    /// A file attached to the site, a page, or a user.
    File {
        parent: Box<Model>,
        filename: String,
    },

    /// A user account.
    User { id: String },

    /// A block in the blocks field `field` of `parent`.
    Block {
        parent: Box<Model>,
        field: String,
        id: String,
    },

    /// An entry in the structure field `field` of `parent`.
    Struct {
        parent: Box<Model>,
        field: String,
        id: String,
    },
}

impl Model {
    /// A page located by its slug path.
    pub fn page(id: impl Into<String>) -> Self {
        Model::Page { id: id.into() }
    }

    /// A user located by id.
    pub fn user(id: impl Into<String>) -> Self {
        Model::User { id: id.into() }
    }

    /// A file of `parent`.
    pub fn file(parent: Model, filename: impl Into<String>) -> Self {
        Model::File {
            parent: Box::new(parent),
            filename: filename.into(),
        }
    }

    /// A block in `field` of `parent`.
    pub fn block(parent: Model, field: impl Into<String>, id: impl Into<String>) -> Self {
        Model::Block {
            parent: Box::new(parent),
            field: field.into(),
            id: id.into(),
        }
    }

    /// A structure entry in `field` of `parent`.
    pub fn structure(parent: Model, field: impl Into<String>, id: impl Into<String>) -> Self {
        Model::Struct {
            parent: Box::new(parent),
            field: field.into(),
            id: id.into(),
        }
    }

    /// The entity type of the located object.
    pub fn kind(&self) -> EntityType {
        match self {
            Model::Site => EntityType::Site,
            Model::Page { .. } => EntityType::Page,
            Model::File { .. } => EntityType::File,
            Model::User { .. } => EntityType::User,
            Model::Block { .. } => EntityType::Block,
            Model::Struct { .. } => EntityType::Struct,
        }
    }

    /// The object's own id: empty for the site, the slug path for pages,
    /// `{parent-id}/{filename}` for files, and the own id for users, blocks
    /// and structure entries.
    pub fn id(&self) -> String {
        match self {
            Model::Site => String::new(),
            Model::Page { id } | Model::User { id } => id.clone(),
            Model::File { parent, filename } => {
                let parent_id = parent.id();
                if parent_id.is_empty() {
                    filename.clone()
                } else {
                    format!("{parent_id}/{filename}")
                }
            }
            Model::Block { id, .. } | Model::Struct { id, .. } => id.clone(),
        }
    }

    /// The object this one is attached to, if any.
    ///
    /// Pages report no parent here: their position is carried by the slug
    /// path.
    pub fn parent(&self) -> Option<&Model> {
        match self {
            Model::File { parent, .. }
            | Model::Block { parent, .. }
            | Model::Struct { parent, .. } => Some(parent),
            Model::Site | Model::Page { .. } | Model::User { .. } => None,
        }
    }

    /// The filename of a file.
    pub fn filename(&self) -> Option<&str> {
        match self {
            Model::File { filename, .. } => Some(filename),
            _ => None,
        }
    }

    /// The field name of a block or structure entry.
    pub fn field(&self) -> Option<&str> {
        match self {
            Model::Block { field, .. } | Model::Struct { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Nesting depth: 0 for site, pages and users, one more than the parent
    /// for attached objects.
    pub fn depth(&self) -> usize {
        self.parent().map(|p| p.depth() + 1).unwrap_or(0)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Site => write!(f, "site"),
            Model::Block { parent, field, id } | Model::Struct { parent, field, id } => {
                write!(f, "{} {id} in {parent}/{field}", self.kind())
            }
            _ => write!(f, "{} {}", self.kind(), self.id()),
        }
    }
}
