//! The [`ContentTree`] trait: everything the resolver needs from a content
//! store.
//!
//! Any backend (in-memory, filesystem, database) implements this trait. The
//! resolver only enumerates objects and reads or writes their identifier
//! attribute; it never mutates anything else.

use tether_types::EntityType;

use crate::auth::Elevation;
use crate::collection::Models;
use crate::error::ContentResult;
use crate::model::Model;

/// Content attribute that carries an object's identifier.
pub const UUID_FIELD: &str = "uuid";

/// Outcome of [`ContentTree::write_uuid`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UuidWrite {
    /// The token was written and is now the object's identifier.
    Persisted(String),
    /// The object already had an identifier; it was kept and the new token
    /// was not written.
    Existing(String),
    /// The backend has no storage target and dropped the write.
    Discarded,
}

/// Read access to a content tree plus the identifier-attribute write.
pub trait ContentTree: Send + Sync {
    /// A page by its slug path.
    ///
    /// Returns `Ok(None)` if no page lives at `id`.
    fn page(&self, id: &str) -> ContentResult<Option<Model>>;

    /// A user by id.
    fn user(&self, id: &str) -> ContentResult<Option<Model>>;

    /// All users.
    fn users(&self) -> ContentResult<Models>;

    /// Direct child pages of the site or of a page.
    fn children(&self, parent: &Model) -> ContentResult<Models>;

    /// Every page of the site, depth-first, parents before children.
    fn index(&self) -> ContentResult<Models>;

    /// Files attached to the site, a page, or a user.
    fn files(&self, parent: &Model) -> ContentResult<Models>;

    /// One file of `parent` by filename.
    fn file(&self, parent: &Model, filename: &str) -> ContentResult<Option<Model>> {
        Ok(self.files(parent)?.find(|f| f.filename() == Some(filename)).cloned())
    }

    /// One block or structure entry of `parent` by field name and id.
    fn entry(
        &self,
        kind: EntityType,
        parent: &Model,
        field: &str,
        id: &str,
    ) -> ContentResult<Option<Model>>;

    /// Flat index of every block or structure entry in the tree.
    fn entries(&self, kind: EntityType) -> ContentResult<Models>;

    /// The identifier attribute stored on `model`.
    ///
    /// Returns `Ok(None)` when the attribute is missing or empty.
    fn uuid(&self, model: &Model) -> ContentResult<Option<String>>;

    /// Persist `uuid` as the identifier attribute of `model` unless it
    /// already has one.
    ///
    /// The check and the write happen atomically, so two concurrent callers
    /// agree on a single surviving identifier. The write runs under
    /// `elevation`, which must have been granted by the tree's own auth
    /// context.
    fn write_uuid(
        &self,
        model: &Model,
        uuid: &str,
        elevation: &Elevation<'_>,
    ) -> ContentResult<UuidWrite>;
}
