//! Content-tree boundary for Tether.
//!
//! The resolver does not own content. It consumes a tree through the
//! [`ContentTree`] trait: enumerate pages, files, users and field entries,
//! and read or write the identifier attribute stored on an object. This
//! crate defines that boundary and ships an in-memory tree used by tests and
//! the command-line tool.
//!
//! # Modules
//!
//! - [`model`]: [`Model`], a non-owning locator for one content object
//! - [`collection`]: [`Models`], the candidate set used for traversal
//! - [`traits`]: The [`ContentTree`] trait and [`UuidWrite`] outcome
//! - [`auth`]: [`AuthContext`] and the scoped [`Elevation`] capability
//! - [`props`]: Serializable tree description ([`ContentProps`])
//! - [`memory`]: [`InMemoryContentTree`]

pub mod auth;
pub mod collection;
pub mod error;
pub mod memory;
pub mod model;
pub mod props;
pub mod traits;

pub use auth::{AuthContext, Elevation, SYSTEM_ACTOR};
pub use collection::Models;
pub use error::{ContentError, ContentResult};
pub use memory::{InMemoryContentTree, StorageMode};
pub use model::Model;
pub use props::{ContentProps, EntryProps, FileProps, HolderProps, PageProps, SiteProps, UserProps};
pub use traits::{ContentTree, UuidWrite, UUID_FIELD};
