//! Foundation types for Tether.
//!
//! Tether connects opaque, stable identifiers to content objects that are
//! otherwise only addressable by their (mutable) position in a content tree.
//! This crate holds the pieces every other Tether crate agrees on: the closed
//! set of entity types, the `scheme://host[/path...]` wire format, and the
//! sharded cache key derived from an identifier.
//!
//! # Key Types
//!
//! - [`EntityType`]: The closed set of addressable content kinds
//! - [`Identifier`]: Parsed `scheme://host[/path...]` value
//! - [`CacheKey`]: Sharded lookup key `{type}/{host[0:2]}/{host[2:]}`
//! - [`mint`] / [`is_uuid_v4`]: UUIDv4 token generation and validation

pub mod entity;
pub mod error;
pub mod identifier;
pub mod key;
pub mod token;

pub use entity::EntityType;
pub use error::TypeError;
pub use identifier::Identifier;
pub use key::CacheKey;
pub use token::{is_uuid_v4, mint};
