//! Identifier resolution for Tether.
//!
//! A [`Resolver`] turns an identifier into the content object it names, and
//! a content object into its identifier, minting and persisting one if the
//! object has none yet. Lookups go cache-first; on a miss the live content
//! tree is traversed and the hit is written back to the cache. The cache is
//! never trusted on its own: every cached hit is checked against the
//! object's stored identifier before it is returned.
//!
//! ```ignore
//! // general usage
//! resolver.lookup(&model)?.to_string();
//! resolver.lookup("page://12345678-90ab-cdef-1234-567890abcdef")?.to_model()?;
//!
//! // cache actions
//! resolver.lookup(&model)?.populate()?;
//! resolver.lookup(&model)?.clear(true)?;
//! resolver.index()?;
//! ```
//!
//! # Modules
//!
//! - [`resolver`]: [`Resolver`], the dependency-injected entry point
//! - [`lookup`]: [`Lookup`], one identifier being resolved
//! - [`codec`]: [`CachedLocation`], the cache value encoding
//! - [`traversal`]: Candidate collections for the traversal fallback
//! - [`report`]: [`ClearReport`] and [`IndexReport`]
//! - [`config`]: [`TetherConfig`]

pub mod codec;
pub mod config;
pub mod error;
pub mod lookup;
pub mod report;
pub mod resolver;
pub mod traversal;

#[cfg(test)]
mod testing;

pub use codec::CachedLocation;
pub use config::TetherConfig;
pub use error::{ResolveError, ResolveResult};
pub use lookup::Lookup;
pub use report::{ClearReport, IndexFailure, IndexReport};
pub use resolver::{Resolver, Seed};

// Re-export the types callers need alongside the resolver
pub use tether_content::{Model, Models};
pub use tether_types::{CacheKey, EntityType, Identifier};
