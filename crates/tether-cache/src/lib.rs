//! Lookup-cache backends for Tether.
//!
//! The identifier resolver keeps a side cache from [`CacheKey`] to a
//! canonical re-derivation string. The cache is soft state: it may be empty,
//! stale, or unreachable, and callers must never treat it as authoritative.
//! This crate only provides the key-value storage; the resolver decides what
//! goes in it.
//!
//! # Storage Backends
//!
//! All backends implement the [`CacheStore`] trait:
//!
//! - [`InMemoryCache`] -- `HashMap`-based store for tests and single processes
//! - [`FileCache`] -- one file per key, the key shard becoming a directory
//! - [`NullCache`] -- caching disabled: every read misses, every write is dropped
//!
//! [`CacheConfig`] selects and opens a backend from configuration.

pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod null;
pub mod traits;

pub use config::{CacheBackend, CacheConfig};
pub use error::{CacheError, CacheResult};
pub use file::FileCache;
pub use memory::InMemoryCache;
pub use null::NullCache;
pub use traits::CacheStore;

pub use tether_types::CacheKey;
