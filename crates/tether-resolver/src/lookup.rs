use std::fmt;

use tether_content::{Model, Models};
use tether_types::{CacheKey, EntityType, Identifier};
use tracing::{debug, warn};

use crate::codec::CachedLocation;
use crate::error::{ResolveError, ResolveResult};
use crate::report::ClearReport;
use crate::resolver::Resolver;
use crate::traversal;

/// One identifier being resolved.
///
/// Created by [`Resolver::lookup`] or [`Resolver::lookup_in`]. A lookup
/// started from a content object is already bound to it; one started from a
/// string binds on the first successful [`Lookup::to_model`].
pub struct Lookup<'r> {
    resolver: &'r Resolver,
    id: Identifier,
    model: Option<Model>,
    collection: Option<Models>,
}

impl<'r> Lookup<'r> {
    pub(crate) fn new(
        resolver: &'r Resolver,
        id: Identifier,
        model: Option<Model>,
        collection: Option<Models>,
    ) -> Self {
        Self {
            resolver,
            id,
            model,
            collection,
        }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.id
    }

    pub fn kind(&self) -> EntityType {
        self.id.kind()
    }

    /// The cache key for this identifier. Any path is ignored.
    pub fn key(&self) -> CacheKey {
        CacheKey::for_identifier(&self.id)
    }

    /// The bound object, without resolving.
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// Resolve to the content object this identifier names.
    ///
    /// Goes cache-first, then falls back to traversing the live tree (the
    /// scoped collection first, if any). A traversal hit is written back to
    /// the cache. `Ok(None)` means the identifier names nothing.
    pub fn to_model(&mut self) -> ResolveResult<Option<Model>> {
        self.resolve(0)
    }

    fn resolve(&mut self, depth: usize) -> ResolveResult<Option<Model>> {
        if let Some(model) = &self.model {
            return Ok(Some(model.clone()));
        }

        let found = match self.id.kind() {
            EntityType::Site => Some(Model::Site),
            EntityType::User => self.resolver.content().user(self.id.host())?,
            _ => {
                if let Some(model) = self.find_from_cache(depth) {
                    Some(model)
                } else if let Some(model) = self.find_from_index()? {
                    self.model = Some(model.clone());
                    self.lazy_populate();
                    Some(model)
                } else {
                    None
                }
            }
        };

        match &found {
            Some(model) => self.model = Some(model.clone()),
            None => debug!(id = %self.id, "identifier names nothing"),
        }
        Ok(found)
    }

    /// Follow the cached value, if any. Every failure along the way is a
    /// miss: the cache is only a shortcut.
    fn find_from_cache(&self, depth: usize) -> Option<Model> {
        let key = self.key();
        let Some(value) = self.resolver.cache_get(&key) else {
            debug!(key = %key, "cache miss");
            return None;
        };

        match self.follow(&value, depth) {
            Ok(Some(model)) => {
                debug!(key = %key, model = %model, "cache hit");
                Some(model)
            }
            Ok(None) => {
                debug!(key = %key, value = %value, "stale cache entry");
                None
            }
            Err(e) => {
                warn!(key = %key, value = %value, error = %e, "unusable cache entry; ignoring");
                None
            }
        }
    }

    fn follow(&self, value: &str, depth: usize) -> ResolveResult<Option<Model>> {
        let kind = self.kind();
        let content = self.resolver.content();

        let candidate = match CachedLocation::decode(kind, value)? {
            CachedLocation::Path(path) => match kind {
                EntityType::Page => content.page(&path)?,
                _ => None,
            },
            CachedLocation::File { parent, filename } => {
                match self.resolve_parent(parent, depth) {
                    Some(parent) => content.file(&parent, &filename)?,
                    None => None,
                }
            }
            CachedLocation::Entry { parent, field, id } => {
                match self.resolve_parent(parent, depth) {
                    Some(parent) => content.entry(kind, &parent, &field, &id)?,
                    None => None,
                }
            }
        };

        // the entry may point at an object that no longer carries this
        // identifier
        let Some(model) = candidate else {
            return Ok(None);
        };
        if model.kind() != kind {
            return Ok(None);
        }
        let stored = self.resolver.id(&model)?;
        Ok((stored.as_deref() == Some(self.id.host())).then_some(model))
    }

    fn resolve_parent(&self, parent: Identifier, depth: usize) -> Option<Model> {
        if depth >= self.resolver.max_parent_depth() {
            warn!(
                id = %self.id,
                parent = %parent,
                depth,
                "parent chain too deep; giving up"
            );
            return None;
        }

        let mut lookup = Lookup::new(self.resolver, parent, None, None);
        match lookup.resolve(depth + 1) {
            Ok(model) => model,
            Err(e) => {
                debug!(parent = %lookup.id, error = %e, "parent did not resolve");
                None
            }
        }
    }

    fn find_from_index(&self) -> ResolveResult<Option<Model>> {
        let content = self.resolver.content();
        let kind = self.kind();
        let host = self.id.host();

        if let Some(scoped) = &self.collection {
            if let Some(model) = traversal::find(content, kind, host, scoped)? {
                return Ok(Some(model));
            }
        }

        let mut candidates = traversal::collection(content, kind)?;
        if let Some(scoped) = &self.collection {
            candidates = candidates.without(scoped);
        }
        Ok(traversal::find(content, kind, host, &candidates)?)
    }

    fn lazy_populate(&mut self) {
        match self.populate() {
            Ok(true) => debug!(id = %self.id, "cache entry written back"),
            Ok(false) => {}
            Err(e) => warn!(id = %self.id, error = %e, "failed to write back cache entry"),
        }
    }

    /// The value to store in the cache for this identifier.
    ///
    /// Compound values embed the parent's identifier, which is minted if the
    /// parent has none yet.
    pub fn value(&mut self) -> ResolveResult<String> {
        let model = self
            .to_model()?
            .ok_or_else(|| ResolveError::Unresolved(self.id.to_string()))?;
        Ok(self.location(&model)?.encode())
    }

    fn location(&self, model: &Model) -> ResolveResult<CachedLocation> {
        Ok(match model {
            Model::Site | Model::Page { .. } | Model::User { .. } => {
                CachedLocation::Path(model.id())
            }
            Model::File { parent, filename } => CachedLocation::File {
                parent: self.resolver.identifier_for(parent)?,
                filename: filename.clone(),
            },
            Model::Block { parent, field, id } | Model::Struct { parent, field, id } => {
                CachedLocation::Entry {
                    parent: self.resolver.identifier_for(parent)?,
                    field: field.clone(),
                    id: id.clone(),
                }
            }
        })
    }

    /// Write this identifier's entry to the cache.
    ///
    /// Returns whether the cache kept it; a failing cache yields `false`.
    /// Errors only if the identifier can't be resolved or its value built.
    pub fn populate(&mut self) -> ResolveResult<bool> {
        let value = self.value()?;
        Ok(self.resolver.cache_set(&self.key(), &value))
    }

    /// Remove this identifier's entry from the cache.
    ///
    /// With `recursive` on a page, the entries of all descendant pages are
    /// removed as well (deepest first, over the live child tree).
    pub fn clear(&mut self, recursive: bool) -> ResolveResult<ClearReport> {
        let mut report = ClearReport::default();
        if recursive && self.kind() == EntityType::Page {
            if let Some(page) = self.to_model()? {
                self.resolver.clear_descendants(&page, &mut report)?;
            }
        }
        self.resolver.remove_entry(&self.key(), &mut report);
        Ok(report)
    }
}

impl fmt::Display for Lookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.fmt(f)
    }
}

impl fmt::Debug for Lookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lookup")
            .field("id", &self.id)
            .field("model", &self.model)
            .field("scoped", &self.collection.is_some())
            .finish()
    }
}
