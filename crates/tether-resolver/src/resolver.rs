use std::sync::Arc;

use tether_cache::CacheStore;
use tether_content::{AuthContext, ContentTree, Model, Models, UuidWrite};
use tether_types::{CacheKey, EntityType, Identifier};
use tracing::{debug, info, warn};

use crate::config::TetherConfig;
use crate::error::ResolveResult;
use crate::lookup::Lookup;
use crate::report::{ClearReport, IndexFailure, IndexReport};

/// What a lookup starts from: a wire-format string or a content object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Seed {
    Uuid(String),
    Model(Model),
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Seed::Uuid(value.to_string())
    }
}

impl From<String> for Seed {
    fn from(value: String) -> Self {
        Seed::Uuid(value)
    }
}

impl From<&Identifier> for Seed {
    fn from(value: &Identifier) -> Self {
        Seed::Uuid(value.to_string())
    }
}

impl From<Model> for Seed {
    fn from(value: Model) -> Self {
        Seed::Model(value)
    }
}

impl From<&Model> for Seed {
    fn from(value: &Model) -> Self {
        Seed::Model(value.clone())
    }
}

/// Resolves identifiers against a content tree through a lookup cache.
///
/// All collaborators are injected: the content tree that is the ground
/// truth, the cache that is only ever a shortcut, and the auth context that
/// grants the elevation identifier writes run under.
pub struct Resolver {
    content: Arc<dyn ContentTree>,
    cache: Arc<dyn CacheStore>,
    auth: Arc<AuthContext>,
    max_parent_depth: usize,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("max_parent_depth", &self.max_parent_depth)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    pub fn new(
        content: Arc<dyn ContentTree>,
        cache: Arc<dyn CacheStore>,
        auth: Arc<AuthContext>,
    ) -> Self {
        Self {
            content,
            cache,
            auth,
            max_parent_depth: TetherConfig::default().max_parent_depth,
        }
    }

    /// Build a resolver whose cache is opened from `config`.
    pub fn from_config(
        config: &TetherConfig,
        content: Arc<dyn ContentTree>,
        auth: Arc<AuthContext>,
    ) -> ResolveResult<Self> {
        let cache = config.cache.open()?;
        Ok(Self::new(content, cache, auth).with_max_parent_depth(config.max_parent_depth))
    }

    pub fn with_max_parent_depth(mut self, depth: usize) -> Self {
        self.max_parent_depth = depth;
        self
    }

    pub fn max_parent_depth(&self) -> usize {
        self.max_parent_depth
    }

    /// The lookup cache.
    pub fn cache(&self) -> &dyn CacheStore {
        self.cache.as_ref()
    }

    /// The content tree.
    pub fn content(&self) -> &dyn ContentTree {
        self.content.as_ref()
    }

    /// Checks whether `input` looks like an identifier (optionally of
    /// `kind`) rather than a literal tree path.
    pub fn matches(input: &str, kind: Option<EntityType>) -> bool {
        Identifier::matches(input, kind)
    }

    /// Start a lookup from a wire-format string or a content object.
    ///
    /// Starting from a content object is not a pure operation: if the object
    /// has no identifier yet, one is minted and persisted right away (see
    /// [`Resolver::create`]).
    pub fn lookup(&self, seed: impl Into<Seed>) -> ResolveResult<Lookup<'_>> {
        self.start(seed.into(), None)
    }

    /// Like [`Resolver::lookup`], but traversal searches `collection` first
    /// and then the global index without it.
    pub fn lookup_in(
        &self,
        seed: impl Into<Seed>,
        collection: Models,
    ) -> ResolveResult<Lookup<'_>> {
        self.start(seed.into(), Some(collection))
    }

    fn start(&self, seed: Seed, collection: Option<Models>) -> ResolveResult<Lookup<'_>> {
        match seed {
            Seed::Uuid(input) => {
                let id = Identifier::parse(&input)?;
                Ok(Lookup::new(self, id, None, collection))
            }
            Seed::Model(model) => {
                let id = self.identifier_for(&model)?;
                Ok(Lookup::new(self, id, Some(model), collection))
            }
        }
    }

    /// The identifier of `model`, minting one if it has none yet.
    pub fn identifier_for(&self, model: &Model) -> ResolveResult<Identifier> {
        let host = match self.id(model)? {
            Some(host) => host,
            None => self.create(model)?,
        };
        Ok(Identifier::new(model.kind(), host))
    }

    /// The identifier host of `model` without minting: empty for the site,
    /// the own id for users and blocks, the stored identifier attribute for
    /// pages, files and structure entries.
    pub fn id(&self, model: &Model) -> ResolveResult<Option<String>> {
        match model.kind() {
            EntityType::Site => Ok(Some(String::new())),
            kind if kind.uses_content_attribute() => Ok(self.content.uuid(model)?),
            _ => Ok(Some(model.id())),
        }
    }

    /// Mint a UUIDv4 and persist it as the identifier of `model`.
    ///
    /// The write runs under an elevation to the trusted system actor that is
    /// released as soon as the write returns, whether it failed or not. The
    /// acting user of the shared auth context is never changed. If
    /// another caller won the race and the object already has an
    /// identifier, that identifier is returned instead. A backend without a
    /// storage target drops the write and the minted token is returned
    /// as-is.
    pub fn create(&self, model: &Model) -> ResolveResult<String> {
        let token = tether_types::mint();
        let outcome = {
            let elevation = self.auth.elevate();
            self.content.write_uuid(model, &token, &elevation)
        }?;

        match outcome {
            UuidWrite::Persisted(uuid) => {
                info!(model = %model, uuid = %uuid, "minted identifier");
                Ok(uuid)
            }
            UuidWrite::Existing(uuid) => {
                debug!(model = %model, uuid = %uuid, "kept existing identifier");
                Ok(uuid)
            }
            UuidWrite::Discarded => {
                debug!(model = %model, uuid = %token, "identifier minted without storage target");
                Ok(token)
            }
        }
    }

    /// Pre-warm the cache: every page (depth-first) followed by its files,
    /// then site files, then user files.
    ///
    /// Objects are processed independently; one that fails is recorded in
    /// the report and the pass continues.
    pub fn index(&self) -> ResolveResult<IndexReport> {
        let mut targets = Vec::new();
        for page in self.content.index()? {
            let files = self.content.files(&page)?;
            targets.push(page);
            targets.extend(files);
        }
        targets.extend(self.content.files(&Model::Site)?);
        for user in self.content.users()? {
            targets.extend(self.content.files(&user)?);
        }

        let mut report = IndexReport::default();
        for model in targets {
            let label = model.to_string();
            let outcome = self.lookup(model).and_then(|mut lookup| {
                let stored = lookup.populate()?;
                Ok((lookup.key(), stored))
            });
            match outcome {
                Ok((key, true)) => report.populated.push(key),
                Ok((key, false)) => report.skipped.push(key),
                Err(e) => {
                    warn!(model = %label, error = %e, "failed to index");
                    report.failed.push(IndexFailure {
                        model: label,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            populated = report.populated.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "lookup cache indexed"
        );
        Ok(report)
    }

    /// Drop every cache entry. Returns `false` if the cache failed.
    pub fn flush(&self) -> bool {
        match self.cache.flush() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to flush lookup cache");
                false
            }
        }
    }

    /// Remove the entries of every page below `page`, deepest first.
    ///
    /// Pages without an identifier have no entry of their own but are still
    /// descended into.
    pub(crate) fn clear_descendants(
        &self,
        page: &Model,
        report: &mut ClearReport,
    ) -> ResolveResult<()> {
        for child in self.content.children(page)? {
            self.clear_descendants(&child, report)?;
            if let Some(host) = self.id(&child)? {
                self.remove_entry(&CacheKey::new(EntityType::Page, &host), report);
            }
        }
        Ok(())
    }

    pub(crate) fn remove_entry(&self, key: &CacheKey, report: &mut ClearReport) {
        match self.cache.remove(key) {
            Ok(true) => report.removed.push(key.clone()),
            Ok(false) => report.absent.push(key.clone()),
            Err(e) => {
                warn!(key = %key, error = %e, "failed to remove cache entry");
                report.failed.push(key.clone());
            }
        }
    }

    /// Cache read where any failure counts as a miss.
    pub(crate) fn cache_get(&self, key: &CacheKey) -> Option<String> {
        match self.cache.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "cache read failed; treating as miss");
                None
            }
        }
    }

    /// Cache write where any failure counts as "not stored".
    pub(crate) fn cache_set(&self, key: &CacheKey, value: &str) -> bool {
        match self.cache.set(key, value) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(key = %key, error = %e, "cache write failed; skipping");
                false
            }
        }
    }
}
