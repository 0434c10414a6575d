//! In-memory content tree for tests, tooling and short-lived processes.
//!
//! [`InMemoryContentTree`] holds a [`ContentProps`] description behind a
//! `RwLock` and implements the full [`ContentTree`] trait over it.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tether_types::EntityType;
use tracing::debug;

use crate::auth::{AuthContext, Elevation};
use crate::collection::Models;
use crate::error::{ContentError, ContentResult};
use crate::model::Model;
use crate::props::{ContentProps, EntryProps, HolderProps, PageProps};
use crate::traits::{ContentTree, UuidWrite, UUID_FIELD};

/// Whether identifier writes reach the tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StorageMode {
    /// Writes are applied.
    #[default]
    Persistent,
    /// There is no storage target: permitted writes succeed without effect.
    Ephemeral,
}

/// A content tree held entirely in memory.
#[derive(Debug)]
pub struct InMemoryContentTree {
    props: RwLock<ContentProps>,
    auth: Arc<AuthContext>,
    mode: StorageMode,
}

impl InMemoryContentTree {
    /// Build a tree from a description, with a fresh [`AuthContext`].
    pub fn new(props: ContentProps) -> Self {
        Self {
            props: RwLock::new(props),
            auth: Arc::new(AuthContext::new()),
            mode: StorageMode::Persistent,
        }
    }

    /// Build a tree from a JSON description (see [`crate::props`]).
    pub fn from_json(value: serde_json::Value) -> ContentResult<Self> {
        Ok(Self::new(serde_json::from_value(value)?))
    }

    /// Load a JSON description from disk.
    pub fn load(path: &Path) -> ContentResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let props: ContentProps = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), "content tree loaded");
        Ok(Self::new(props))
    }

    /// Write the current tree back to disk as JSON.
    pub fn save(&self, path: &Path) -> ContentResult<()> {
        let json = serde_json::to_string_pretty(&self.snapshot()?)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Share an existing auth context instead of the tree's own.
    pub fn with_auth(mut self, auth: Arc<AuthContext>) -> Self {
        self.auth = auth;
        self
    }

    /// Switch to [`StorageMode::Ephemeral`].
    pub fn ephemeral(mut self) -> Self {
        self.mode = StorageMode::Ephemeral;
        self
    }

    /// The auth context identifier writes are checked against.
    pub fn auth(&self) -> Arc<AuthContext> {
        Arc::clone(&self.auth)
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    /// A copy of the current description.
    pub fn snapshot(&self) -> ContentResult<ContentProps> {
        Ok(self.read()?.clone())
    }

    /// Change a page's slug, moving it and its subtree. Returns the page's
    /// new locator.
    pub fn rename_page(&self, id: &str, slug: &str) -> ContentResult<Model> {
        let mut props = self.write()?;
        let page = PageProps::find_mut(&mut props.site.children, id)
            .ok_or_else(|| not_found(&Model::page(id)))?;
        page.slug = slug.to_string();
        let moved = match id.rsplit_once('/') {
            Some((parent, _)) => Model::page(format!("{parent}/{slug}")),
            None => Model::page(slug),
        };
        debug!(from = %id, to = %moved.id(), "page renamed");
        Ok(moved)
    }

    /// Set one content attribute directly, bypassing permission checks.
    pub fn set_content(&self, model: &Model, field: &str, value: &str) -> ContentResult<()> {
        let mut props = self.write()?;
        let content = content_mut(&mut props, model).ok_or_else(|| not_found(model))?;
        content.insert(field.to_string(), value.to_string());
        Ok(())
    }

    fn read(&self) -> ContentResult<RwLockReadGuard<'_, ContentProps>> {
        self.props
            .read()
            .map_err(|e| ContentError::Poisoned(e.to_string()))
    }

    fn write(&self) -> ContentResult<RwLockWriteGuard<'_, ContentProps>> {
        self.props
            .write()
            .map_err(|e| ContentError::Poisoned(e.to_string()))
    }
}

fn not_found(model: &Model) -> ContentError {
    ContentError::NotFound {
        model: model.to_string(),
    }
}

fn holder<'a>(props: &'a ContentProps, model: &Model) -> Option<&'a HolderProps> {
    match model {
        Model::Site => Some(&props.site.holder),
        Model::Page { id } => PageProps::find(&props.site.children, id).map(|p| &p.holder),
        Model::User { id } => props.users.iter().find(|u| u.id == *id).map(|u| &u.holder),
        Model::File { .. } | Model::Block { .. } | Model::Struct { .. } => None,
    }
}

fn holder_mut<'a>(props: &'a mut ContentProps, model: &Model) -> Option<&'a mut HolderProps> {
    match model {
        Model::Site => Some(&mut props.site.holder),
        Model::Page { id } => {
            PageProps::find_mut(&mut props.site.children, id).map(|p| &mut p.holder)
        }
        Model::User { id } => props
            .users
            .iter_mut()
            .find(|u| u.id == *id)
            .map(|u| &mut u.holder),
        Model::File { .. } | Model::Block { .. } | Model::Struct { .. } => None,
    }
}

fn fields(holder: &HolderProps, kind: EntityType) -> Option<&BTreeMap<String, Vec<EntryProps>>> {
    match kind {
        EntityType::Block => Some(&holder.blocks),
        EntityType::Struct => Some(&holder.structures),
        _ => None,
    }
}

fn content<'a>(props: &'a ContentProps, model: &Model) -> Option<&'a BTreeMap<String, String>> {
    match model {
        Model::Site | Model::Page { .. } | Model::User { .. } => {
            holder(props, model).map(|h| &h.content)
        }
        Model::File { parent, filename } => holder(props, parent)?
            .files
            .iter()
            .find(|f| f.filename == *filename)
            .map(|f| &f.content),
        Model::Block { parent, field, id } | Model::Struct { parent, field, id } => {
            fields(holder(props, parent)?, model.kind())?
                .get(field)?
                .iter()
                .find(|e| e.id == *id)
                .map(|e| &e.content)
        }
    }
}

fn content_mut<'a>(
    props: &'a mut ContentProps,
    model: &Model,
) -> Option<&'a mut BTreeMap<String, String>> {
    match model {
        Model::Site | Model::Page { .. } | Model::User { .. } => {
            holder_mut(props, model).map(|h| &mut h.content)
        }
        Model::File { parent, filename } => holder_mut(props, parent)?
            .files
            .iter_mut()
            .find(|f| f.filename == *filename)
            .map(|f| &mut f.content),
        Model::Block { parent, field, id } => holder_mut(props, parent)?
            .blocks
            .get_mut(field)?
            .iter_mut()
            .find(|e| e.id == *id)
            .map(|e| &mut e.content),
        Model::Struct { parent, field, id } => holder_mut(props, parent)?
            .structures
            .get_mut(field)?
            .iter_mut()
            .find(|e| e.id == *id)
            .map(|e| &mut e.content),
    }
}

fn collect_pages(pages: &[PageProps], prefix: Option<&str>, out: &mut Models) {
    for page in pages {
        let id = match prefix {
            Some(prefix) => format!("{prefix}/{}", page.slug),
            None => page.slug.clone(),
        };
        out.push(Model::page(id.clone()));
        collect_pages(&page.children, Some(&id), out);
    }
}

fn entry_model(kind: EntityType, parent: &Model, field: &str, id: &str) -> Option<Model> {
    match kind {
        EntityType::Block => Some(Model::block(parent.clone(), field, id)),
        EntityType::Struct => Some(Model::structure(parent.clone(), field, id)),
        _ => None,
    }
}

impl ContentTree for InMemoryContentTree {
    fn page(&self, id: &str) -> ContentResult<Option<Model>> {
        let id = id.trim_matches('/');
        let props = self.read()?;
        Ok(PageProps::find(&props.site.children, id).map(|_| Model::page(id)))
    }

    fn user(&self, id: &str) -> ContentResult<Option<Model>> {
        let props = self.read()?;
        Ok(props
            .users
            .iter()
            .find(|u| u.id == id)
            .map(|u| Model::user(u.id.clone())))
    }

    fn users(&self) -> ContentResult<Models> {
        let props = self.read()?;
        Ok(props.users.iter().map(|u| Model::user(u.id.clone())).collect())
    }

    fn children(&self, parent: &Model) -> ContentResult<Models> {
        let props = self.read()?;
        match parent {
            Model::Site => Ok(props
                .site
                .children
                .iter()
                .map(|p| Model::page(p.slug.clone()))
                .collect()),
            Model::Page { id } => {
                let page = PageProps::find(&props.site.children, id)
                    .ok_or_else(|| not_found(parent))?;
                Ok(page
                    .children
                    .iter()
                    .map(|p| Model::page(format!("{id}/{}", p.slug)))
                    .collect())
            }
            _ => Ok(Models::new()),
        }
    }

    fn index(&self) -> ContentResult<Models> {
        let props = self.read()?;
        let mut pages = Models::new();
        collect_pages(&props.site.children, None, &mut pages);
        Ok(pages)
    }

    fn files(&self, parent: &Model) -> ContentResult<Models> {
        let props = self.read()?;
        let holder = holder(&props, parent).ok_or_else(|| not_found(parent))?;
        Ok(holder
            .files
            .iter()
            .map(|f| Model::file(parent.clone(), f.filename.clone()))
            .collect())
    }

    fn entry(
        &self,
        kind: EntityType,
        parent: &Model,
        field: &str,
        id: &str,
    ) -> ContentResult<Option<Model>> {
        let props = self.read()?;
        let found = holder(&props, parent)
            .and_then(|h| fields(h, kind))
            .and_then(|f| f.get(field))
            .map(|entries| entries.iter().any(|e| e.id == id))
            .unwrap_or(false);
        Ok(if found {
            entry_model(kind, parent, field, id)
        } else {
            None
        })
    }

    fn entries(&self, kind: EntityType) -> ContentResult<Models> {
        let props = self.read()?;

        let mut holders = vec![Model::Site];
        let mut pages = Models::new();
        collect_pages(&props.site.children, None, &mut pages);
        holders.extend(pages);
        holders.extend(props.users.iter().map(|u| Model::user(u.id.clone())));

        let mut entries = Models::new();
        for parent in &holders {
            let Some(by_field) = holder(&props, parent).and_then(|h| fields(h, kind)) else {
                continue;
            };
            for (field, list) in by_field {
                for entry in list {
                    if let Some(model) = entry_model(kind, parent, field, &entry.id) {
                        entries.push(model);
                    }
                }
            }
        }
        Ok(entries)
    }

    fn uuid(&self, model: &Model) -> ContentResult<Option<String>> {
        let props = self.read()?;
        let content = content(&props, model).ok_or_else(|| not_found(model))?;
        Ok(content
            .get(UUID_FIELD)
            .filter(|uuid| !uuid.is_empty())
            .cloned())
    }

    fn write_uuid(
        &self,
        model: &Model,
        uuid: &str,
        elevation: &Elevation<'_>,
    ) -> ContentResult<UuidWrite> {
        if !elevation.grants(&self.auth) {
            return Err(ContentError::PermissionDenied {
                actor: self.auth.current().map(str::to_string),
                action: format!("write identifier of {model}"),
            });
        }
        if self.mode == StorageMode::Ephemeral {
            debug!(model = %model, "identifier write discarded");
            return Ok(UuidWrite::Discarded);
        }

        let mut props = self.write()?;
        let content = content_mut(&mut props, model).ok_or_else(|| not_found(model))?;
        if let Some(existing) = content.get(UUID_FIELD).filter(|u| !u.is_empty()) {
            return Ok(UuidWrite::Existing(existing.clone()));
        }
        content.insert(UUID_FIELD.to_string(), uuid.to_string());
        debug!(model = %model, uuid = %uuid, "identifier written");
        Ok(UuidWrite::Persisted(uuid.to_string()))
    }
}
