//! Serializable description of a content tree.
//!
//! ```json
//! {
//!   "site": {
//!     "children": [
//!       { "slug": "a", "content": { "uuid": "page-a" },
//!         "files": [ { "filename": "test.jpg", "content": { "uuid": "file-a" } } ],
//!         "blocks": { "text": [ { "id": "block-a" } ] } }
//!     ],
//!     "files": [ { "filename": "logo.svg" } ]
//!   },
//!   "users": [ { "id": "test", "email": "test@example.com" } ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The whole tree: the site plus all users.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentProps {
    pub site: SiteProps,
    pub users: Vec<UserProps>,
}

/// Content, files and field entries shared by the site, pages and users.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HolderProps {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileProps>,
    /// Blocks fields, by field name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub blocks: BTreeMap<String, Vec<EntryProps>>,
    /// Structure fields, by field name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub structures: BTreeMap<String, Vec<EntryProps>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteProps {
    #[serde(flatten)]
    pub holder: HolderProps,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PageProps>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageProps {
    pub slug: String,
    #[serde(flatten)]
    pub holder: HolderProps,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PageProps>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProps {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub holder: HolderProps,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProps {
    pub filename: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, String>,
}

/// One block or structure entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryProps {
    pub id: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, String>,
}

impl PageProps {
    /// Walk a slug path below `pages`.
    pub(crate) fn find<'a>(pages: &'a [PageProps], path: &str) -> Option<&'a PageProps> {
        let mut slugs = path.split('/');
        let first = slugs.next()?;
        let mut page = pages.iter().find(|p| p.slug == first)?;
        for slug in slugs {
            page = page.children.iter().find(|p| p.slug == slug)?;
        }
        Some(page)
    }

    /// Mutable variant of [`PageProps::find`].
    pub(crate) fn find_mut<'a>(
        pages: &'a mut [PageProps],
        path: &str,
    ) -> Option<&'a mut PageProps> {
        let mut slugs = path.split('/');
        let first = slugs.next()?;
        let mut page = pages.iter_mut().find(|p| p.slug == first)?;
        for slug in slugs {
            page = page.children.iter_mut().find(|p| p.slug == slug)?;
        }
        Some(page)
    }
}
