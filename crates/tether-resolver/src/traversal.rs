//! Candidate collections for the traversal fallback.
//!
//! Traversal is ground truth: whatever the cache says, an object is only
//! the target of an identifier if its stored identifier matches.

use tether_content::{ContentResult, ContentTree, Model, Models};
use tether_types::EntityType;

/// Every object of `kind` in the live tree.
///
/// - pages: the full page index
/// - files: files of every page, then site files, then user files
/// - blocks / structure entries: the flat entry index
///
/// Sites and users are never traversed; they resolve directly.
pub fn collection(content: &dyn ContentTree, kind: EntityType) -> ContentResult<Models> {
    match kind {
        EntityType::Page => content.index(),
        EntityType::File => {
            let mut files = Models::new();
            for page in content.index()? {
                files = files.add(content.files(&page)?);
            }
            files = files.add(content.files(&Model::Site)?);
            for user in content.users()? {
                files = files.add(content.files(&user)?);
            }
            Ok(files)
        }
        EntityType::Block | EntityType::Struct => content.entries(kind),
        EntityType::Site | EntityType::User => Ok(Models::new()),
    }
}

/// The first candidate of `kind` identified by `host`.
///
/// Blocks are keyed by their own id; pages, files and structure entries are
/// matched on their identifier attribute.
pub fn find(
    content: &dyn ContentTree,
    kind: EntityType,
    host: &str,
    candidates: &Models,
) -> ContentResult<Option<Model>> {
    match kind {
        EntityType::Block => Ok(candidates
            .find(|m| m.kind() == kind && m.id() == host)
            .cloned()),
        EntityType::Page | EntityType::File | EntityType::Struct => {
            for candidate in candidates.iter().filter(|m| m.kind() == kind) {
                if content.uuid(candidate)?.as_deref() == Some(host) {
                    return Ok(Some(candidate.clone()));
                }
            }
            Ok(None)
        }
        EntityType::Site | EntityType::User => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::index_fixture;

    #[test]
    fn file_collection_order() {
        let tree = index_fixture();
        let files = collection(&tree, EntityType::File).unwrap();
        let ids: Vec<String> = files.iter().map(Model::id).collect();
        assert_eq!(ids, vec!["a/test.jpg", "test.jpg", "test/test.jpg"]);
    }

    #[test]
    fn page_collection_is_index() {
        let tree = index_fixture();
        assert_eq!(collection(&tree, EntityType::Page).unwrap(), tree.index().unwrap());
    }

    #[test]
    fn find_matches_identifier_attribute() {
        let tree = index_fixture();
        let files = collection(&tree, EntityType::File).unwrap();
        let found = find(&tree, EntityType::File, "file-user-a", &files).unwrap();
        assert_eq!(found, Some(Model::file(Model::user("test"), "test.jpg")));
        assert!(find(&tree, EntityType::File, "nonexistent", &files)
            .unwrap()
            .is_none());
    }

    #[test]
    fn find_ignores_other_kinds() {
        let tree = index_fixture();
        let pages = collection(&tree, EntityType::Page).unwrap();
        // page-a is a page identifier, not a file identifier
        assert!(find(&tree, EntityType::File, "page-a", &pages).unwrap().is_none());
    }

    #[test]
    fn site_and_user_are_not_traversed() {
        let tree = index_fixture();
        assert!(collection(&tree, EntityType::User).unwrap().is_empty());
        assert!(collection(&tree, EntityType::Site).unwrap().is_empty());
    }
}
