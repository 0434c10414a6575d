use serde::{Deserialize, Serialize};

use crate::model::Model;

/// An ordered, duplicate-free set of candidate content objects.
///
/// Traversal fallback searches a `Models` collection linearly. Collections
/// compose: the file index is the union of page, site and user files, and a
/// caller that already searched part of it can subtract that part with
/// [`Models::without`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Models {
    items: Vec<Model>,
}

impl Models {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Model> {
        self.items.iter()
    }

    /// Returns `true` if `model` is part of the collection.
    pub fn contains(&self, model: &Model) -> bool {
        self.items.contains(model)
    }

    /// Append one object, skipping it if already present.
    pub fn push(&mut self, model: Model) {
        if !self.contains(&model) {
            self.items.push(model);
        }
    }

    /// Union with another collection, keeping this collection's order first.
    pub fn add(mut self, other: Models) -> Self {
        for model in other {
            self.push(model);
        }
        self
    }

    /// This collection minus every object in `other`.
    pub fn without(mut self, other: &Models) -> Self {
        self.items.retain(|model| !other.contains(model));
        self
    }

    /// Keep only the objects matching `predicate`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: FnMut(&Model) -> bool,
    {
        self.items.retain(predicate);
        self
    }

    /// First object matching `predicate`, without building a new collection.
    pub fn find<F>(&self, mut predicate: F) -> Option<&Model>
    where
        F: FnMut(&Model) -> bool,
    {
        self.items.iter().find(|model| predicate(model))
    }

    /// The object whose own id is `id` (see [`Model::id`]).
    pub fn get(&self, id: &str) -> Option<&Model> {
        self.find(|model| model.id() == id)
    }

    /// The first object.
    pub fn first(&self) -> Option<&Model> {
        self.items.first()
    }
}

impl FromIterator<Model> for Models {
    fn from_iter<I: IntoIterator<Item = Model>>(iter: I) -> Self {
        let mut models = Models::new();
        for model in iter {
            models.push(model);
        }
        models
    }
}

impl IntoIterator for Models {
    type Item = Model;
    type IntoIter = std::vec::IntoIter<Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Models {
    type Item = &'a Model;
    type IntoIter = std::slice::Iter<'a, Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(ids: &[&str]) -> Models {
        ids.iter().map(|id| Model::page(*id)).collect()
    }

    #[test]
    fn duplicates_are_skipped() {
        let models: Models = vec![Model::page("a"), Model::page("a"), Model::page("b")]
            .into_iter()
            .collect();
        assert_eq!(models.len(), 2);
    }

    #[test]
    fn add_keeps_order() {
        let merged = pages(&["a", "b"]).add(pages(&["b", "c"]));
        let ids: Vec<String> = merged.iter().map(Model::id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn without_subtracts() {
        let rest = pages(&["a", "b", "c"]).without(&pages(&["b"]));
        assert_eq!(rest, pages(&["a", "c"]));
    }

    #[test]
    fn get_by_own_id() {
        let parent = Model::page("a");
        let blocks: Models = vec![
            Model::block(parent.clone(), "text", "b1"),
            Model::block(parent, "text", "b2"),
        ]
        .into_iter()
        .collect();
        assert_eq!(blocks.get("b2").map(Model::id).as_deref(), Some("b2"));
        assert!(blocks.get("b3").is_none());
    }

    #[test]
    fn filter_and_first() {
        let models = pages(&["a", "a/b", "c"]).filter(|m| m.id().starts_with('a'));
        assert_eq!(models.len(), 2);
        assert_eq!(models.first(), Some(&Model::page("a")));
    }
}
