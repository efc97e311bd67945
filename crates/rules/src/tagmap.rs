//! Order-independent tag mapping used both as index key and as query input.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use qcgate_core::format_tags;

/// Immutable mapping from tag name to tag value.
///
/// Backed by a sorted map, so two mappings holding the same pairs compare and
/// hash identically regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagMap(BTreeMap<String, String>);

impl TagMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }

    /// Copy of this mapping restricted to the given tag names.
    pub fn retain_names(&self, names: &BTreeSet<String>) -> TagMap {
        self.0
            .iter()
            .filter(|(name, _)| names.contains(*name))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Every subset of this mapping's pairs, the empty mapping included.
    ///
    /// Yields `2^len` mappings lazily, one per bitmask over the sorted pairs.
    ///
    /// # Panics
    ///
    /// Panics if the mapping holds 64 or more tags.
    pub fn subsets(&self) -> impl Iterator<Item = TagMap> + '_ {
        let pairs: Vec<(&String, &String)> = self.0.iter().collect();
        assert!(pairs.len() < 64, "cannot enumerate subsets of {} tags", pairs.len());

        (0..1u64 << pairs.len()).map(move |mask| {
            pairs
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << *bit) != 0)
                .map(|(_, (k, v))| (k.to_string(), v.to_string()))
                .collect()
        })
    }

    /// True when every pair of `self` also appears in `other`.
    pub fn is_subset_of(&self, other: &TagMap) -> bool {
        self.iter().all(|(name, value)| other.get(name) == Some(value))
    }
}

impl From<BTreeMap<String, String>> for TagMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for TagMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_tags(self.iter()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn equality_ignores_insertion_order() {
        let a: TagMap = [("site", "A"), ("task", "rest")].into_iter().collect();
        let b: TagMap = [("task", "rest"), ("site", "A")].into_iter().collect();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn subsets_cover_powerset() {
        let tags: TagMap = [("sub", "01"), ("task", "rest"), ("run", "1")]
            .into_iter()
            .collect();
        let subsets: Vec<TagMap> = tags.subsets().collect();
        assert_eq!(subsets.len(), 8);

        let unique: HashSet<_> = subsets.iter().cloned().collect();
        assert_eq!(unique.len(), 8);
        assert!(unique.contains(&TagMap::new()));
        assert!(unique.contains(&tags));
        assert!(subsets.iter().all(|s| s.is_subset_of(&tags)));
    }

    #[test]
    fn subsets_of_empty_mapping() {
        assert_eq!(TagMap::new().subsets().collect::<Vec<_>>(), vec![TagMap::new()]);
    }

    #[test]
    fn subsets_are_lazy() {
        let tags: TagMap = (0..40).map(|i| (format!("tag{i:02}"), "x")).collect();
        let first: Vec<TagMap> = tags.subsets().take(3).collect();

        assert_eq!(first[0], TagMap::new());
        assert_eq!(first[1].keys().collect::<Vec<_>>(), vec!["tag00"]);
        assert_eq!(first[2].keys().collect::<Vec<_>>(), vec!["tag01"]);
    }

    #[test]
    fn retain_names_filters_keys() {
        let tags: TagMap = [("sub", "01"), ("task", "rest"), ("echo", "2")]
            .into_iter()
            .collect();
        let names: BTreeSet<String> = ["task".to_string(), "site".to_string()].into();
        let kept = tags.retain_names(&names);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.get("task"), Some("rest"));
        assert!(!kept.contains_key("sub"));
    }

    #[test]
    fn deserializes_from_flat_object() {
        let tags: TagMap = serde_json::from_str(r#"{"task": "rest", "sub": "01"}"#).unwrap();
        assert_eq!(tags.keys().collect::<Vec<_>>(), vec!["sub", "task"]);
    }

    #[test]
    fn display_uses_entity_order() {
        let tags: TagMap = [("task", "rest"), ("sub", "01")].into_iter().collect();
        assert_eq!(tags.to_string(), r#"subject: "01", task: "rest""#);
    }
}
