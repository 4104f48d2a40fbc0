//! The shared-data tree built from export rules.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A value in the shared-data tree: either a raw declaration value or a
/// nested object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SharedValue {
    Leaf(String),
    Node(SharedData),
}

impl SharedValue {
    /// The raw value if this is a leaf.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SharedValue::Leaf(s) => Some(s),
            SharedValue::Node(_) => None,
        }
    }

    /// The nested object if this is a node.
    pub fn as_node(&self) -> Option<&SharedData> {
        match self {
            SharedValue::Node(node) => Some(node),
            SharedValue::Leaf(_) => None,
        }
    }

    /// The nested object, replacing a leaf with an empty node first.
    fn make_node(&mut self) -> &mut SharedData {
        match self {
            SharedValue::Node(node) => node,
            SharedValue::Leaf(_) => {
                *self = SharedValue::Node(SharedData::new());
                self.make_node()
            }
        }
    }
}

impl From<&str> for SharedValue {
    fn from(value: &str) -> Self {
        SharedValue::Leaf(value.to_string())
    }
}

impl From<String> for SharedValue {
    fn from(value: String) -> Self {
        SharedValue::Leaf(value)
    }
}

impl From<SharedData> for SharedValue {
    fn from(value: SharedData) -> Self {
        SharedValue::Node(value)
    }
}

/// Nested mapping from property names to shared values.
///
/// Keys are unique per node. Insertion order is kept so generated modules
/// list properties in the order they were declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharedData {
    entries: IndexMap<String, SharedValue>,
}

impl SharedData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&SharedValue> {
        self.entries.get(key)
    }

    /// Follow a path of keys through nested nodes.
    pub fn get_path(&self, path: &[&str]) -> Option<&SharedValue> {
        let (last, parents) = path.split_last()?;
        let mut node = self;
        for key in parents {
            node = node.get(key)?.as_node()?;
        }
        node.get(last)
    }

    /// Set a value, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SharedValue>) -> Option<SharedValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SharedValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    /// Walk `path` from this node, creating empty intermediate nodes as
    /// needed, and return the node at the end of the path.
    ///
    /// Revisiting an existing path reuses its nodes. A segment that lands on
    /// a leaf turns that leaf into an empty node; the indices of such
    /// segments are pushed onto `replaced`.
    pub fn drill_down<S: AsRef<str>>(&mut self, path: &[S], replaced: &mut Vec<usize>) -> &mut SharedData {
        let mut node = self;
        for (index, segment) in path.iter().enumerate() {
            let slot = node
                .entries
                .entry(segment.as_ref().to_string())
                .or_insert_with(|| SharedValue::Node(SharedData::new()));

            if let SharedValue::Leaf(_) = slot {
                replaced.push(index);
            }
            node = slot.make_node();
        }
        node
    }

    /// Deep-merge `other` into this tree.
    ///
    /// Nodes present on both sides merge recursively; on any other key
    /// collision the value from `other` wins.
    pub fn merge(&mut self, other: &SharedData) {
        for (key, incoming) in &other.entries {
            match (self.entries.get_mut(key), incoming) {
                (Some(SharedValue::Node(existing)), SharedValue::Node(incoming)) => {
                    existing.merge(incoming);
                }
                _ => {
                    self.entries.insert(key.clone(), incoming.clone());
                }
            }
        }
    }

    /// Compact JSON rendering of the tree.
    pub fn to_json(&self) -> String {
        // Serializing string-keyed maps of strings cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl<K: Into<String>, V: Into<SharedValue>> FromIterator<(K, V)> for SharedData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = SharedData::new();
        for (key, value) in iter {
            data.insert(key, value);
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_drill_down_creates_and_reuses() {
        let mut data = SharedData::new();
        let mut replaced = Vec::new();

        data.drill_down(&["nav"], &mut replaced).insert("bgColor", "#000");
        data.drill_down(&["nav", "menuItem"], &mut replaced)
            .insert("color", "#111");

        assert!(replaced.is_empty());
        assert_eq!(
            data.to_json(),
            r##"{"nav":{"bgColor":"#000","menuItem":{"color":"#111"}}}"##
        );
    }

    #[test]
    fn test_drill_down_empty_path_is_root() {
        let mut data = SharedData::new();
        let mut replaced = Vec::new();

        data.drill_down::<&str>(&[], &mut replaced).insert("a", "1");

        assert_eq!(data.get("a").and_then(SharedValue::as_str), Some("1"));
    }

    #[test]
    fn test_drill_down_replaces_leaf() {
        let mut data = SharedData::new();
        data.insert("nav", "red");
        let mut replaced = Vec::new();

        data.drill_down(&["nav", "item"], &mut replaced);

        assert_eq!(replaced, vec![0]);
        assert!(data.get_path(&["nav", "item"]).is_some());
    }

    #[test]
    fn test_merge_is_deep_and_incoming_wins() {
        let mut parsed: SharedData = [(
            "nav",
            SharedData::from_iter([("bgColor", "#000"), ("color", "#111")]),
        )]
        .into_iter()
        .collect();
        let additional: SharedData = [(
            "nav",
            SharedData::from_iter([("navBgColor", "#fff"), ("color", "#222")]),
        )]
        .into_iter()
        .collect();

        parsed.merge(&additional);

        let nav = parsed.get("nav").and_then(SharedValue::as_node).unwrap();
        assert_eq!(nav.get("bgColor").and_then(SharedValue::as_str), Some("#000"));
        assert_eq!(nav.get("navBgColor").and_then(SharedValue::as_str), Some("#fff"));
        assert_eq!(nav.get("color").and_then(SharedValue::as_str), Some("#222"));
    }

    #[test]
    fn test_merge_leaf_over_node() {
        let mut parsed = SharedData::from_iter([("nav", SharedData::from_iter([("a", "1")]))]);
        let additional = SharedData::from_iter([("nav", "none")]);

        parsed.merge(&additional);

        assert_eq!(parsed.get("nav").and_then(SharedValue::as_str), Some("none"));
    }

    #[test]
    fn test_deserialize_from_json() {
        let data: SharedData =
            serde_json::from_str(r##"{"theme":{"primary":"#fff"},"size":"12px"}"##).unwrap();

        assert_eq!(data.get_path(&["theme", "primary"]).and_then(SharedValue::as_str), Some("#fff"));
        assert_eq!(data.keys().collect::<Vec<_>>(), vec!["theme", "size"]);
    }
}
