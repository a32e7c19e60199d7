//! Nested settings tree
//!
//! Intermediate segments become mappings created on first use and reused
//! afterwards; the leaf segment holds the record's remaining fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SettingsError};
use crate::path::SettingPath;

/// Settings reorganized by path segment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsTree {
    root: Map<String, Value>,
}

impl SettingsTree {
    /// Create an empty tree
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `fields` at `path`, creating intermediate mappings as needed
    ///
    /// An existing value at the leaf is replaced entirely and returned.
    ///
    /// # Errors
    /// - [`SettingsError::EmptyPath`] if `path` has no segments
    /// - [`SettingsError::PathConflict`] if an intermediate segment already
    ///   holds something other than a mapping
    pub fn insert(
        &mut self,
        path: &SettingPath,
        fields: Map<String, Value>,
    ) -> Result<Option<Value>> {
        let (parents, leaf) = path.split_leaf().ok_or(SettingsError::EmptyPath)?;

        let mut node = &mut self.root;
        for segment in parents {
            let child = node
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            node = match child {
                Value::Object(map) => map,
                _ => {
                    return Err(SettingsError::PathConflict {
                        path: path.clone(),
                        segment: segment.clone(),
                    })
                }
            };
        }

        Ok(node.insert(leaf.to_string(), Value::Object(fields)))
    }

    /// Get a value by JSON pointer
    ///
    /// # Examples
    /// ```
    /// # use easycontrol_settings::{SettingPath, SettingsTree};
    /// # use serde_json::{json, Map};
    /// let mut tree = SettingsTree::new();
    /// let mut fields = Map::new();
    /// fields.insert("value".to_string(), json!(21.5));
    /// tree.insert(&SettingPath::from_identifier("/zones/1/temperature"), fields).unwrap();
    /// assert_eq!(tree.get("/zones/1/temperature/value"), Some(&json!(21.5)));
    /// ```
    #[must_use]
    pub fn get(&self, pointer: &str) -> Option<&Value> {
        if pointer.is_empty() {
            return None;
        }
        let mut segments = pointer.strip_prefix('/')?.split('/').map(unescape);
        let first = segments.next()?;
        segments.try_fold(self.root.get(first.as_str())?, |value, segment| match value {
            Value::Object(map) => map.get(segment.as_str()),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Number of top-level entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Whether no setting has been inserted
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Convert into an untyped JSON value
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    /// Serialize as 2-space indented JSON with keys sorted at every level
    ///
    /// # Errors
    /// Returns error if serialization fails (rare for JSON)
    pub fn to_pretty_json(&self) -> Result<String> {
        let sorted = sort_keys(Value::Object(self.root.clone()));
        Ok(serde_json::to_string_pretty(&sorted)?)
    }
}

impl From<SettingsTree> for Value {
    fn from(tree: SettingsTree) -> Self {
        tree.into_value()
    }
}

/// Recursively sort mapping keys
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// JSON pointer token unescaping (RFC 6901)
fn unescape(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn insert_creates_intermediate_mappings() {
        let mut tree = SettingsTree::new();
        tree.insert(
            &SettingPath::from_identifier("/zones/1/name"),
            fields(json!({"value": "Zone 1"})),
        )
        .unwrap();

        assert_eq!(
            tree.into_value(),
            json!({"zones": {"1": {"name": {"value": "Zone 1"}}}})
        );
    }

    #[test]
    fn insert_reuses_existing_mappings() {
        let mut tree = SettingsTree::new();
        tree.insert(&"/zones/1/name".into(), fields(json!({"value": "A"})))
            .unwrap();
        tree.insert(&"/zones/1/mode".into(), fields(json!({"value": "auto"})))
            .unwrap();
        tree.insert(&"/zones/2/name".into(), fields(json!({"value": "B"})))
            .unwrap();

        assert_eq!(
            tree.into_value(),
            json!({"zones": {
                "1": {"name": {"value": "A"}, "mode": {"value": "auto"}},
                "2": {"name": {"value": "B"}}
            }})
        );
    }

    #[test]
    fn insert_replaces_leaf_entirely() {
        let mut tree = SettingsTree::new();
        tree.insert(&"/a/b".into(), fields(json!({"value": 1, "unit": "C"})))
            .unwrap();
        let previous = tree
            .insert(&"/a/b".into(), fields(json!({"value": 2})))
            .unwrap();

        assert_eq!(previous, Some(json!({"value": 1, "unit": "C"})));
        assert_eq!(tree.get("/a/b"), Some(&json!({"value": 2})));
    }

    #[test]
    fn deeper_setting_nests_inside_leaf_record() {
        let mut tree = SettingsTree::new();
        tree.insert(&"/gateway".into(), fields(json!({"type": "refEnum"})))
            .unwrap();
        tree.insert(&"/gateway/uuid".into(), fields(json!({"value": "42"})))
            .unwrap();

        assert_eq!(
            tree.into_value(),
            json!({"gateway": {"type": "refEnum", "uuid": {"value": "42"}}})
        );
    }

    #[test]
    fn descending_through_scalar_conflicts() {
        let mut tree = SettingsTree::new();
        tree.insert(&"/a/b".into(), fields(json!({"value": 5})))
            .unwrap();
        let err = tree
            .insert(&"/a/b/value/c".into(), fields(json!({})))
            .unwrap_err();

        assert!(matches!(err, SettingsError::PathConflict { ref segment, .. } if segment == "value"));
    }

    #[test]
    fn empty_path_rejected() {
        let mut tree = SettingsTree::new();
        let err = tree
            .insert(&SettingPath::new(Vec::new()), Map::new())
            .unwrap_err();
        assert!(matches!(err, SettingsError::EmptyPath));
    }

    #[test]
    fn empty_segment_is_a_key() {
        let mut tree = SettingsTree::new();
        tree.insert(&"/".into(), fields(json!({"value": 1})))
            .unwrap();
        assert_eq!(tree.into_value(), json!({"": {"value": 1}}));
    }

    #[test]
    fn get_by_pointer() {
        let mut tree = SettingsTree::new();
        tree.insert(
            &"/devices/1".into(),
            fields(json!({"value": [{"name": "Hallway"}]})),
        )
        .unwrap();

        assert_eq!(tree.get("/devices/1/value/0/name"), Some(&json!("Hallway")));
        assert_eq!(tree.get("/devices/2"), None);
        assert_eq!(tree.get("devices"), None);
        assert_eq!(tree.get(""), None);
    }

    #[test]
    fn pretty_json_sorts_keys() {
        let mut tree = SettingsTree::new();
        tree.insert(&"/zones/2/name".into(), fields(json!({"value": "B"})))
            .unwrap();
        tree.insert(
            &"/energy/currency".into(),
            fields(json!({"writeable": false, "value": "GBP"})),
        )
        .unwrap();

        let text = tree.to_pretty_json().unwrap();
        let energy = text.find("\"energy\"").unwrap();
        let zones = text.find("\"zones\"").unwrap();
        let value = text.find("\"value\": \"GBP\"").unwrap();
        let writeable = text.find("\"writeable\"").unwrap();
        assert!(energy < zones);
        assert!(value < writeable);
        assert!(text.starts_with("{\n  \"energy\""));
    }
}
