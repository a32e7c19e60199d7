//! Setting records as read from a flat settings dump
//!
//! A record is an unordered field mapping carrying one mandatory `id` field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SettingsError};
use crate::path::SettingPath;

/// Name of the identifier field consumed by [`SettingRecord::take_path`]
pub const ID_FIELD: &str = "id";

/// One flat setting entry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingRecord(Map<String, Value>);

impl SettingRecord {
    /// Create an empty record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap an untyped JSON value
    ///
    /// # Errors
    /// Returns [`SettingsError::NotAnObject`] if `value` is not an object
    pub fn from_value(index: usize, value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(SettingsError::NotAnObject { index }),
        }
    }

    /// Builder-style field insertion
    #[inline]
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Field value by name
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Mutable field value by name
    #[inline]
    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.0.get_mut(field)
    }

    /// Set a field, returning its previous value
    #[inline]
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// Remove a field, returning its value
    #[inline]
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Mutable access to the whole field mapping
    #[inline]
    pub(crate) fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    /// Take the field mapping, sorted by field name
    #[must_use]
    pub fn into_sorted_fields(self) -> Map<String, Value> {
        // Sorted even when serde_json's `preserve_order` feature is enabled
        let mut entries: Vec<(String, Value)> = self.0.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries.into_iter().collect()
    }

    /// Extract and remove the `id` field, decomposing it into a path
    ///
    /// # Errors
    /// - [`SettingsError::MissingIdentifier`] if `id` is absent or `null`
    /// - [`SettingsError::InvalidIdentifier`] if `id` is not a string
    pub fn take_path(mut self, index: usize) -> Result<(SettingPath, Self)> {
        match self.0.remove(ID_FIELD) {
            None | Some(Value::Null) => Err(SettingsError::MissingIdentifier { index }),
            Some(Value::String(id)) => Ok((SettingPath::from_identifier(&id), self)),
            Some(other) => Err(SettingsError::InvalidIdentifier {
                index,
                found: other.to_string(),
            }),
        }
    }
}

impl From<Map<String, Value>> for SettingRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<SettingRecord> for Value {
    fn from(record: SettingRecord) -> Self {
        Value::Object(record.into_sorted_fields())
    }
}
