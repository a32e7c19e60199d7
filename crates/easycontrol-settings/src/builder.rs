//! Settings tree construction from flat setting records
//!
//! Per record, in input order:
//! 1. extract the path from `id` (aborting on a missing identifier)
//! 2. normalize boolean flag fields, if enabled
//! 3. decode known encoded fields, if enabled
//! 4. assign the field-sorted record at its path
//!
//! Later records overwrite earlier ones at the same path. Any failure aborts
//! the whole build; no partial tree is returned.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::booleans::normalize_booleans;
use crate::decode::decode_known_paths;
use crate::error::{Result, SettingsError};
use crate::record::SettingRecord;
use crate::tree::SettingsTree;

/// Toggles for the per-record passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Decode base64 text and device keys at known paths
    pub decode: bool,
    /// Convert string/number boolean flags into JSON booleans
    pub fix_booleans: bool,
}

impl BuildOptions {
    /// Both passes enabled
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle base64 and device key decoding
    #[inline]
    #[must_use]
    pub fn with_decode(mut self, decode: bool) -> Self {
        self.decode = decode;
        self
    }

    /// Toggle boolean flag normalization
    #[inline]
    #[must_use]
    pub fn with_fix_booleans(mut self, fix_booleans: bool) -> Self {
        self.fix_booleans = fix_booleans;
        self
    }

    /// Both passes disabled: records are only reorganized
    #[inline]
    #[must_use]
    pub fn raw() -> Self {
        Self {
            decode: false,
            fix_booleans: false,
        }
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            decode: true,
            fix_booleans: true,
        }
    }
}

/// Builds [`SettingsTree`]s from setting records
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsTreeBuilder {
    options: BuildOptions,
}

impl SettingsTreeBuilder {
    /// Builder applying the passes selected by `options`
    #[inline]
    #[must_use]
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Build a tree from records, consuming them
    ///
    /// # Errors
    /// Returns the first error hit by any record; see [`SettingsError`]
    pub fn build<I>(&self, records: I) -> Result<SettingsTree>
    where
        I: IntoIterator<Item = SettingRecord>,
    {
        let mut tree = SettingsTree::new();
        let mut count = 0usize;

        for (index, record) in records.into_iter().enumerate() {
            let (path, mut record) = record.take_path(index)?;
            tracing::debug!(index, %path, "converting setting");

            if self.options.fix_booleans {
                record = normalize_booleans(record);
            }
            if self.options.decode {
                record = decode_known_paths(&path, record)?;
            }

            if tree.insert(&path, record.into_sorted_fields())?.is_some() {
                tracing::debug!(%path, "setting replaced an earlier record");
            }
            count += 1;
        }

        tracing::info!(
            records = count,
            top_level = tree.len(),
            decode = self.options.decode,
            fix_booleans = self.options.fix_booleans,
            "built settings tree"
        );
        Ok(tree)
    }

    /// Build a tree from an untyped JSON array of records
    ///
    /// # Errors
    /// - [`SettingsError::NotAList`] if `value` is not an array
    /// - [`SettingsError::NotAnObject`] if an element is not an object
    /// - anything [`Self::build`] returns
    pub fn build_from_value(&self, value: Value) -> Result<SettingsTree> {
        let Value::Array(items) = value else {
            return Err(SettingsError::NotAList);
        };
        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| SettingRecord::from_value(index, item))
            .collect::<Result<Vec<_>>>()?;
        self.build(records)
    }

    /// Build a tree from JSON text holding an array of records
    ///
    /// # Errors
    /// Returns [`SettingsError::Json`] on malformed JSON, otherwise as
    /// [`Self::build_from_value`]
    pub fn build_from_json(&self, json: &str) -> Result<SettingsTree> {
        let value: Value = serde_json::from_str(json)?;
        self.build_from_value(value)
    }
}

/// Build a settings tree with explicit pass toggles
///
/// Shorthand for `SettingsTreeBuilder::new(..).build(records)`.
///
/// # Errors
/// Returns the first error hit by any record
pub fn build<I>(records: I, decode: bool, fix_booleans: bool) -> Result<SettingsTree>
where
    I: IntoIterator<Item = SettingRecord>,
{
    let options = BuildOptions {
        decode,
        fix_booleans,
    };
    SettingsTreeBuilder::new(options).build(records)
}
