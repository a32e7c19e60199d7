//! Setting paths decomposed from record identifiers
//!
//! Provides [`SettingPath`], the ordered segment list behind an identifier
//! such as `/zones/1/name`.

use std::fmt::{self, Display, Formatter};

/// Path of a setting within the settings tree
///
/// Built from a slash-delimited identifier by stripping exactly one leading
/// `/` and splitting on `/`. The last segment is the leaf key; the preceding
/// segments are the route through intermediate mappings.
///
/// # Examples
/// - `/zones/1/name` → `["zones", "1", "name"]`
/// - `energy/currency` → `["energy", "currency"]`
/// - `/` → `[""]`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SettingPath(Vec<String>);

impl SettingPath {
    /// Create path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Decompose a record identifier
    ///
    /// Never yields an empty path: an empty identifier (or a lone `/`)
    /// decomposes to a single empty segment.
    #[must_use]
    pub fn from_identifier(id: &str) -> Self {
        let trimmed = id.strip_prefix('/').unwrap_or(id);
        Self(trimmed.split('/').map(str::to_string).collect())
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path has no segments
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Split into the intermediate segments and the leaf key
    #[must_use]
    pub fn split_leaf(&self) -> Option<(&[String], &str)> {
        self.0
            .split_last()
            .map(|(leaf, parents)| (parents, leaf.as_str()))
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Display for SettingPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0.join("/"))
    }
}

impl From<&str> for SettingPath {
    fn from(id: &str) -> Self {
        Self::from_identifier(id)
    }
}
