//! Error types for settings conversion
//!
//! Every variant aborts the whole conversion. Unmatched paths and unmatched
//! boolean values are not errors and never show up here.

use std::string::FromUtf8Error;

use crate::path::SettingPath;

/// Errors raised while building a settings tree
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Record has no `id`, or its `id` is `null`
    #[error("missing setting key ID (record {index})")]
    MissingIdentifier { index: usize },

    /// Record `id` is present but not a string
    #[error("setting key ID of record {index} is not a string: {found}")]
    InvalidIdentifier { index: usize, found: String },

    /// Input element is not a JSON object
    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },

    /// Input document is not a JSON array of records
    #[error("expected a JSON array of setting records")]
    NotAList,

    /// Field matched a decode rule but is not valid base64
    #[error("invalid base64 in '{field}' at {path}: {source}")]
    Base64 {
        path: SettingPath,
        field: String,
        #[source]
        source: base64::DecodeError,
    },

    /// Field decoded from base64 but is not UTF-8 text
    #[error("decoded '{field}' at {path} is not UTF-8: {source}")]
    Utf8 {
        path: SettingPath,
        field: String,
        #[source]
        source: FromUtf8Error,
    },

    /// Device `dlk` is not a hexadecimal integer
    #[error("invalid device key at {path}: {source}")]
    InvalidKey {
        path: SettingPath,
        #[source]
        source: hex::FromHexError,
    },

    /// Field required by a matching decode rule is absent
    #[error("missing field '{field}' at {path}")]
    MissingField { path: SettingPath, field: String },

    /// Field required by a matching decode rule has the wrong JSON type
    #[error("field '{field}' at {path} is not a {expected}")]
    UnexpectedType {
        path: SettingPath,
        field: String,
        expected: &'static str,
    },

    /// Path has no leaf segment to insert at
    #[error("cannot insert a setting at an empty path")]
    EmptyPath,

    /// An intermediate path segment already holds a non-mapping value
    #[error("cannot descend into '{segment}' while inserting {path}: value is not a mapping")]
    PathConflict { path: SettingPath, segment: String },

    /// JSON parse or serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SettingsError {
    /// Whether the error comes from a codec rather than the record layout
    #[inline]
    #[must_use]
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            Self::Base64 { .. } | Self::Utf8 { .. } | Self::InvalidKey { .. }
        )
    }
}

/// Result type alias for settings operations
pub type Result<T> = std::result::Result<T, SettingsError>;
