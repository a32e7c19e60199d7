//! EasyControl Settings Conversion
//!
//! Turns the flat, path-keyed settings list exported by a Bosch EasyControl
//! thermostat into a nested settings tree.
//!
//! # Core Concepts
//!
//! - [`SettingRecord`]: one flat entry, identified by a slash-delimited `id`
//! - [`SettingPath`]: the `id` decomposed into segments
//! - [`SettingsTree`]: records nested by path segment
//! - [`DECODE_RULES`]: which fields at which paths are base64 text or device keys
//! - [`BOOLEAN_FIELDS`]: flag fields whose `"true"`/`0`-style values are normalized
//!
//! # Example
//!
//! ```
//! use easycontrol_settings::{BuildOptions, SettingsTreeBuilder};
//! use serde_json::json;
//!
//! let tree = SettingsTreeBuilder::new(BuildOptions::default())
//!     .build_from_value(json!([{"id": "/zones/1/name", "value": "Wm9uZSAx"}]))
//!     .unwrap();
//!
//! assert_eq!(
//!     tree.into_value(),
//!     json!({"zones": {"1": {"name": {"value": "Zone 1"}}}})
//! );
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod booleans;
pub mod builder;
pub mod decode;
pub mod error;
pub mod key;
pub mod path;
pub mod record;
pub mod tree;

// Re-exports
pub use booleans::{normalize_booleans, normalize_value, BOOLEAN_FIELDS};
pub use builder::{build, BuildOptions, SettingsTreeBuilder};
pub use decode::{decode_known_paths, find_rule, DecodeAction, DecodeRule, Segment, DECODE_RULES};
pub use error::{Result, SettingsError};
pub use key::{homematic_key, homematic_key_from_bytes, homematic_key_from_hex, KEY_ALPHABET};
pub use path::SettingPath;
pub use record::SettingRecord;
pub use tree::SettingsTree;
