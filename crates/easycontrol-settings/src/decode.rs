//! Decoding of known obfuscated setting values
//!
//! Some settings store free text as base64, and device keys as hexadecimal
//! integers. Which fields need decoding depends only on the shape of the
//! setting path, so the rules live in an ordered table ([`DECODE_RULES`])
//! evaluated top to bottom; the first matching rule wins. Paths matching no
//! rule are left as they are.

use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde_json::{Map, Value};

use crate::error::{Result, SettingsError};
use crate::key::homematic_key_from_hex;
use crate::path::SettingPath;
use crate::record::SettingRecord;

/// Field holding the setting payload
pub const VALUE_FIELD: &str = "value";

/// Standard alphabet, canonical padding, non-zero trailing bits tolerated
const TEXT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Predicate on one path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Any segment
    Any,
    /// Exactly this segment
    Is(&'static str),
    /// Any one of these segments
    OneOf(&'static [&'static str]),
}

impl Segment {
    /// Check a concrete segment against this predicate
    #[inline]
    #[must_use]
    pub fn matches(self, segment: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Is(expected) => segment == expected,
            Self::OneOf(options) => options.contains(&segment),
        }
    }
}

/// What to decode once a rule matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeAction {
    /// base64-decode the record's scalar `value`
    Value,
    /// If `value` is a single-element list, base64-decode these fields of that element
    ListElement(&'static [&'static str]),
    /// If `value` is a single-element list, re-encode the element's `dlk` as a
    /// Homematic IP key and base64-decode its `name`
    Device,
}

/// One row of the decode table
#[derive(Debug, Clone, Copy)]
pub struct DecodeRule {
    /// Short label used in logs
    pub name: &'static str,
    /// One predicate per segment; the path length must equal the pattern length
    pub pattern: &'static [Segment],
    pub action: DecodeAction,
}

impl DecodeRule {
    /// Check whether this rule applies to `path`
    #[must_use]
    pub fn matches(&self, path: &SettingPath) -> bool {
        path.len() == self.pattern.len()
            && self
                .pattern
                .iter()
                .zip(path.iter())
                .all(|(predicate, segment)| predicate.matches(segment))
    }
}

/// Fields of a gateway user address entry stored as base64
pub const ADDRESS_FIELDS: &[&str] = &["address", "city", "country", "state", "zip"];

/// Known encoded paths, in evaluation order
pub const DECODE_RULES: &[DecodeRule] = &[
    DecodeRule {
        name: "connected device",
        pattern: &[Segment::Is("devices"), Segment::Any],
        action: DecodeAction::Device,
    },
    DecodeRule {
        name: "energy currency",
        pattern: &[Segment::Is("energy"), Segment::Is("currency")],
        action: DecodeAction::Value,
    },
    DecodeRule {
        name: "zone, program or device name",
        pattern: &[
            Segment::OneOf(&["zones", "programs", "devices"]),
            Segment::Any,
            Segment::Is("name"),
        ],
        action: DecodeAction::Value,
    },
    DecodeRule {
        name: "gateway user address",
        pattern: &[
            Segment::Is("gateway"),
            Segment::Is("user"),
            Segment::Is("address"),
        ],
        action: DecodeAction::ListElement(ADDRESS_FIELDS),
    },
    DecodeRule {
        name: "gateway user contact",
        pattern: &[
            Segment::Is("gateway"),
            Segment::Is("user"),
            Segment::OneOf(&["name", "email", "phone"]),
        ],
        action: DecodeAction::Value,
    },
    DecodeRule {
        name: "gateway installer contact",
        pattern: &[
            Segment::Is("gateway"),
            Segment::Is("installer"),
            Segment::OneOf(&["companyName", "contactName", "email", "phone"]),
        ],
        action: DecodeAction::Value,
    },
    DecodeRule {
        name: "auto away user name",
        pattern: &[
            Segment::Is("system"),
            Segment::Is("autoAway"),
            Segment::Is("users"),
            Segment::Any,
            Segment::Is("name"),
        ],
        action: DecodeAction::Value,
    },
];

/// First rule in [`DECODE_RULES`] matching `path`
#[must_use]
pub fn find_rule(path: &SettingPath) -> Option<&'static DecodeRule> {
    DECODE_RULES.iter().find(|rule| rule.matches(path))
}

/// Decode the fields of `record` that are known to be encoded at `path`
///
/// Each matching field is decoded exactly once; the returned record is never
/// fed back through the table.
///
/// # Errors
/// Returns error if a field selected by the matching rule is missing, has the
/// wrong type, or fails to decode.
pub fn decode_known_paths(path: &SettingPath, mut record: SettingRecord) -> Result<SettingRecord> {
    let Some(rule) = find_rule(path) else {
        return Ok(record);
    };
    tracing::trace!(%path, rule = rule.name, "decoding setting");

    let fields = record.fields_mut();
    match rule.action {
        DecodeAction::Value => decode_field(path, fields, VALUE_FIELD, VALUE_FIELD)?,
        DecodeAction::ListElement(names) => {
            if let Some(element) = single_element(path, fields)? {
                for name in names {
                    decode_field(path, element, name, &element_label(name))?;
                }
            }
        }
        DecodeAction::Device => {
            if let Some(element) = single_element(path, fields)? {
                let encoded = string_field(path, element, "dlk", &element_label("dlk"))?;
                let key = homematic_key_from_hex(encoded).map_err(|source| {
                    SettingsError::InvalidKey {
                        path: path.clone(),
                        source,
                    }
                })?;
                element.insert("dlk".to_string(), Value::String(key));
                decode_field(path, element, "name", &element_label("name"))?;
            }
        }
    }
    Ok(record)
}

/// Decode base64 text into a UTF-8 string
///
/// ASCII whitespace, including line breaks, is ignored. `path` and `field`
/// only label the error.
///
/// # Errors
/// Returns [`SettingsError::Base64`] or [`SettingsError::Utf8`]
pub fn decode_text(path: &SettingPath, field: &str, encoded: &str) -> Result<String> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = TEXT_ENGINE
        .decode(compact)
        .map_err(|source| SettingsError::Base64 {
            path: path.clone(),
            field: field.to_string(),
            source,
        })?;
    String::from_utf8(bytes).map_err(|source| SettingsError::Utf8 {
        path: path.clone(),
        field: field.to_string(),
        source,
    })
}

fn element_label(name: &str) -> String {
    format!("{VALUE_FIELD}[0].{name}")
}

/// The sole element of a one-element `value` list, as a mapping
///
/// Yields `None` when `value` is anything other than a one-element list.
fn single_element<'a>(
    path: &SettingPath,
    fields: &'a mut Map<String, Value>,
) -> Result<Option<&'a mut Map<String, Value>>> {
    match fields.get_mut(VALUE_FIELD) {
        Some(Value::Array(items)) if items.len() == 1 => match &mut items[0] {
            Value::Object(element) => Ok(Some(element)),
            _ => Err(SettingsError::UnexpectedType {
                path: path.clone(),
                field: format!("{VALUE_FIELD}[0]"),
                expected: "mapping",
            }),
        },
        Some(_) => Ok(None),
        None => Err(SettingsError::MissingField {
            path: path.clone(),
            field: VALUE_FIELD.to_string(),
        }),
    }
}

fn string_field<'a>(
    path: &SettingPath,
    fields: &'a Map<String, Value>,
    name: &str,
    label: &str,
) -> Result<&'a str> {
    match fields.get(name) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(SettingsError::UnexpectedType {
            path: path.clone(),
            field: label.to_string(),
            expected: "string",
        }),
        None => Err(SettingsError::MissingField {
            path: path.clone(),
            field: label.to_string(),
        }),
    }
}

fn decode_field(
    path: &SettingPath,
    fields: &mut Map<String, Value>,
    name: &str,
    label: &str,
) -> Result<()> {
    let decoded = decode_text(path, label, string_field(path, fields, name, label)?)?;
    fields.insert(name.to_string(), Value::String(decoded));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(id: &str) -> SettingPath {
        SettingPath::from_identifier(id)
    }

    fn value_record(value: Value) -> SettingRecord {
        SettingRecord::new().with("value", value)
    }

    #[test]
    fn rule_lookup_by_shape() {
        let cases = [
            ("/devices/5", Some("connected device")),
            ("/energy/currency", Some("energy currency")),
            ("/zones/1/name", Some("zone, program or device name")),
            ("/programs/3/name", Some("zone, program or device name")),
            ("/devices/2/name", Some("zone, program or device name")),
            ("/gateway/user/address", Some("gateway user address")),
            ("/gateway/user/email", Some("gateway user contact")),
            ("/gateway/installer/companyName", Some("gateway installer contact")),
            ("/system/autoAway/users/0/name", Some("auto away user name")),
            ("/zones/1/temperature", None),
            ("/gateway/user/uuid", None),
            ("/gateway/installer/address", None),
            ("/energy/price", None),
            ("/devices", None),
            ("/system/autoAway/users/0/email", None),
            ("/zones/1/name/extra", None),
        ];
        for (id, expected) in cases {
            assert_eq!(find_rule(&path(id)).map(|r| r.name), expected, "{id}");
        }
    }

    #[test]
    fn decodes_scalar_value() {
        let record = decode_known_paths(&path("/zones/1/name"), value_record(json!("Wm9uZSAx")))
            .unwrap();
        assert_eq!(record.get("value"), Some(&json!("Zone 1")));
    }

    #[test]
    fn decodes_energy_currency() {
        let record =
            decode_known_paths(&path("/energy/currency"), value_record(json!("R0JQ"))).unwrap();
        assert_eq!(record.get("value"), Some(&json!("GBP")));
    }

    #[test]
    fn decodes_utf8_text() {
        let record = decode_known_paths(
            &path("/gateway/user/name"),
            value_record(json!("SsO8cmdlbg==")),
        )
        .unwrap();
        assert_eq!(record.get("value"), Some(&json!("Jürgen")));
    }

    #[test]
    fn unmatched_path_untouched() {
        let original = value_record(json!("Wm9uZSAx")).with("type", "stringValue");
        let record = decode_known_paths(&path("/zones/1/label"), original.clone()).unwrap();
        assert_eq!(record, original);
    }

    #[test]
    fn decodes_only_once() {
        // "Wm9uZSAx" is itself valid base64; a second pass would change it again
        let record =
            decode_known_paths(&path("/zones/1/name"), value_record(json!("V205dVpTQXg=")))
                .unwrap();
        assert_eq!(record.get("value"), Some(&json!("Wm9uZSAx")));
    }

    #[test]
    fn decodes_device_entry() {
        let record = value_record(json!([{
            "dlk": "3014F711A0001F5A49A8FE1D",
            "name": "SGFsbHdheQ==",
            "type": "TRV"
        }]));
        let decoded = decode_known_paths(&path("/devices/1"), record).unwrap();
        assert_eq!(
            decoded.get("value"),
            Some(&json!([{
                "dlk": "C0M-YW8T0-00ZB9-4TJZHX",
                "name": "Hallway",
                "type": "TRV"
            }]))
        );
    }

    #[test]
    fn device_with_multiple_entries_untouched() {
        let original = value_record(json!([
            {"dlk": "1f", "name": "QQ=="},
            {"dlk": "1f", "name": "Qg=="}
        ]));
        let decoded = decode_known_paths(&path("/devices/1"), original.clone()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn device_with_scalar_value_untouched() {
        let original = value_record(json!("1f"));
        let decoded = decode_known_paths(&path("/devices/1"), original.clone()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn device_with_bad_key_fails() {
        let record = value_record(json!([{"dlk": "not-hex", "name": "QQ=="}]));
        let err = decode_known_paths(&path("/devices/1"), record).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidKey { .. }));
    }

    #[test]
    fn device_with_empty_key_fails() {
        for dlk in ["", "  ", "0x", "+"] {
            let record = value_record(json!([{"dlk": dlk, "name": "QQ=="}]));
            let err = decode_known_paths(&path("/devices/1"), record).unwrap_err();
            assert!(matches!(err, SettingsError::InvalidKey { .. }), "dlk {dlk:?}");
        }
    }

    #[test]
    fn device_key_with_prefix_and_padding() {
        let record = value_record(json!([{"dlk": " 0x1F\n", "name": "QQ=="}]));
        let decoded = decode_known_paths(&path("/devices/1"), record).unwrap();
        assert_eq!(decoded.get("value"), Some(&json!([{"dlk": "Z", "name": "A"}])));
    }

    #[test]
    fn device_without_key_fails() {
        let record = value_record(json!([{"name": "QQ=="}]));
        let err = decode_known_paths(&path("/devices/1"), record).unwrap_err();
        assert!(
            matches!(err, SettingsError::MissingField { ref field, .. } if field == "value[0].dlk")
        );
    }

    #[test]
    fn decodes_user_address() {
        let record = value_record(json!([{
            "address": "MSBIaWdoIFN0cmVldA==",
            "city": "TG9uZG9u",
            "country": "VUs=",
            "state": "",
            "zip": "U1cxQSAxQUE=",
            "latitude": 51.5
        }]));
        let decoded = decode_known_paths(&path("/gateway/user/address"), record).unwrap();
        assert_eq!(
            decoded.get("value"),
            Some(&json!([{
                "address": "1 High Street",
                "city": "London",
                "country": "UK",
                "state": "",
                "zip": "SW1A 1AA",
                "latitude": 51.5
            }]))
        );
    }

    #[test]
    fn malformed_base64_fails() {
        let err = decode_known_paths(&path("/zones/1/name"), value_record(json!("not base64!")))
            .unwrap_err();
        assert!(matches!(err, SettingsError::Base64 { .. }));
        assert!(err.is_decode_failure());
    }

    #[test]
    fn embedded_line_breaks_are_ignored() {
        let record =
            decode_known_paths(&path("/zones/1/name"), value_record(json!("V2Vs\nbA=="))).unwrap();
        assert_eq!(record.get("value"), Some(&json!("Well")));

        let record = decode_known_paths(
            &path("/energy/currency"),
            value_record(json!(" R0\r\nJQ\t")),
        )
        .unwrap();
        assert_eq!(record.get("value"), Some(&json!("GBP")));
    }

    #[test]
    fn nonzero_trailing_bits_are_tolerated() {
        let record =
            decode_known_paths(&path("/zones/1/name"), value_record(json!("QR=="))).unwrap();
        assert_eq!(record.get("value"), Some(&json!("A")));
    }

    #[test]
    fn missing_padding_still_fails() {
        let err =
            decode_known_paths(&path("/zones/1/name"), value_record(json!("QQ"))).unwrap_err();
        assert!(matches!(err, SettingsError::Base64 { .. }));
    }

    #[test]
    fn non_utf8_payload_fails() {
        // 0xFF 0xFE
        let err =
            decode_known_paths(&path("/zones/1/name"), value_record(json!("//4="))).unwrap_err();
        assert!(matches!(err, SettingsError::Utf8 { .. }));
    }

    #[test]
    fn missing_value_fails_when_rule_matches() {
        let err = decode_known_paths(&path("/zones/1/name"), SettingRecord::new()).unwrap_err();
        assert!(matches!(err, SettingsError::MissingField { .. }));
    }

    #[test]
    fn non_string_value_fails_when_rule_matches() {
        let err =
            decode_known_paths(&path("/energy/currency"), value_record(json!(3))).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::UnexpectedType {
                expected: "string",
                ..
            }
        ));
    }

    #[test]
    fn segment_predicates() {
        assert!(Segment::Any.matches(""));
        assert!(Segment::Is("zones").matches("zones"));
        assert!(!Segment::Is("zones").matches("Zones"));
        assert!(Segment::OneOf(&["a", "b"]).matches("b"));
        assert!(!Segment::OneOf(&["a", "b"]).matches("c"));
    }
}
