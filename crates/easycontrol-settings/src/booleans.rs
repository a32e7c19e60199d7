//! Boolean normalization for inconsistently typed flag fields
//!
//! Settings dumps store some flags as `"true"`/`"false"` strings or as `0`/`1`
//! numbers. Only the fields in [`BOOLEAN_FIELDS`] are touched, and only values
//! that map unambiguously are converted; everything else passes through.

use serde_json::Value;

use crate::record::SettingRecord;

/// Field names known to carry boolean flags
pub const BOOLEAN_FIELDS: [&str; 4] = ["available", "recordable", "used", "writeable"];

/// Map a single value to a JSON boolean where it unambiguously is one
///
/// `"false"` and numeric zero become `false`; `"true"` and numeric one become
/// `true`. Any other value, including existing booleans, is returned as-is.
#[must_use]
pub fn normalize_value(value: Value) -> Value {
    match as_flag(&value) {
        Some(flag) => Value::Bool(flag),
        None => value,
    }
}

/// Normalize every known boolean field present on `record`
#[must_use]
pub fn normalize_booleans(mut record: SettingRecord) -> SettingRecord {
    for field in BOOLEAN_FIELDS {
        if let Some(slot) = record.get_mut(field) {
            if let Some(flag) = as_flag(slot) {
                tracing::trace!(field, flag, "normalized boolean field");
                *slot = Value::Bool(flag);
            }
        }
    }
    record
}

#[allow(clippy::float_cmp)]
fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::String(s) if s == "false" => Some(false),
        Value::String(s) if s == "true" => Some(true),
        Value::Number(n) => match n.as_f64() {
            Some(x) if x == 0.0 => Some(false),
            Some(x) if x == 1.0 => Some(true),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_and_integers_convert() {
        assert_eq!(normalize_value(json!("false")), json!(false));
        assert_eq!(normalize_value(json!(0)), json!(false));
        assert_eq!(normalize_value(json!("true")), json!(true));
        assert_eq!(normalize_value(json!(1)), json!(true));
    }

    #[test]
    fn numerically_equal_floats_convert() {
        assert_eq!(normalize_value(json!(0.0)), json!(false));
        assert_eq!(normalize_value(json!(1.0)), json!(true));
    }

    #[test]
    fn booleans_untouched() {
        assert_eq!(normalize_value(json!(true)), json!(true));
        assert_eq!(normalize_value(json!(false)), json!(false));
    }

    #[test]
    fn unmatched_values_untouched() {
        assert_eq!(normalize_value(json!("yes")), json!("yes"));
        assert_eq!(normalize_value(json!("False")), json!("False"));
        assert_eq!(normalize_value(json!(2)), json!(2));
        assert_eq!(normalize_value(json!(-1)), json!(-1));
        assert_eq!(normalize_value(json!(null)), json!(null));
        assert_eq!(normalize_value(json!([1])), json!([1]));
    }

    #[test]
    fn only_known_fields_are_normalized() {
        let record = SettingRecord::new()
            .with("available", "false")
            .with("recordable", 1)
            .with("used", "true")
            .with("writeable", 0)
            .with("value", "true")
            .with("maxValue", 1);

        let normalized = normalize_booleans(record);
        assert_eq!(normalized.get("available"), Some(&json!(false)));
        assert_eq!(normalized.get("recordable"), Some(&json!(true)));
        assert_eq!(normalized.get("used"), Some(&json!(true)));
        assert_eq!(normalized.get("writeable"), Some(&json!(false)));
        assert_eq!(normalized.get("value"), Some(&json!("true")));
        assert_eq!(normalized.get("maxValue"), Some(&json!(1)));
    }

    #[test]
    fn absent_fields_are_not_added() {
        let normalized = normalize_booleans(SettingRecord::new().with("value", 3));
        assert_eq!(normalized.len(), 1);
        assert!(normalized.get("available").is_none());
    }
}
