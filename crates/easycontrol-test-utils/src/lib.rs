//! Testing utilities for EasyControl workspace
//!
//! Shared fixtures: record builders, base64 helpers and a sample settings dump.

#![allow(missing_docs)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use easycontrol_settings::SettingRecord;
use serde_json::{json, Value};

/// base64-encode text the way the thermostat stores it
pub fn encode_text(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Record with the given `id` and extra fields taken from a JSON object
pub fn record(id: &str, fields: Value) -> SettingRecord {
    let mut record = SettingRecord::new().with("id", id);
    if let Value::Object(map) = fields {
        for (key, value) in map {
            record.insert(key, value);
        }
    }
    record
}

/// Record with only an `id` and a `value`
pub fn value_record(id: &str, value: impl Into<Value>) -> SettingRecord {
    SettingRecord::new().with("id", id).with("value", value)
}

/// A small but representative settings dump, as exported by the gateway
pub fn sample_settings_dump() -> Value {
    json!([
        {
            "id": "/gateway/uuid",
            "type": "stringValue",
            "value": "123456789",
            "writeable": 0,
            "recordable": 0
        },
        {
            "id": "/gateway/user/name",
            "type": "stringValue",
            "value": encode_text("Matthew"),
            "writeable": 1,
            "recordable": 0
        },
        {
            "id": "/gateway/user/address",
            "type": "arrayData",
            "value": [{
                "address": encode_text("1 High Street"),
                "city": encode_text("London"),
                "country": encode_text("UK"),
                "state": encode_text(""),
                "zip": encode_text("SW1A 1AA")
            }],
            "writeable": 1,
            "recordable": 0
        },
        {
            "id": "/gateway/installer/companyName",
            "type": "stringValue",
            "value": encode_text("Heating & Co"),
            "writeable": 1,
            "recordable": 0
        },
        {
            "id": "/energy/currency",
            "type": "stringValue",
            "value": encode_text("GBP"),
            "writeable": 1,
            "recordable": 0
        },
        {
            "id": "/zones/1/name",
            "type": "stringValue",
            "value": encode_text("Living Room"),
            "writeable": 1,
            "recordable": 0
        },
        {
            "id": "/zones/1/temperatureActual",
            "type": "floatValue",
            "value": 20.5,
            "unitOfMeasure": "C",
            "writeable": 0,
            "recordable": 1
        },
        {
            "id": "/devices/1",
            "type": "arrayData",
            "value": [{
                "dlk": "3014F711A0001F5A49A8FE1D",
                "name": encode_text("Hallway TRV"),
                "type": "TRV",
                "zone": 1
            }],
            "writeable": 0,
            "recordable": 0
        },
        {
            "id": "/devices/1/available",
            "type": "stringValue",
            "value": "true",
            "available": "true",
            "writeable": "false",
            "recordable": 0
        },
        {
            "id": "/system/autoAway/users/0/name",
            "type": "stringValue",
            "value": encode_text("Matt's phone"),
            "used": "true",
            "writeable": 1,
            "recordable": 0
        }
    ])
}

/// [`sample_settings_dump`] as JSON text
pub fn sample_settings_json() -> String {
    serde_json::to_string_pretty(&sample_settings_dump()).unwrap_or_default()
}
