// Backend wire types
//
// Shapes returned by the assignment backend under `/api`. The backend keys
// every collection by device id and stores whatever the device published, so
// readings keep the well-known fields typed and everything else in `extra`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `GET /devices`: device id -> last reading.
pub type DeviceMap = BTreeMap<String, DeviceRecord>;

/// `GET /vlans`: device id -> current VLAN assignment.
pub type VlanAssignmentMap = BTreeMap<String, VlanAssignment>;

/// `GET /rules`: parameter name -> level name -> threshold rule.
pub type RuleMap = BTreeMap<String, BTreeMap<String, RuleThreshold>>;

// ── Devices ──────────────────────────────────────────────────────────

/// One stored device reading.
///
/// ```json
/// { "timestamp": 1718447400.5, "topic": "smartcity/sensor", "data": { "device_id": "sim-1", ... } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Epoch seconds (fractional) at which the backend stored the reading.
    pub timestamp: f64,
    pub topic: String,
    pub data: DevicePayload,
}

/// The payload a device published.
///
/// Decoding never fails on field types: the backend stores whatever a
/// device sent, so a well-known field with an unexpected type stays in
/// `extra` instead of rejecting the whole `GET /devices` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct DevicePayload {
    pub device_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic: Option<f64>,
    #[serde(default, rename = "airQuality", skip_serializing_if = "Option::is_none")]
    pub air_quality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<Value>,
    /// Catch-all for fields the backend passes through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for DevicePayload {
    fn from(mut raw: Map<String, Value>) -> Self {
        Self {
            device_id: take_string(&mut raw, "device_id").unwrap_or_default(),
            name: take_string(&mut raw, "name"),
            kind: take_string(&mut raw, "type"),
            location: take_string(&mut raw, "location"),
            temperature: take_number(&mut raw, "temperature"),
            traffic: take_number(&mut raw, "traffic"),
            air_quality: take_number(&mut raw, "airQuality"),
            camera: raw.remove("camera").filter(|v| !v.is_null()),
            extra: raw,
        }
    }
}

/// Remove `key` if it holds a string. Any other non-null value is put back.
fn take_string(raw: &mut Map<String, Value>, key: &str) -> Option<String> {
    match raw.remove(key)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => {
            raw.insert(key.to_owned(), other);
            None
        }
    }
}

/// Remove `key` if it holds a number. Any other non-null value is put back.
fn take_number(raw: &mut Map<String, Value>, key: &str) -> Option<f64> {
    match raw.remove(key)? {
        Value::Number(n) => n.as_f64(),
        Value::Null => None,
        other => {
            raw.insert(key.to_owned(), other);
            None
        }
    }
}

// ── VLAN assignments ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VlanAssignment {
    pub vlan_id: u32,
    #[serde(default)]
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// ── Rules ────────────────────────────────────────────────────────────

/// A single level of a parameter rule: values at or above `threshold`
/// land on `vlan`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleThreshold {
    pub threshold: f64,
    pub vlan: u32,
}

/// Response to `POST /rules`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RulesUpdateResponse {
    pub status: String,
    pub rules: RuleMap,
}

// ── Simulation ───────────────────────────────────────────────────────

/// Body for `POST /simulate`.
///
/// An absent `device_id` lets the backend generate `sim-{epoch}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic: Option<f64>,
    #[serde(rename = "airQuality", skip_serializing_if = "Option::is_none")]
    pub air_quality: Option<f64>,
    pub location: String,
}

/// Response to `POST /simulate`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulateResponse {
    #[serde(default)]
    pub status: String,
    pub device: DeviceRecord,
    #[serde(default)]
    pub vlan: Option<VlanAssignment>,
}

impl SimulateResponse {
    /// Id of the device the backend stored.
    pub fn device_id(&self) -> &str {
        &self.device.data.device_id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_keeps_unknown_fields() {
        let payload: DevicePayload = serde_json::from_value(json!({
            "device_id": "cam-7",
            "type": "security",
            "fps": 30,
            "airQuality": 112
        }))
        .unwrap();

        assert_eq!(payload.kind.as_deref(), Some("security"));
        assert_eq!(payload.air_quality, Some(112.0));
        assert_eq!(payload.extra.get("fps"), Some(&json!(30)));
    }

    #[test]
    fn mistyped_fields_fall_back_to_extra() {
        let payload: DevicePayload = serde_json::from_value(json!({
            "device_id": "odd-1",
            "temperature": "22.5",
            "name": 7,
            "traffic": null,
            "airQuality": 40
        }))
        .unwrap();

        assert_eq!(payload.device_id, "odd-1");
        assert_eq!(payload.temperature, None);
        assert_eq!(payload.name, None);
        assert_eq!(payload.traffic, None);
        assert_eq!(payload.air_quality, Some(40.0));
        assert_eq!(payload.extra.get("temperature"), Some(&json!("22.5")));
        assert_eq!(payload.extra.get("name"), Some(&json!(7)));
        assert!(!payload.extra.contains_key("traffic"));
    }

    #[test]
    fn device_map_decodes_around_a_bad_record() {
        let map: DeviceMap = serde_json::from_value(json!({
            "tr-1": {
                "timestamp": 1.0,
                "topic": "smartcity/traffic",
                "data": { "device_id": "tr-1", "traffic": 91 }
            },
            "odd-1": {
                "timestamp": 2.0,
                "topic": "smartcity/sensor",
                "data": { "device_id": "odd-1", "temperature": "22.5", "camera": [1, 2] }
            }
        }))
        .unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map["tr-1"].data.traffic, Some(91.0));
        assert_eq!(map["odd-1"].data.camera, Some(json!([1, 2])));
    }

    #[test]
    fn simulate_request_omits_missing_fields() {
        let req = SimulateRequest {
            device_id: None,
            name: "Test Sensor".into(),
            kind: "sensor".into(),
            temperature: Some(22.0),
            traffic: None,
            air_quality: None,
            location: "X".into(),
        };

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({ "name": "Test Sensor", "type": "sensor", "temperature": 22.0, "location": "X" })
        );
    }
}
