// ── Live backend readings ──
//
// Readings arrive as free-form payloads. They are classified once, at
// ingestion, into a `SensorReading` so views never re-inspect raw fields.

use chrono::{DateTime, TimeZone, Utc};
use citygrid_api::{DevicePayload, DeviceRecord, VlanAssignment};
use serde::Serialize;

use super::vlan::VlanId;

const TOPIC_PREFIX: &str = "smartcity/";

/// What a live device measures, decided from its payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum SensorReading {
    Traffic {
        traffic: f64,
    },
    Environment {
        temperature: f64,
        air_quality: Option<f64>,
    },
    Security {
        camera: serde_json::Value,
    },
    AirQuality {
        air_quality: f64,
    },
    Generic {
        kind: String,
    },
}

impl SensorReading {
    /// Classify a payload. Zero-valued fields count as absent; the first
    /// of traffic, temperature, camera, air quality wins, otherwise the
    /// topic suffix names the kind.
    pub fn classify(payload: &DevicePayload, topic: &str) -> Self {
        if let Some(traffic) = payload.traffic.filter(|v| *v != 0.0) {
            return Self::Traffic { traffic };
        }
        if let Some(temperature) = payload.temperature.filter(|v| *v != 0.0) {
            return Self::Environment {
                temperature,
                air_quality: payload.air_quality,
            };
        }
        if let Some(camera) = payload.camera.as_ref().filter(|v| is_truthy(v)) {
            return Self::Security {
                camera: camera.clone(),
            };
        }
        if let Some(air_quality) = payload.air_quality.filter(|v| *v != 0.0) {
            return Self::AirQuality { air_quality };
        }

        let kind = topic
            .strip_prefix(TOPIC_PREFIX)
            .or_else(|| topic.split('/').nth(1))
            .filter(|s| !s.is_empty())
            .unwrap_or("unknown");
        Self::Generic {
            kind: kind.to_owned(),
        }
    }

    /// Category label used for grouping and filtering.
    pub fn category(&self) -> &str {
        match self {
            Self::Traffic { .. } => "Traffic",
            Self::Environment { .. } => "Environment",
            Self::Security { .. } => "Security",
            Self::AirQuality { .. } => "Air Quality",
            Self::Generic { kind } => kind,
        }
    }

    /// Short value summary, e.g. `traffic 91`.
    pub fn summary(&self) -> String {
        match self {
            Self::Traffic { traffic } => format!("traffic {traffic}"),
            Self::Environment {
                temperature,
                air_quality: Some(aq),
            } => format!("{temperature}°C, AQ {aq}"),
            Self::Environment { temperature, .. } => format!("{temperature}°C"),
            Self::Security { camera } => format!("camera {camera}"),
            Self::AirQuality { air_quality } => format!("AQ {air_quality}"),
            Self::Generic { .. } => String::from("-"),
        }
    }
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

/// A device as last reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveDevice {
    pub id: String,
    pub name: Option<String>,
    pub kind: Option<String>,
    pub location: Option<String>,
    pub topic: String,
    pub timestamp: DateTime<Utc>,
    pub reading: SensorReading,
    /// Numeric parameters present in the payload, keyed by wire name.
    pub parameters: Vec<(String, f64)>,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LiveDevice {
    /// Ingest a stored record. `key` is the map key the backend used; it is
    /// preferred over the payload's own id when they differ.
    pub fn from_record(key: &str, record: &DeviceRecord) -> Self {
        let payload = &record.data;
        let mut parameters = Vec::new();
        for (name, value) in [
            ("temperature", payload.temperature),
            ("traffic", payload.traffic),
            ("airQuality", payload.air_quality),
        ] {
            if let Some(v) = value {
                parameters.push((name.to_owned(), v));
            }
        }

        Self {
            id: key.to_owned(),
            name: payload.name.clone(),
            kind: payload.kind.clone(),
            location: payload.location.clone(),
            topic: record.topic.clone(),
            timestamp: epoch_to_utc(record.timestamp),
            reading: SensorReading::classify(payload, &record.topic),
            parameters,
            extra: payload.extra.clone(),
        }
    }

    /// Name if published, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A device's VLAN assignment as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveAssignment {
    pub device_id: String,
    pub vlan_id: VlanId,
    pub timestamp: DateTime<Utc>,
    pub reason: Option<String>,
}

impl LiveAssignment {
    pub fn from_wire(device_id: &str, assignment: &VlanAssignment) -> Self {
        Self {
            device_id: device_id.to_owned(),
            vlan_id: assignment.vlan_id,
            timestamp: epoch_to_utc(assignment.timestamp),
            reason: assignment.reason.clone(),
        }
    }
}

/// Fractional epoch seconds to UTC, clamping garbage to the epoch.
#[allow(clippy::as_conversions, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn epoch_to_utc(secs: f64) -> DateTime<Utc> {
    if !secs.is_finite() || secs < 0.0 {
        return DateTime::<Utc>::UNIX_EPOCH;
    }
    let whole = secs.trunc() as i64;
    let nanos = ((secs - secs.trunc()) * 1e9) as u32;
    Utc.timestamp_opt(whole, nanos)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> DevicePayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn traffic_wins_over_temperature() {
        let p = payload(json!({ "device_id": "a", "traffic": 60, "temperature": 20 }));
        assert_eq!(
            SensorReading::classify(&p, "smartcity/sensor"),
            SensorReading::Traffic { traffic: 60.0 }
        );
    }

    #[test]
    fn zero_readings_fall_through_to_topic() {
        let p = payload(json!({ "device_id": "a", "traffic": 0, "temperature": 0 }));
        let reading = SensorReading::classify(&p, "smartcity/environment");
        assert_eq!(reading.category(), "environment");
    }

    #[test]
    fn camera_flag_marks_security() {
        let p = payload(json!({ "device_id": "cam", "camera": true }));
        assert_eq!(SensorReading::classify(&p, "smartcity/x").category(), "Security");
    }

    #[test]
    fn unknown_topic_is_labelled_unknown() {
        let p = payload(json!({ "device_id": "x" }));
        assert_eq!(SensorReading::classify(&p, "").category(), "unknown");
    }

    #[test]
    fn fractional_timestamps_convert() {
        let ts = epoch_to_utc(1_718_447_400.5);
        assert_eq!(ts.timestamp(), 1_718_447_400);
        assert_eq!(ts.timestamp_subsec_millis(), 500);
        assert_eq!(epoch_to_utc(f64::NAN), DateTime::<Utc>::UNIX_EPOCH);
    }
}
