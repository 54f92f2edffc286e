// ── Device domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::color::{HexColor, palette};
use super::vlan::VlanId;

/// Kind of hardware a device is.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(ascii_case_insensitive)]
pub enum DeviceType {
    #[strum(to_string = "router")]
    Router,
    #[strum(to_string = "switch")]
    Switch,
    #[strum(to_string = "accessPoint", serialize = "access-point", serialize = "ap")]
    AccessPoint,
    #[strum(to_string = "sensor")]
    Sensor,
    #[strum(to_string = "camera")]
    Camera,
    #[strum(to_string = "controller")]
    Controller,
}

impl DeviceType {
    /// Human-readable label for tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::Router => "Router",
            Self::Switch => "Switch",
            Self::AccessPoint => "Access Point",
            Self::Sensor => "Sensor",
            Self::Camera => "Camera",
            Self::Controller => "Controller",
        }
    }

    /// One- or two-letter glyph drawn inside topology nodes.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Router => "R",
            Self::Switch => "S",
            Self::AccessPoint => "A",
            Self::Sensor => "Se",
            Self::Camera => "C",
            Self::Controller => "Co",
        }
    }
}

/// Operational status of a device.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceStatus {
    Online,
    Offline,
    Warning,
    Maintenance,
}

impl DeviceStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Offline => "Offline",
            Self::Warning => "Warning",
            Self::Maintenance => "Maintenance",
        }
    }

    /// Chart color for this status.
    pub fn color(self) -> HexColor {
        match self {
            Self::Online => palette::GREEN,
            Self::Offline => palette::RED,
            Self::Warning => palette::AMBER,
            Self::Maintenance => palette::GRAY,
        }
    }
}

/// A network device in the city inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub status: DeviceStatus,
    /// Network address as published, searched as plain text.
    pub ip: String,
    pub location: String,
    pub vlan_id: VlanId,
}

impl Device {
    pub fn is_online(&self) -> bool {
        self.status == DeviceStatus::Online
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn device_type_parses_wire_and_cli_spellings() {
        assert_eq!("accessPoint".parse::<DeviceType>().unwrap(), DeviceType::AccessPoint);
        assert_eq!("access-point".parse::<DeviceType>().unwrap(), DeviceType::AccessPoint);
        assert_eq!("Router".parse::<DeviceType>().unwrap(), DeviceType::Router);
        assert_eq!(DeviceType::AccessPoint.to_string(), "accessPoint");
    }

    #[test]
    fn device_serializes_with_camel_case_keys() {
        let device = Device {
            id: "dev-001".into(),
            name: "Traffic Controller Alpha".into(),
            device_type: DeviceType::Controller,
            status: DeviceStatus::Online,
            ip: "10.10.0.10".into(),
            location: "Main Street & 5th Ave".into(),
            vlan_id: 10,
        };
        let value = serde_json::to_value(&device).unwrap();
        assert_eq!(value["type"], "controller");
        assert_eq!(value["vlanId"], 10);
        assert_eq!(value["status"], "online");
    }
}
