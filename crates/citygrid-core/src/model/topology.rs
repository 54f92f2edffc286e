// ── Topology projections ──

use serde::{Deserialize, Serialize};

use super::device::{Device, DeviceStatus, DeviceType};
use super::vlan::{CROSS_VLAN, VlanId};

/// Canvas projection of a device, carrying its drawing position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub status: DeviceStatus,
    pub vlan_id: VlanId,
    pub x: f64,
    pub y: f64,
}

impl NetworkNode {
    /// Project a device onto the canvas at `(x, y)`.
    pub fn from_device(device: &Device, x: f64, y: f64) -> Self {
        Self {
            id: device.id.clone(),
            label: device.name.clone(),
            device_type: device.device_type,
            status: device.status,
            vlan_id: device.vlan_id,
            x,
            y,
        }
    }

    /// Squared distance from `(x, y)` in logical coordinates.
    pub fn distance_sq(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }
}

/// A connection between two devices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkLink {
    pub source: String,
    pub target: String,
    /// Connection strength in `[0, 1]`; drives width and opacity.
    pub strength: f64,
    pub vlan_id: VlanId,
}

impl NetworkLink {
    pub fn is_cross_vlan(&self) -> bool {
        self.vlan_id == CROSS_VLAN
    }

    /// Whether `device_id` is either endpoint.
    pub fn touches(&self, device_id: &str) -> bool {
        self.source == device_id || self.target == device_id
    }

    /// Collection key; links have no id of their own.
    pub fn key(&self) -> String {
        format!("{}->{}", self.source, self.target)
    }
}
