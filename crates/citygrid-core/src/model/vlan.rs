// ── VLAN domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::color::HexColor;

/// Integer VLAN identifier.
pub type VlanId = u32;

/// Link VLAN id marking a connection between two segments.
pub const CROSS_VLAN: VlanId = 0;

/// Security posture of a VLAN segment.
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
pub enum SecurityLevel {
    Low,
    Medium,
    High,
}

/// A logical network segment.
///
/// `devices` is a denormalized member list kept alongside each device's
/// `vlan_id`; the two can drift, which the consistency report flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VlanNetwork {
    pub id: VlanId,
    pub name: String,
    /// CIDR notation, e.g. `10.10.0.0/24`.
    pub subnet: String,
    pub description: String,
    pub devices: Vec<String>,
    pub color: HexColor,
    /// Percentage, 0-100.
    pub traffic_load: u8,
    pub security_level: SecurityLevel,
    pub department: String,
}

impl VlanNetwork {
    /// `VLAN {id} - {name}`, as shown in filter dropdowns.
    pub fn display_name(&self) -> String {
        format!("VLAN {} - {}", self.id, self.name)
    }

    pub fn has_member(&self, device_id: &str) -> bool {
        self.devices.iter().any(|d| d == device_id)
    }
}
