// ── Filter predicates ──
//
// Used by the CLI and the TUI to narrow snapshots without touching the
// store. All filters keep the source collection's order.

use std::sync::Arc;

use serde::Serialize;

use crate::model::{
    Device, DeviceStatus, DeviceType, LiveDevice, NetworkLink, NetworkNode, VlanId,
};

/// Search text plus categorical filters for the device list.
///
/// `None` in a categorical slot is the "all" state and always passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceQuery {
    pub search: String,
    pub status: Option<DeviceStatus>,
    pub vlan: Option<VlanId>,
    pub device_type: Option<DeviceType>,
}

impl DeviceQuery {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.status.is_none()
            && self.vlan.is_none()
            && self.device_type.is_none()
    }

    /// Case-insensitive substring match on name or location, plain match
    /// on the address, AND exact match on every active filter.
    pub fn matches(&self, device: &Device) -> bool {
        self.matches_search(device)
            && self.status.is_none_or(|s| device.status == s)
            && self.vlan.is_none_or(|v| device.vlan_id == v)
            && self.device_type.is_none_or(|t| device.device_type == t)
    }

    fn matches_search(&self, device: &Device) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        device.name.to_lowercase().contains(&needle)
            || device.ip.contains(&self.search)
            || device.location.to_lowercase().contains(&needle)
    }

    pub fn apply(&self, devices: &[Arc<Device>]) -> Vec<Arc<Device>> {
        devices
            .iter()
            .filter(|d| self.matches(d))
            .cloned()
            .collect()
    }
}

/// Search plus category filter for live backend devices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveQuery {
    pub search: String,
    /// Case-insensitive substring of the reading category.
    pub category: Option<String>,
}

impl LiveQuery {
    pub fn matches(&self, device: &LiveDevice) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || device.id.to_lowercase().contains(&needle)
            || device
                .name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&needle));

        let matches_category = self.category.as_deref().is_none_or(|c| {
            device
                .reading
                .category()
                .to_lowercase()
                .contains(&c.to_lowercase())
        });

        matches_search && matches_category
    }
}

// ── Topology projections ─────────────────────────────────────────────

/// Nodes visible under the VLAN selection: all of them when nothing is
/// selected, otherwise those whose `vlan_id` equals the selection.
pub fn filtered_nodes(nodes: &[Arc<NetworkNode>], selected: Option<VlanId>) -> Vec<Arc<NetworkNode>> {
    match selected {
        None => nodes.to_vec(),
        Some(vlan) => nodes.iter().filter(|n| n.vlan_id == vlan).cloned().collect(),
    }
}

/// Links visible under the VLAN selection.
///
/// A link is kept iff its own VLAN is the selection, or either endpoint's
/// node belongs to it. An endpoint that does not resolve never matches.
pub fn filtered_links<F>(
    links: &[Arc<NetworkLink>],
    selected: Option<VlanId>,
    node_vlan: F,
) -> Vec<Arc<NetworkLink>>
where
    F: Fn(&str) -> Option<VlanId>,
{
    let Some(vlan) = selected else {
        return links.to_vec();
    };

    links
        .iter()
        .filter(|link| {
            link.vlan_id == vlan
                || node_vlan(&link.source) == Some(vlan)
                || node_vlan(&link.target) == Some(vlan)
        })
        .cloned()
        .collect()
}
