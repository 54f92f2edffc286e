// ── Referential consistency report ──
//
// Device VLAN ids, link endpoints and VLAN member lists are stored
// independently and can disagree. Nothing enforces agreement; this report
// only describes it.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::Serialize;

use crate::model::{Device, NetworkLink, VlanId, VlanNetwork};

/// A device whose `vlan_id` names no known VLAN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingVlan {
    pub device_id: String,
    pub vlan_id: VlanId,
}

/// A link endpoint that names no known device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingEndpoint {
    pub link: String,
    pub device_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftKind {
    /// Listed as a member but assigned elsewhere.
    ListedNotAssigned,
    /// Assigned to the VLAN but absent from its member list.
    AssignedNotListed,
    /// Listed as a member but no such device exists.
    UnknownMember,
}

/// Disagreement between a VLAN's member list and device assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipDrift {
    pub vlan_id: VlanId,
    pub device_id: String,
    pub kind: DriftKind,
    /// The VLAN the device is actually assigned to, when it exists.
    pub assigned_vlan: Option<VlanId>,
}

/// Several VLANs declaring the same subnet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedSubnet {
    pub subnet: String,
    pub vlans: Vec<VlanId>,
}

/// Informational cross-reference report over the inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    pub dangling_vlans: Vec<DanglingVlan>,
    pub dangling_endpoints: Vec<DanglingEndpoint>,
    pub membership_drift: Vec<MembershipDrift>,
    pub shared_subnets: Vec<SharedSubnet>,
}

impl ConsistencyReport {
    pub fn build(
        vlans: &[Arc<VlanNetwork>],
        devices: &[Arc<Device>],
        links: &[Arc<NetworkLink>],
    ) -> Self {
        let vlan_ids: HashSet<VlanId> = vlans.iter().map(|v| v.id).collect();
        let assigned: BTreeMap<&str, VlanId> =
            devices.iter().map(|d| (d.id.as_str(), d.vlan_id)).collect();

        let dangling_vlans = devices
            .iter()
            .filter(|d| !vlan_ids.contains(&d.vlan_id))
            .map(|d| DanglingVlan {
                device_id: d.id.clone(),
                vlan_id: d.vlan_id,
            })
            .collect();

        let dangling_endpoints = links
            .iter()
            .flat_map(|l| [(l, &l.source), (l, &l.target)])
            .filter(|(_, id)| !assigned.contains_key(id.as_str()))
            .map(|(l, id)| DanglingEndpoint {
                link: l.key(),
                device_id: id.clone(),
            })
            .collect();

        let mut membership_drift = Vec::new();
        for vlan in vlans {
            for member in &vlan.devices {
                match assigned.get(member.as_str()) {
                    None => membership_drift.push(MembershipDrift {
                        vlan_id: vlan.id,
                        device_id: member.clone(),
                        kind: DriftKind::UnknownMember,
                        assigned_vlan: None,
                    }),
                    Some(&actual) if actual != vlan.id => membership_drift.push(MembershipDrift {
                        vlan_id: vlan.id,
                        device_id: member.clone(),
                        kind: DriftKind::ListedNotAssigned,
                        assigned_vlan: Some(actual),
                    }),
                    Some(_) => {}
                }
            }
            for device in devices.iter().filter(|d| d.vlan_id == vlan.id) {
                if !vlan.has_member(&device.id) {
                    membership_drift.push(MembershipDrift {
                        vlan_id: vlan.id,
                        device_id: device.id.clone(),
                        kind: DriftKind::AssignedNotListed,
                        assigned_vlan: Some(vlan.id),
                    });
                }
            }
        }

        let mut by_subnet: BTreeMap<&str, Vec<VlanId>> = BTreeMap::new();
        for vlan in vlans {
            by_subnet.entry(vlan.subnet.as_str()).or_default().push(vlan.id);
        }
        let shared_subnets = by_subnet
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(subnet, vlans)| SharedSubnet {
                subnet: subnet.to_owned(),
                vlans,
            })
            .collect();

        Self {
            dangling_vlans,
            dangling_endpoints,
            membership_drift,
            shared_subnets,
        }
    }

    pub fn issue_count(&self) -> usize {
        self.dangling_vlans.len()
            + self.dangling_endpoints.len()
            + self.membership_drift.len()
            + self.shared_subnets.len()
    }

    pub fn is_clean(&self) -> bool {
        self.issue_count() == 0
    }
}
