// ── Live backend snapshot ──
//
// One immutable generation of backend state. A poll cycle builds a new
// snapshot from all three responses; a simulate patch derives the next
// snapshot from the current one.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use citygrid_api::{DeviceMap, RuleMap, SimulateResponse, VlanAssignmentMap};
use indexmap::IndexMap;

use crate::charts::{self, LiveOverview};
use crate::model::{LiveAssignment, LiveDevice, RuleSet, VlanId};

/// Devices, VLAN assignments and rules as last seen on the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveSnapshot {
    devices: IndexMap<String, LiveDevice>,
    assignments: IndexMap<String, LiveAssignment>,
    rules: RuleSet,
    fetched_at: Option<DateTime<Utc>>,
}

impl LiveSnapshot {
    /// Build from one complete poll cycle.
    pub fn from_fetch(devices: &DeviceMap, vlans: &VlanAssignmentMap, rules: &RuleMap) -> Self {
        Self {
            devices: devices
                .iter()
                .map(|(id, record)| (id.clone(), LiveDevice::from_record(id, record)))
                .collect(),
            assignments: vlans
                .iter()
                .map(|(id, a)| (id.clone(), LiveAssignment::from_wire(id, a)))
                .collect(),
            rules: RuleSet::from_rule_map(rules),
            fetched_at: Some(Utc::now()),
        }
    }

    /// The next snapshot after a successful simulation: the one device and
    /// its assignment (when the backend returned one) are upserted.
    pub fn with_simulation(&self, response: &SimulateResponse) -> Self {
        let mut next = self.clone();
        let id = response.device_id().to_owned();
        next.devices
            .insert(id.clone(), LiveDevice::from_record(&id, &response.device));
        if let Some(vlan) = &response.vlan {
            next.assignments
                .insert(id.clone(), LiveAssignment::from_wire(&id, vlan));
        }
        next
    }

    pub fn with_rules(&self, rules: RuleSet) -> Self {
        Self {
            rules,
            ..self.clone()
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn devices(&self) -> impl Iterator<Item = &LiveDevice> {
        self.devices.values()
    }

    pub fn assignments(&self) -> impl Iterator<Item = &LiveAssignment> {
        self.assignments.values()
    }

    pub fn device(&self, id: &str) -> Option<&LiveDevice> {
        self.devices.get(id)
    }

    pub fn assignment(&self, device_id: &str) -> Option<&LiveAssignment> {
        self.assignments.get(device_id)
    }

    /// VLAN the backend assigned to `device_id`.
    pub fn vlan_of(&self, device_id: &str) -> Option<VlanId> {
        self.assignments.get(device_id).map(|a| a.vlan_id)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// When the last full poll landed. `None` until the first success.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty() && self.assignments.is_empty()
    }

    /// Devices grouped under their assigned VLAN, ascending by VLAN id.
    pub fn devices_by_vlan(&self) -> BTreeMap<VlanId, Vec<&LiveDevice>> {
        let mut grouped: BTreeMap<VlanId, Vec<&LiveDevice>> = BTreeMap::new();
        for a in self.assignments.values() {
            if let Some(device) = self.devices.get(&a.device_id) {
                grouped.entry(a.vlan_id).or_default().push(device);
            }
        }
        grouped
    }

    pub fn overview(&self) -> LiveOverview {
        let devices: Vec<LiveDevice> = self.devices.values().cloned().collect();
        let assignments: Vec<LiveAssignment> = self.assignments.values().cloned().collect();
        charts::live_overview(&devices, &assignments)
    }
}
