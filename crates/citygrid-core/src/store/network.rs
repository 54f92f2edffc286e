// ── Data provider ──
//
// Owns the city inventory and the two pieces of view selection state.
// Passed down explicitly (usually as `Arc<NetworkStore>`); nothing here is
// global. Mutations are broadcast to subscribers via `watch` channels.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tracing::{debug, warn};

use super::collection::EntityCollection;
use super::consistency::ConsistencyReport;
use crate::error::CoreError;
use crate::filter;
use crate::model::{
    CROSS_VLAN, Device, DeviceStatus, NetworkLink, NetworkNode, TrafficDataset, VlanId,
    VlanNetwork,
};
use crate::seed::{self, Dataset};
use crate::stream::{EntityStream, Subscription};

/// Reactive store for devices, VLANs, topology and traffic history.
///
/// Reads are lock-free snapshots. Device mutations keep the mirrored
/// [`NetworkNode`] and the VLAN member lists in step.
pub struct NetworkStore {
    vlans: EntityCollection<VlanNetwork>,
    devices: EntityCollection<Device>,
    nodes: EntityCollection<NetworkNode>,
    links: EntityCollection<NetworkLink>,
    traffic: Arc<TrafficDataset>,
    selected_vlan: watch::Sender<Option<VlanId>>,
    selected_device: watch::Sender<Option<String>>,
}

impl NetworkStore {
    /// An empty store with no traffic history.
    pub fn new() -> Self {
        let (selected_vlan, _) = watch::channel(None);
        let (selected_device, _) = watch::channel(None);

        Self {
            vlans: EntityCollection::new(),
            devices: EntityCollection::new(),
            nodes: EntityCollection::new(),
            links: EntityCollection::new(),
            traffic: Arc::new(TrafficDataset::default()),
            selected_vlan,
            selected_device,
        }
    }

    /// Load a dataset, scattering nodes with `rng`.
    ///
    /// The first VLAN wins for each id; later duplicates are dropped with a
    /// warning.
    pub fn from_dataset<R: Rng + ?Sized>(dataset: Dataset, rng: &mut R) -> Self {
        let mut store = Self::new();
        let nodes = seed::place_nodes(&dataset.devices, rng);

        let mut vlans: Vec<(String, VlanNetwork)> = Vec::with_capacity(dataset.vlans.len());
        for vlan in dataset.vlans {
            let key = vlan.id.to_string();
            if vlans.iter().any(|(k, _)| *k == key) {
                warn!(vlan = vlan.id, name = %vlan.name, "dropping VLAN with duplicate id");
                continue;
            }
            vlans.push((key, vlan));
        }

        store.vlans.replace_all(vlans);
        store
            .devices
            .replace_all(dataset.devices.into_iter().map(|d| (d.id.clone(), d)));
        store
            .nodes
            .replace_all(nodes.into_iter().map(|n| (n.id.clone(), n)));
        store
            .links
            .replace_all(dataset.links.into_iter().map(|l| (l.key(), l)));
        store.traffic = Arc::new(dataset.traffic);

        debug!(
            vlans = store.vlans.len(),
            devices = store.devices.len(),
            links = store.links.len(),
            "network store loaded"
        );
        store
    }

    /// The built-in seed dataset. A `seed` makes the node layout
    /// reproducible.
    pub fn seeded(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_dataset(seed::dataset(), &mut StdRng::seed_from_u64(seed)),
            None => Self::from_dataset(seed::dataset(), &mut rand::rng()),
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn vlans(&self) -> Arc<Vec<Arc<VlanNetwork>>> {
        self.vlans.snapshot()
    }

    pub fn devices(&self) -> Arc<Vec<Arc<Device>>> {
        self.devices.snapshot()
    }

    pub fn nodes(&self) -> Arc<Vec<Arc<NetworkNode>>> {
        self.nodes.snapshot()
    }

    pub fn links(&self) -> Arc<Vec<Arc<NetworkLink>>> {
        self.links.snapshot()
    }

    pub fn traffic(&self) -> Arc<TrafficDataset> {
        Arc::clone(&self.traffic)
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn device(&self, id: &str) -> Option<Arc<Device>> {
        self.devices.get(id)
    }

    pub fn vlan(&self, id: VlanId) -> Option<Arc<VlanNetwork>> {
        self.vlans.get(&id.to_string())
    }

    pub fn node(&self, id: &str) -> Option<Arc<NetworkNode>> {
        self.nodes.get(id)
    }

    /// The VLAN a device is assigned to, if both exist.
    pub fn vlan_for_device(&self, device_id: &str) -> Option<Arc<VlanNetwork>> {
        self.device(device_id).and_then(|d| self.vlan(d.vlan_id))
    }

    /// Devices whose `vlan_id` is `vlan`, in insertion order.
    pub fn devices_in_vlan(&self, vlan: VlanId) -> Vec<Arc<Device>> {
        self.devices
            .snapshot()
            .iter()
            .filter(|d| d.vlan_id == vlan)
            .cloned()
            .collect()
    }

    pub fn device_count_by_vlan(&self, vlan: VlanId) -> usize {
        self.devices
            .snapshot()
            .iter()
            .filter(|d| d.vlan_id == vlan)
            .count()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    // ── Selection state ──────────────────────────────────────────────

    pub fn selected_vlan(&self) -> Option<VlanId> {
        *self.selected_vlan.borrow()
    }

    /// Set the VLAN filter. The cross-VLAN sentinel `0` means no filter.
    pub fn set_selected_vlan(&self, vlan: Option<VlanId>) {
        let vlan = vlan.filter(|v| *v != CROSS_VLAN);
        self.selected_vlan.send_if_modified(|current| {
            let changed = *current != vlan;
            *current = vlan;
            changed
        });
    }

    /// Chip behaviour: selecting the active VLAN clears the filter.
    pub fn toggle_vlan(&self, vlan: VlanId) {
        if self.selected_vlan() == Some(vlan) {
            self.set_selected_vlan(None);
        } else {
            self.set_selected_vlan(Some(vlan));
        }
    }

    pub fn selected_device(&self) -> Option<String> {
        self.selected_device.borrow().clone()
    }

    pub fn set_selected_device(&self, device: Option<String>) {
        self.selected_device.send_if_modified(|current| {
            let changed = *current != device;
            *current = device;
            changed
        });
    }

    // ── Derived projections ──────────────────────────────────────────

    /// Nodes visible under the current VLAN selection.
    pub fn filtered_nodes(&self) -> Vec<Arc<NetworkNode>> {
        filter::filtered_nodes(&self.nodes.snapshot(), self.selected_vlan())
    }

    /// Links visible under the current VLAN selection.
    pub fn filtered_links(&self) -> Vec<Arc<NetworkLink>> {
        self.links_for(self.selected_vlan())
    }

    /// Links visible under an explicit selection, ignoring the stored one.
    pub fn links_for(&self, selected: Option<VlanId>) -> Vec<Arc<NetworkLink>> {
        filter::filtered_links(&self.links.snapshot(), selected, |id| {
            self.nodes.get(id).map(|n| n.vlan_id)
        })
    }

    /// Nodes visible under an explicit selection, ignoring the stored one.
    pub fn nodes_for(&self, selected: Option<VlanId>) -> Vec<Arc<NetworkNode>> {
        filter::filtered_nodes(&self.nodes.snapshot(), selected)
    }

    pub fn consistency_report(&self) -> ConsistencyReport {
        ConsistencyReport::build(
            &self.vlans.snapshot(),
            &self.devices.snapshot(),
            &self.links.snapshot(),
        )
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Add a VLAN. Ids are unique.
    pub fn add_vlan(&self, vlan: VlanNetwork) -> Result<(), CoreError> {
        if let Some(existing) = self.vlan(vlan.id) {
            return Err(CoreError::DuplicateVlan {
                id: vlan.id,
                existing: existing.name.clone(),
            });
        }
        self.vlans.upsert(vlan.id.to_string(), vlan);
        Ok(())
    }

    /// Add a device and its canvas node at a random position. The device
    /// joins its VLAN's member list when that VLAN exists.
    pub fn add_device<R: Rng + ?Sized>(&self, device: Device, rng: &mut R) -> Result<(), CoreError> {
        if self.devices.contains(&device.id) {
            return Err(CoreError::ValidationFailed {
                message: format!("device id '{}' already exists", device.id),
            });
        }

        let node = seed::place_nodes(std::slice::from_ref(&device), rng)
            .pop()
            .ok_or_else(|| CoreError::ValidationFailed {
                message: "node placement produced no node".into(),
            })?;

        let id = device.id.clone();
        let vlan_id = device.vlan_id;
        self.devices.upsert(id.clone(), device);
        self.nodes.upsert(id.clone(), node);
        self.vlans.update(&vlan_id.to_string(), |v| with_member(v, &id));
        Ok(())
    }

    /// Add a link. Endpoints are not checked; the consistency report flags
    /// dangling ones.
    pub fn add_link(&self, link: NetworkLink) {
        self.links.upsert(link.key(), link);
    }

    /// Commit a dragged node position.
    pub fn move_node(&self, id: &str, x: f64, y: f64) -> Result<(), CoreError> {
        self.nodes
            .update(id, |n| NetworkNode { x, y, ..n.clone() })
            .map(|_| ())
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: id.to_owned(),
            })
    }

    pub fn set_device_status(&self, id: &str, status: DeviceStatus) -> Result<(), CoreError> {
        self.devices
            .update(id, |d| Device {
                status,
                ..d.clone()
            })
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: id.to_owned(),
            })?;
        self.nodes.update(id, |n| NetworkNode {
            status,
            ..n.clone()
        });
        Ok(())
    }

    /// Move a device to another VLAN and rebuild every member list that
    /// referenced it.
    pub fn assign_device_vlan(&self, id: &str, vlan: VlanId) -> Result<(), CoreError> {
        if self.vlan(vlan).is_none() {
            return Err(CoreError::VlanNotFound { id: vlan });
        }
        self.devices
            .update(id, |d| Device {
                vlan_id: vlan,
                ..d.clone()
            })
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: id.to_owned(),
            })?;
        self.nodes.update(id, |n| NetworkNode {
            vlan_id: vlan,
            ..n.clone()
        });

        for network in self.vlans.snapshot().iter() {
            let key = network.id.to_string();
            if network.id == vlan {
                self.vlans.update(&key, |v| with_member(v, id));
            } else if network.has_member(id) {
                self.vlans.update(&key, |v| VlanNetwork {
                    devices: v.devices.iter().filter(|d| *d != id).cloned().collect(),
                    ..v.clone()
                });
            }
        }

        debug!(device = id, vlan, "device reassigned");
        Ok(())
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_vlans(&self) -> EntityStream<VlanNetwork> {
        Subscription::new(self.vlans.subscribe())
    }

    pub fn subscribe_devices(&self) -> EntityStream<Device> {
        Subscription::new(self.devices.subscribe())
    }

    pub fn subscribe_nodes(&self) -> EntityStream<NetworkNode> {
        Subscription::new(self.nodes.subscribe())
    }

    pub fn subscribe_links(&self) -> EntityStream<NetworkLink> {
        Subscription::new(self.links.subscribe())
    }

    pub fn subscribe_selected_vlan(&self) -> Subscription<Option<VlanId>> {
        Subscription::new(self.selected_vlan.subscribe())
    }

    pub fn subscribe_selected_device(&self) -> Subscription<Option<String>> {
        Subscription::new(self.selected_device.subscribe())
    }
}

impl Default for NetworkStore {
    fn default() -> Self {
        Self::new()
    }
}

fn with_member(vlan: &VlanNetwork, device_id: &str) -> VlanNetwork {
    let mut next = vlan.clone();
    if !next.has_member(device_id) {
        next.devices.push(device_id.to_owned());
    }
    next
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{DeviceType, SecurityLevel, palette};

    fn store() -> NetworkStore {
        NetworkStore::seeded(Some(11))
    }

    fn link_keys(links: &[Arc<NetworkLink>]) -> Vec<String> {
        links.iter().map(|l| l.key()).collect()
    }

    #[test]
    fn no_selection_shows_everything() {
        let store = store();
        assert_eq!(store.filtered_nodes().len(), 15);
        assert_eq!(
            link_keys(&store.filtered_links()),
            link_keys(&store.links())
        );
    }

    #[test]
    fn cross_vlan_link_follows_its_endpoints() {
        let store = store();

        store.set_selected_vlan(Some(10));
        let keys = link_keys(&store.filtered_links());
        assert!(keys.contains(&"dev-005->dev-008".to_owned()));
        assert!(keys.contains(&"dev-008->dev-011".to_owned()));
        assert!(!keys.contains(&"dev-013->dev-007".to_owned()));

        // dev-008 is VLAN 10, dev-011 is VLAN 40.
        store.set_selected_vlan(Some(20));
        let keys = link_keys(&store.filtered_links());
        assert!(!keys.contains(&"dev-008->dev-011".to_owned()));
        assert!(keys.contains(&"dev-013->dev-007".to_owned()));
    }

    #[test]
    fn filtered_nodes_match_selection() {
        let store = store();
        store.set_selected_vlan(Some(30));
        let nodes = store.filtered_nodes();
        assert_eq!(nodes.len(), 4);
        assert!(nodes.iter().all(|n| n.vlan_id == 30));
    }

    #[test]
    fn selecting_cross_vlan_sentinel_clears_filter() {
        let store = store();
        store.set_selected_vlan(Some(10));
        store.set_selected_vlan(Some(CROSS_VLAN));
        assert_eq!(store.selected_vlan(), None);
    }

    #[test]
    fn selection_subscription_wakes_only_on_change() {
        let store = store();
        let mut sub = store.subscribe_selected_vlan();
        let mut changed = tokio_test::task::spawn(sub.changed());

        tokio_test::assert_pending!(changed.poll());

        // Re-selecting "all" is not a change.
        store.set_selected_vlan(None);
        assert!(!changed.is_woken());
        tokio_test::assert_pending!(changed.poll());

        store.set_selected_vlan(Some(20));
        assert!(changed.is_woken());
        assert_eq!(tokio_test::assert_ready!(changed.poll()), Some(Some(20)));
    }

    #[test]
    fn toggle_clears_active_chip() {
        let store = store();
        store.toggle_vlan(20);
        assert_eq!(store.selected_vlan(), Some(20));
        store.toggle_vlan(40);
        assert_eq!(store.selected_vlan(), Some(40));
        store.toggle_vlan(40);
        assert_eq!(store.selected_vlan(), None);
    }

    #[test]
    fn every_device_is_listed_under_its_vlan() {
        let store = store();
        for device in store.devices().iter() {
            let vlan = store.vlan(device.vlan_id).unwrap();
            assert!(
                vlan.has_member(&device.id),
                "{} missing from VLAN {}",
                device.id,
                vlan.id
            );
            assert!(
                store
                    .devices_in_vlan(vlan.id)
                    .iter()
                    .any(|d| d.id == device.id)
            );
        }
    }

    #[test]
    fn duplicate_vlan_is_rejected() {
        let store = store();
        let existing = (*store.vlan(10).unwrap()).clone();
        let err = store.add_vlan(existing).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateVlan { id: 10, .. }));
    }

    #[test]
    fn duplicate_vlan_in_dataset_keeps_first() {
        let mut data = seed::dataset();
        let mut dup = data.vlans[0].clone();
        dup.name = "Shadow".into();
        data.vlans.push(dup);

        let store = NetworkStore::from_dataset(data, &mut StdRng::seed_from_u64(1));
        assert_eq!(store.vlans().len(), 5);
        assert_eq!(store.vlan(10).unwrap().name, "Traffic Management");
    }

    #[test]
    fn move_node_commits_position() {
        let store = store();
        store.move_node("dev-004", 12.5, 40.0).unwrap();
        let node = store.node("dev-004").unwrap();
        assert_eq!((node.x, node.y), (12.5, 40.0));
        assert!(store.move_node("dev-999", 0.0, 0.0).is_err());
    }

    #[test]
    fn status_change_mirrors_node() {
        let store = store();
        store
            .set_device_status("dev-001", DeviceStatus::Offline)
            .unwrap();
        assert_eq!(store.device("dev-001").unwrap().status, DeviceStatus::Offline);
        assert_eq!(store.node("dev-001").unwrap().status, DeviceStatus::Offline);
    }

    #[test]
    fn reassignment_rebuilds_member_lists() {
        let store = store();
        store.assign_device_vlan("dev-012", 20).unwrap();

        assert_eq!(store.device("dev-012").unwrap().vlan_id, 20);
        assert_eq!(store.node("dev-012").unwrap().vlan_id, 20);
        assert!(!store.vlan(10).unwrap().has_member("dev-012"));
        assert!(store.vlan(20).unwrap().has_member("dev-012"));
        assert_eq!(store.device_count_by_vlan(20), 4);

        let err = store.assign_device_vlan("dev-012", 99).unwrap_err();
        assert!(matches!(err, CoreError::VlanNotFound { id: 99 }));
    }

    #[test]
    fn add_device_joins_vlan() {
        let store = store();
        store
            .add_vlan(VlanNetwork {
                id: 60,
                name: "Lab".into(),
                subnet: "10.60.0.0/24".into(),
                description: String::new(),
                devices: Vec::new(),
                color: palette::GRAY,
                traffic_load: 0,
                security_level: SecurityLevel::Medium,
                department: "IT".into(),
            })
            .unwrap();

        let device = Device {
            id: "dev-100".into(),
            name: "Lab Sensor".into(),
            device_type: DeviceType::Sensor,
            status: DeviceStatus::Online,
            ip: "10.60.0.5".into(),
            location: "Lab".into(),
            vlan_id: 60,
        };
        let mut rng = StdRng::seed_from_u64(3);
        store.add_device(device.clone(), &mut rng).unwrap();

        assert!(store.vlan(60).unwrap().has_member("dev-100"));
        assert!(store.node("dev-100").is_some());
        assert!(store.add_device(device, &mut rng).is_err());
    }

    #[tokio::test]
    async fn selection_is_observable() {
        let store = store();
        let mut sub = store.subscribe_selected_vlan();
        assert_eq!(*sub.current(), None);

        store.set_selected_vlan(Some(30));
        assert_eq!(sub.changed().await, Some(Some(30)));
    }
}
