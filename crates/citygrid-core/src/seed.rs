// ── Seed dataset ──
//
// The static city inventory the dashboard starts from: five VLAN segments,
// fifteen devices, their links and a 24-hour traffic history.

use rand::Rng;

use crate::model::{
    Device, DeviceStatus, DeviceType, HexColor, NetworkLink, NetworkNode, SecurityLevel,
    TrafficDataset, TrafficSeries, VlanId, VlanNetwork, palette,
};

/// Logical canvas size nodes are scattered over.
pub const CANVAS_WIDTH: f64 = 800.0;
pub const CANVAS_HEIGHT: f64 = 600.0;

/// Everything the data provider loads at startup.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub vlans: Vec<VlanNetwork>,
    pub devices: Vec<Device>,
    pub links: Vec<NetworkLink>,
    pub traffic: TrafficDataset,
}

/// The built-in city inventory.
pub fn dataset() -> Dataset {
    Dataset {
        vlans: vlans(),
        devices: devices(),
        links: links(),
        traffic: traffic(),
    }
}

/// Project devices onto the canvas at random integer positions in
/// `[0, 800) x [0, 600)`.
pub fn place_nodes<R: Rng + ?Sized>(devices: &[Device], rng: &mut R) -> Vec<NetworkNode> {
    devices
        .iter()
        .map(|d| {
            let x = f64::from(rng.random_range(0..800_u16));
            let y = f64::from(rng.random_range(0..600_u16));
            NetworkNode::from_device(d, x, y)
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn vlan(
    id: VlanId,
    name: &str,
    subnet: &str,
    description: &str,
    devices: &[&str],
    color: HexColor,
    traffic_load: u8,
    security_level: SecurityLevel,
    department: &str,
) -> VlanNetwork {
    VlanNetwork {
        id,
        name: name.to_owned(),
        subnet: subnet.to_owned(),
        description: description.to_owned(),
        devices: devices.iter().map(|d| (*d).to_owned()).collect(),
        color,
        traffic_load,
        security_level,
        department: department.to_owned(),
    }
}

fn vlans() -> Vec<VlanNetwork> {
    vec![
        vlan(
            10,
            "Traffic Management",
            "10.10.0.0/24",
            "Network for traffic lights and sensors",
            &["dev-001", "dev-002", "dev-003", "dev-008", "dev-012"],
            palette::BLUE,
            72,
            SecurityLevel::High,
            "Transportation",
        ),
        vlan(
            20,
            "Public Safety",
            "10.20.0.0/24",
            "Network for surveillance cameras and emergency services",
            &["dev-004", "dev-005", "dev-013"],
            palette::RED,
            85,
            SecurityLevel::High,
            "Public Safety",
        ),
        vlan(
            30,
            "Utility Management",
            "10.30.0.0/24",
            "Network for power, water, and waste management",
            &["dev-006", "dev-007", "dev-009", "dev-015"],
            palette::GREEN,
            45,
            SecurityLevel::Medium,
            "Utilities",
        ),
        vlan(
            40,
            "Public WiFi",
            "10.40.0.0/24",
            "Network for citizen internet access",
            &["dev-010", "dev-011", "dev-014"],
            palette::AMBER,
            90,
            SecurityLevel::Low,
            "IT Services",
        ),
        vlan(
            50,
            "Public WiFi",
            "10.40.0.0/24",
            "Network for citizen internet access",
            &["dev-010", "dev-011"],
            palette::AMBER,
            70,
            SecurityLevel::Low,
            "IT Services",
        ),
    ]
}

fn device(
    id: &str,
    name: &str,
    device_type: DeviceType,
    status: DeviceStatus,
    ip: &str,
    location: &str,
    vlan_id: VlanId,
) -> Device {
    Device {
        id: id.to_owned(),
        name: name.to_owned(),
        device_type,
        status,
        ip: ip.to_owned(),
        location: location.to_owned(),
        vlan_id,
    }
}

#[rustfmt::skip]
fn devices() -> Vec<Device> {
    use DeviceStatus::{Maintenance, Offline, Online, Warning};
    use DeviceType::{AccessPoint, Camera, Controller, Router, Sensor, Switch};

    vec![
        device("dev-001", "Traffic Controller Alpha", Controller, Online, "10.10.0.10", "Main Street & 5th Ave", 10),
        device("dev-002", "Traffic Light Sensor 1", Sensor, Online, "10.10.0.11", "Main Street & 5th Ave", 10),
        device("dev-003", "Traffic Light Sensor 2", Sensor, Warning, "10.10.0.12", "Broadway & 10th Ave", 10),
        device("dev-004", "City Hall Camera", Camera, Online, "10.20.0.10", "City Hall", 20),
        device("dev-005", "Downtown Router", Router, Online, "10.20.0.1", "Downtown NOC", 20),
        device("dev-006", "Power Grid Sensor", Sensor, Online, "10.30.0.10", "Central Power Station", 30),
        device("dev-007", "Water Management System", Controller, Offline, "10.30.0.11", "Water Treatment Plant", 30),
        device("dev-008", "West Side Switch", Switch, Online, "10.10.0.2", "West Side Distribution Center", 10),
        device("dev-009", "Waste Management Sensor", Sensor, Online, "10.30.0.12", "Recycling Center", 30),
        device("dev-010", "Park WiFi AP 1", AccessPoint, Online, "10.40.0.10", "Central Park", 40),
        device("dev-011", "Library WiFi AP", AccessPoint, Online, "10.40.0.11", "Central Library", 40),
        device("dev-012", "Traffic Camera Junction", Camera, Online, "10.10.0.13", "Highway 101 Exit", 10),
        device("dev-013", "Emergency Services Router", Router, Online, "10.20.0.2", "Emergency Response Center", 20),
        device("dev-014", "City Square WiFi AP", AccessPoint, Warning, "10.40.0.12", "Central Square", 40),
        device("dev-015", "Solar Grid Controller", Controller, Maintenance, "10.30.0.13", "Solar Farm North", 30),
    ]
}

fn link(source: &str, target: &str, strength: f64, vlan_id: VlanId) -> NetworkLink {
    NetworkLink {
        source: source.to_owned(),
        target: target.to_owned(),
        strength,
        vlan_id,
    }
}

fn links() -> Vec<NetworkLink> {
    vec![
        link("dev-001", "dev-002", 0.8, 10),
        link("dev-001", "dev-003", 0.8, 10),
        link("dev-001", "dev-008", 0.5, 10),
        link("dev-008", "dev-012", 0.7, 10),
        link("dev-004", "dev-005", 0.9, 20),
        link("dev-005", "dev-013", 0.6, 20),
        link("dev-006", "dev-007", 0.7, 30),
        link("dev-007", "dev-009", 0.8, 30),
        link("dev-009", "dev-015", 0.5, 30),
        link("dev-010", "dev-011", 0.4, 40),
        link("dev-011", "dev-014", 0.6, 40),
        // cross-VLAN uplinks
        link("dev-005", "dev-008", 0.3, 0),
        link("dev-013", "dev-007", 0.2, 0),
        link("dev-008", "dev-011", 0.2, 0),
    ]
}

fn series(label: &str, vlan_id: VlanId, color: HexColor, values: [u8; 24]) -> TrafficSeries {
    TrafficSeries {
        label: label.to_owned(),
        vlan_id,
        color,
        values: values.into_iter().map(f64::from).collect(),
    }
}

fn traffic() -> TrafficDataset {
    TrafficDataset {
        labels: (0..24).map(|h| format!("{h}:00")).collect(),
        series: vec![
            series(
                "Traffic Management VLAN",
                10,
                palette::BLUE,
                [42, 38, 35, 30, 25, 32, 40, 55, 62, 68, 72, 70, 65, 68, 72, 75, 80, 85, 75, 68, 60, 55, 50, 45],
            ),
            series(
                "Public Safety VLAN",
                20,
                palette::RED,
                [65, 60, 55, 50, 48, 50, 55, 60, 65, 70, 75, 80, 82, 85, 80, 78, 75, 80, 85, 82, 80, 75, 70, 68],
            ),
            series(
                "Utility Management VLAN",
                30,
                palette::GREEN,
                [30, 32, 35, 32, 30, 28, 30, 35, 40, 42, 45, 48, 50, 52, 50, 48, 45, 42, 40, 38, 35, 32, 30, 28],
            ),
            series(
                "Public WiFi VLAN",
                40,
                palette::AMBER,
                [25, 20, 15, 10, 8, 10, 15, 25, 35, 45, 60, 75, 85, 90, 88, 85, 80, 85, 80, 70, 55, 45, 35, 30],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn dataset_has_expected_shape() {
        let data = dataset();
        assert_eq!(data.vlans.len(), 5);
        assert_eq!(data.devices.len(), 15);
        assert_eq!(data.links.len(), 14);
        assert_eq!(data.links.iter().filter(|l| l.is_cross_vlan()).count(), 3);
        assert_eq!(data.traffic.labels.len(), 24);
        assert!(data.traffic.series.iter().all(|s| s.values.len() == 24));
    }

    #[test]
    fn nodes_land_inside_the_canvas() {
        let data = dataset();
        let mut rng = StdRng::seed_from_u64(7);
        let nodes = place_nodes(&data.devices, &mut rng);
        assert_eq!(nodes.len(), data.devices.len());
        assert!(nodes.iter().all(|n| {
            (0.0..CANVAS_WIDTH).contains(&n.x) && (0.0..CANVAS_HEIGHT).contains(&n.y)
        }));
    }

    #[test]
    fn same_seed_same_layout() {
        let data = dataset();
        let a = place_nodes(&data.devices, &mut StdRng::seed_from_u64(42));
        let b = place_nodes(&data.devices, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
