// ── Domain model ──
//
// Canonical types shared by the CLI and the TUI. Seed data and live
// backend readings both end up in these shapes.

pub mod color;
pub mod device;
pub mod live;
pub mod rules;
pub mod topology;
pub mod traffic;
pub mod vlan;

pub use color::{HexColor, palette};
pub use device::{Device, DeviceStatus, DeviceType};
pub use live::{LiveAssignment, LiveDevice, SensorReading};
pub use rules::{DEFAULT_VLAN, LevelRule, ParameterRules, RuleAssignment, RuleSet};
pub use topology::{NetworkLink, NetworkNode};
pub use traffic::{TrafficDataset, TrafficSeries};
pub use vlan::{CROSS_VLAN, SecurityLevel, VlanId, VlanNetwork};
