// citygrid-api: Async Rust client for the smart-city VLAN assignment backend

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod devices;
mod rules;
mod simulate;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::Error;
pub use models::{
    DeviceMap, DevicePayload, DeviceRecord, RuleMap, RuleThreshold, RulesUpdateResponse,
    SimulateRequest, SimulateResponse, VlanAssignment, VlanAssignmentMap,
};
pub use transport::{TlsMode, TransportConfig};
