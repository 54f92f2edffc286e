//! Domain layer between `citygrid-api` and the UI consumers (CLI / TUI).
//!
//! - **[`NetworkStore`]**: the data provider. Holds VLANs, devices, canvas
//!   nodes, links and traffic history, plus the selected VLAN and device.
//!   Lock-free snapshots built on `EntityCollection<T>` (`ArcSwap` over an
//!   `IndexMap`, broadcast through `tokio::sync::watch`).
//!
//! - **[`RemoteSync`]**: polls the backend's devices, VLAN assignments and
//!   rules together and applies them all or nothing. Simulations patch the
//!   current [`LiveSnapshot`] without waiting for a poll.
//!
//! - **Projections**: [`filter`] for list and topology filters, [`charts`]
//!   for chart-ready series, [`topology`] for the canvas viewport, hit
//!   testing and paint decisions.
//!
//! - **Domain model** ([`model`]) and the built-in [`seed`] dataset.

pub mod charts;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod seed;
pub mod store;
pub mod stream;
pub mod sync;
pub mod topology;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{SyncConfig, TlsVerification};
pub use error::{CONNECTION_ERROR_MESSAGE, CoreError};
pub use filter::{DeviceQuery, LiveQuery};
pub use store::{ConsistencyReport, NetworkStore};
pub use stream::{EntityStream, Subscription};
pub use sync::{ConnectionState, LiveSnapshot, RemoteSync, SimulationDraft};

// Wire types the binaries hand to or receive from `RemoteSync`.
pub use citygrid_api::{RuleMap, SimulateRequest, SimulateResponse};

pub use model::{
    CROSS_VLAN, DEFAULT_VLAN, Device, DeviceStatus, DeviceType, HexColor, LevelRule, LiveAssignment,
    LiveDevice, NetworkLink, NetworkNode, ParameterRules, RuleAssignment, RuleSet, SecurityLevel,
    SensorReading, TrafficDataset, TrafficSeries, VlanId, VlanNetwork,
};
