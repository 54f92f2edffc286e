//! Every state change in the dashboard travels as an [`Action`].
//!
//! Data snapshots flow in from the data bridge; requests against the data
//! provider or the backend flow out of the screens and are carried out by
//! the app loop, whose results come back as actions again.

use std::sync::Arc;

use citygrid_core::{
    ConnectionState, Device, LiveAssignment, LiveDevice, LiveSnapshot, NetworkLink, NetworkNode,
    RuleSet, SimulationDraft, TrafficDataset, VlanId, VlanNetwork,
};

use crate::screen::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast in the bottom-right corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// What a successful simulation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub device: LiveDevice,
    pub assignment: Option<LiveAssignment>,
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ─────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,
    ToggleHelp,
    OpenSearch,
    CloseSearch,
    SearchInput(String),

    // ── Data provider snapshots ───────────────────────────────────
    VlansUpdated(Arc<Vec<Arc<VlanNetwork>>>),
    DevicesUpdated(Arc<Vec<Arc<Device>>>),
    NodesUpdated(Arc<Vec<Arc<NetworkNode>>>),
    LinksUpdated(Arc<Vec<Arc<NetworkLink>>>),
    TrafficLoaded(Arc<TrafficDataset>),
    SelectedVlanChanged(Option<VlanId>),
    SelectedDeviceChanged(Option<String>),

    // ── Data provider requests ────────────────────────────────────
    SelectVlan(Option<VlanId>),
    /// Select, or clear when it is already the selection.
    ToggleVlan(VlanId),
    SelectDevice(Option<String>),
    MoveNode { id: String, x: f64, y: f64 },

    // ── Backend ───────────────────────────────────────────────────
    LiveUpdated(Arc<LiveSnapshot>),
    ConnectionChanged(ConnectionState),
    RefreshLive,
    SubmitSimulation(Box<SimulationDraft>),
    SimulationResult(Result<Box<SimulationOutcome>, String>),
    SaveRules(RuleSet),
    RulesSaved(Result<RuleSet, String>),

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}
