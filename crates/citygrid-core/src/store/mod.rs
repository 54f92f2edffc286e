// ── In-memory inventory ──

mod collection;
mod consistency;
mod network;

pub use consistency::{
    ConsistencyReport, DanglingEndpoint, DanglingVlan, DriftKind, MembershipDrift, SharedSubnet,
};
pub use network::NetworkStore;
