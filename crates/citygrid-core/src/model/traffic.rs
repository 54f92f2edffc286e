// ── Traffic history ──

use serde::{Deserialize, Serialize};

use super::color::HexColor;
use super::vlan::VlanId;

/// One line of the traffic trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSeries {
    pub label: String,
    pub vlan_id: VlanId,
    pub color: HexColor,
    pub values: Vec<f64>,
}

/// Time-labelled traffic samples, one series per VLAN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficDataset {
    pub labels: Vec<String>,
    pub series: Vec<TrafficSeries>,
}

impl TrafficDataset {
    /// Largest sample across every series, `0.0` when empty.
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0, f64::max)
    }

    pub fn series_for(&self, vlan_id: VlanId) -> Option<&TrafficSeries> {
        self.series.iter().find(|s| s.vlan_id == vlan_id)
    }
}
