// ── Chart projections ──
//
// Pure functions from the current collections to chart-ready values. No
// rendering happens here; the TUI and the CLI draw these.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::model::{
    Device, DeviceStatus, HexColor, LiveAssignment, LiveDevice, TrafficDataset, VlanId,
    VlanNetwork,
};

/// Smallest bar height, in percent, so empty VLANs stay visible.
pub const MIN_BAR_PERCENT: f64 = 10.0;

/// Horizontal gridlines on the traffic trend chart, including zero.
pub const TRAFFIC_GRIDLINES: usize = 6;

const RECENT_DEVICES: usize = 3;
const RECENT_ASSIGNMENTS: usize = 5;

/// Round to one decimal place, as percentages are displayed.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ── Status distribution ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSlice {
    pub status: DeviceStatus,
    pub count: usize,
    /// Unrounded share of all devices, `0.0` when there are none.
    pub percentage: f64,
    pub color: HexColor,
}

/// One slice per status in Online, Offline, Warning, Maintenance order.
pub fn status_distribution(devices: &[Arc<Device>]) -> Vec<StatusSlice> {
    let total = devices.len();
    DeviceStatus::iter()
        .map(|status| {
            let count = devices.iter().filter(|d| d.status == status).count();
            StatusSlice {
                status,
                count,
                percentage: percent(count, total),
                color: status.color(),
            }
        })
        .collect()
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

// ── Traffic trend ────────────────────────────────────────────────────

/// Y-axis scale for the traffic trend chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficScale {
    pub max: f64,
    /// Gridline values from `max` down to zero.
    pub gridlines: Vec<f64>,
    /// Axis labels, `round(max * (5 - i) / 5)`.
    pub labels: Vec<i64>,
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions, clippy::cast_possible_truncation)]
pub fn traffic_scale(dataset: &TrafficDataset) -> TrafficScale {
    let max = dataset.max_value();
    let steps = (TRAFFIC_GRIDLINES - 1) as f64;
    let gridlines: Vec<f64> = (0..TRAFFIC_GRIDLINES)
        .map(|i| max * (steps - i as f64) / steps)
        .collect();
    let labels = gridlines.iter().map(|v| v.round() as i64).collect();

    TrafficScale {
        max,
        gridlines,
        labels,
    }
}

// ── VLAN usage ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VlanBar {
    pub vlan_id: VlanId,
    pub name: String,
    pub color: HexColor,
    /// Length of the VLAN's member list.
    pub value: usize,
    /// Bar height in percent of the tallest bar, never below
    /// [`MIN_BAR_PERCENT`].
    pub height_percent: f64,
}

pub fn vlan_usage(vlans: &[Arc<VlanNetwork>]) -> Vec<VlanBar> {
    let max = vlans.iter().map(|v| v.devices.len()).max().unwrap_or(0);
    vlans
        .iter()
        .map(|v| {
            let value = v.devices.len();
            VlanBar {
                vlan_id: v.id,
                name: v.name.clone(),
                color: v.color,
                value,
                height_percent: percent(value, max).max(MIN_BAR_PERCENT),
            }
        })
        .collect()
}

// ── Overview cards ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverviewStats {
    pub total_devices: usize,
    pub online: usize,
    pub offline: usize,
    pub warning: usize,
    pub maintenance: usize,
    pub vlan_count: usize,
    /// Mean of the VLANs' traffic load percentages.
    pub average_traffic_load: f64,
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn overview(devices: &[Arc<Device>], vlans: &[Arc<VlanNetwork>]) -> OverviewStats {
    let count = |status: DeviceStatus| devices.iter().filter(|d| d.status == status).count();
    let average_traffic_load = if vlans.is_empty() {
        0.0
    } else {
        vlans.iter().map(|v| f64::from(v.traffic_load)).sum::<f64>() / vlans.len() as f64
    };

    OverviewStats {
        total_devices: devices.len(),
        online: count(DeviceStatus::Online),
        offline: count(DeviceStatus::Offline),
        warning: count(DeviceStatus::Warning),
        maintenance: count(DeviceStatus::Maintenance),
        vlan_count: vlans.len(),
        average_traffic_load,
    }
}

// ── Live overview ────────────────────────────────────────────────────

/// Summary of the backend's live state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LiveOverview {
    pub device_count: usize,
    /// Distinct VLAN ids across assignments.
    pub vlan_count: usize,
    /// Devices per VLAN, ascending by VLAN id.
    pub per_vlan: Vec<(VlanId, usize)>,
    /// Devices per reading category, alphabetical.
    pub per_category: Vec<(String, usize)>,
    /// Most recently reported device ids, newest first.
    pub recent_devices: Vec<String>,
    /// Most recent assignments, newest first.
    pub recent_assignments: Vec<LiveAssignment>,
    /// VLAN with the most devices; the lowest id wins a tie.
    pub busiest_vlan: Option<(VlanId, usize)>,
    /// Category with the most devices; alphabetical order breaks a tie.
    pub top_category: Option<(String, usize)>,
    /// Temperature per reporting device, oldest reading first.
    pub temperature_series: Vec<ReadingPoint>,
    /// Traffic level per reporting device, oldest reading first.
    pub traffic_series: Vec<ReadingPoint>,
}

/// One device's value in a per-device reading series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingPoint {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Devices reporting a non-zero `parameter`, ordered by reading time.
fn reading_series(devices: &[LiveDevice], parameter: &str) -> Vec<ReadingPoint> {
    let mut points: Vec<ReadingPoint> = devices
        .iter()
        .filter_map(|d| {
            let value = d
                .parameters
                .iter()
                .find(|(name, _)| name == parameter)
                .map(|(_, v)| *v)
                .filter(|v| *v != 0.0)?;
            Some(ReadingPoint {
                device_id: d.id.clone(),
                timestamp: d.timestamp,
                value,
            })
        })
        .collect();
    points.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    points
}

/// The first entry with the highest count.
fn first_max<K: Clone>(counts: &[(K, usize)]) -> Option<(K, usize)> {
    counts
        .iter()
        .fold(None::<&(K, usize)>, |best, entry| match best {
            Some(b) if b.1 >= entry.1 => Some(b),
            _ => Some(entry),
        })
        .cloned()
}

pub fn live_overview(devices: &[LiveDevice], assignments: &[LiveAssignment]) -> LiveOverview {
    let mut per_vlan: BTreeMap<VlanId, usize> = BTreeMap::new();
    for a in assignments {
        *per_vlan.entry(a.vlan_id).or_default() += 1;
    }

    let mut per_category: BTreeMap<String, usize> = BTreeMap::new();
    for d in devices {
        *per_category
            .entry(d.reading.category().to_owned())
            .or_default() += 1;
    }

    let mut by_time: Vec<&LiveDevice> = devices.iter().collect();
    by_time.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    let recent_devices = by_time
        .into_iter()
        .take(RECENT_DEVICES)
        .map(|d| d.id.clone())
        .collect();

    let mut recent_assignments = assignments.to_vec();
    recent_assignments.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    recent_assignments.truncate(RECENT_ASSIGNMENTS);

    let per_vlan: Vec<(VlanId, usize)> = per_vlan.into_iter().collect();
    let per_category: Vec<(String, usize)> = per_category.into_iter().collect();

    LiveOverview {
        device_count: devices.len(),
        vlan_count: per_vlan.len(),
        busiest_vlan: first_max(&per_vlan),
        top_category: first_max(&per_category),
        temperature_series: reading_series(devices, "temperature"),
        traffic_series: reading_series(devices, "traffic"),
        per_vlan,
        per_category,
        recent_devices,
        recent_assignments,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::seed;

    fn devices() -> Vec<Arc<Device>> {
        seed::dataset().devices.into_iter().map(Arc::new).collect()
    }

    fn vlans() -> Vec<Arc<VlanNetwork>> {
        seed::dataset().vlans.into_iter().map(Arc::new).collect()
    }

    #[test]
    fn status_percentages_sum_to_hundred() {
        let slices = status_distribution(&devices());
        let counts: Vec<usize> = slices.iter().map(|s| s.count).collect();
        assert_eq!(counts, [11, 1, 2, 1]);

        let sum: f64 = slices.iter().map(|s| round1(s.percentage)).sum();
        assert!((sum - 100.0).abs() <= 0.1, "sum was {sum}");
    }

    #[test]
    fn empty_status_distribution_is_all_zero() {
        let slices = status_distribution(&[]);
        assert_eq!(slices.len(), 4);
        assert!(slices.iter().all(|s| s.count == 0 && s.percentage == 0.0));
    }

    #[test]
    fn traffic_scale_spans_zero_to_max() {
        let scale = traffic_scale(&seed::dataset().traffic);
        assert_eq!(scale.max, 90.0);
        assert_eq!(scale.labels, [90, 72, 54, 36, 18, 0]);
        assert_eq!(scale.gridlines.len(), TRAFFIC_GRIDLINES);
    }

    #[test]
    fn empty_traffic_scale_is_flat() {
        let scale = traffic_scale(&TrafficDataset::default());
        assert_eq!(scale.labels, [0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn vlan_bars_use_member_lists_with_floor() {
        let mut list = vlans();
        let mut empty = (*list[0]).clone();
        empty.id = 99;
        empty.devices.clear();
        list.push(Arc::new(empty));

        let bars = vlan_usage(&list);
        let values: Vec<usize> = bars.iter().map(|b| b.value).collect();
        assert_eq!(values, [5, 3, 4, 3, 2, 0]);
        assert_eq!(bars[0].height_percent, 100.0);
        assert_eq!(bars[4].height_percent, 40.0);
        assert_eq!(bars[5].height_percent, MIN_BAR_PERCENT);
    }

    #[test]
    fn overview_counts_statuses() {
        let stats = overview(&devices(), &vlans());
        assert_eq!(stats.total_devices, 15);
        assert_eq!(stats.online, 11);
        assert_eq!(stats.warning, 2);
        assert_eq!(stats.vlan_count, 5);
        assert_eq!(stats.average_traffic_load, 72.4);
    }
}
