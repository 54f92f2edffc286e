//! Live backend views: latest readings, devices per VLAN, overview.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use citygrid_core::charts::LiveOverview;
use citygrid_core::{LiveDevice, LiveQuery, LiveSnapshot, RemoteSync, SyncConfig, VlanId};

use crate::cli::{GlobalOpts, LiveArgs, LiveCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct LiveRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Reading")]
    reading: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

/// A device plus the VLAN the backend put it on.
#[derive(Serialize)]
struct LiveEntry<'a> {
    #[serde(flatten)]
    device: &'a LiveDevice,
    vlan_id: Option<VlanId>,
}

#[derive(Serialize)]
struct VlanGroup<'a> {
    vlan_id: VlanId,
    devices: Vec<&'a LiveDevice>,
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "VLAN")]
    vlan: VlanId,
    #[tabled(rename = "Devices")]
    count: usize,
    #[tabled(rename = "Members")]
    members: String,
}

fn row(e: &LiveEntry<'_>) -> LiveRow {
    LiveRow {
        id: e.device.id.clone(),
        name: e.device.display_name().to_owned(),
        category: e.device.reading.category().to_owned(),
        reading: e.device.reading.summary(),
        vlan: util::or_dash(e.vlan_id),
        updated: e.device.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

fn overview_detail(o: &LiveOverview) -> String {
    let mut lines = vec![
        format!("Devices:  {}", o.device_count),
        format!("VLANs:    {}", o.vlan_count),
    ];

    if let Some((vlan, n)) = o.busiest_vlan {
        lines.push(format!("Busiest:  VLAN {vlan} ({n} devices)"));
    }
    if let Some((category, n)) = &o.top_category {
        lines.push(format!("Top type: {category} ({n} devices)"));
    }

    if !o.per_vlan.is_empty() {
        lines.push(String::new());
        lines.push("Per VLAN:".into());
        lines.extend(o.per_vlan.iter().map(|(v, n)| format!("  VLAN {v:<5} {n}")));
    }
    if !o.per_category.is_empty() {
        lines.push(String::new());
        lines.push("Per category:".into());
        lines.extend(o.per_category.iter().map(|(c, n)| format!("  {c:<12} {n}")));
    }
    for (title, series, unit) in [
        ("Temperature:", &o.temperature_series, "°C"),
        ("Traffic:", &o.traffic_series, "%"),
    ] {
        if series.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(title.into());
        lines.extend(series.iter().map(|p| {
            format!(
                "  {} {:<12} {}{unit}",
                p.timestamp.format("%H:%M"),
                p.device_id,
                p.value
            )
        }));
    }
    if !o.recent_assignments.is_empty() {
        lines.push(String::new());
        lines.push("Recent assignments:".into());
        lines.extend(o.recent_assignments.iter().map(|a| {
            format!(
                "  {} -> VLAN {} ({})",
                a.device_id,
                a.vlan_id,
                a.reason.as_deref().unwrap_or("no reason given")
            )
        }));
    }
    lines.join("\n")
}

async fn fetch(sync: SyncConfig) -> Result<Arc<LiveSnapshot>, CliError> {
    let snapshot = RemoteSync::oneshot(sync, |s| async move { Ok(s.snapshot()) }).await?;
    tracing::debug!(devices = snapshot.device_count(), "live snapshot fetched");
    Ok(snapshot)
}

pub async fn handle(sync: SyncConfig, args: LiveArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let format = global.output_format();
    let snapshot = fetch(sync).await?;

    let out = match args.command {
        LiveCommand::Devices { search, category } => {
            let query = LiveQuery {
                search: search.unwrap_or_default(),
                category,
            };
            let mut entries: Vec<LiveEntry<'_>> = snapshot
                .devices()
                .filter(|d| query.matches(d))
                .map(|d| LiveEntry {
                    device: d,
                    vlan_id: snapshot.vlan_of(&d.id),
                })
                .collect();
            entries.sort_by(|a, b| b.device.timestamp.cmp(&a.device.timestamp));

            if entries.is_empty() {
                if let Some(notice) = output::empty_notice(&format, "No live devices") {
                    output::print_output(&notice, global.quiet);
                    return Ok(());
                }
            }
            output::render_list(&format, &entries, row, |e| e.device.id.clone())?
        }

        LiveCommand::Vlans => {
            let groups: Vec<VlanGroup<'_>> = snapshot
                .devices_by_vlan()
                .into_iter()
                .map(|(vlan_id, devices)| VlanGroup { vlan_id, devices })
                .collect();

            if groups.is_empty() {
                if let Some(notice) = output::empty_notice(&format, "No VLAN assignments yet") {
                    output::print_output(&notice, global.quiet);
                    return Ok(());
                }
            }
            output::render_list(
                &format,
                &groups,
                |g| GroupRow {
                    vlan: g.vlan_id,
                    count: g.devices.len(),
                    members: g
                        .devices
                        .iter()
                        .map(|d| d.id.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                },
                |g| g.vlan_id.to_string(),
            )?
        }

        LiveCommand::Overview => {
            output::render_single(&format, &snapshot.overview(), overview_detail, |o| {
                o.device_count.to_string()
            })?
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use citygrid_core::charts::ReadingPoint;

    use super::*;

    #[test]
    fn empty_overview_shows_only_counts() {
        let text = overview_detail(&LiveOverview::default());
        assert_eq!(text, "Devices:  0\nVLANs:    0");
    }

    #[test]
    fn overview_lists_cards_and_series() {
        let overview = LiveOverview {
            device_count: 2,
            vlan_count: 1,
            per_vlan: vec![(40, 2)],
            per_category: vec![("Traffic".into(), 2)],
            busiest_vlan: Some((40, 2)),
            top_category: Some(("Traffic".into(), 2)),
            traffic_series: vec![ReadingPoint {
                device_id: "tr-1".into(),
                timestamp: "1970-01-01T00:00:00Z".parse().unwrap(),
                value: 91.0,
            }],
            ..LiveOverview::default()
        };

        let text = overview_detail(&overview);
        assert!(text.contains("Busiest:  VLAN 40 (2 devices)"));
        assert!(text.contains("Top type: Traffic (2 devices)"));
        assert!(text.contains("Traffic:\n  00:00 tr-1         91%"));
        assert!(!text.contains("Temperature:"));
    }
}
