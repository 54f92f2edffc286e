//! Chart data as tables: status distribution, traffic trend, VLAN usage.

use serde::Serialize;
use tabled::Tabled;

use citygrid_core::charts::{self, OverviewStats, StatusSlice, TrafficScale, VlanBar};
use citygrid_core::{NetworkStore, TrafficSeries};

use crate::cli::{GlobalOpts, StatsArgs, StatsView};
use crate::error::CliError;
use crate::output;

const BAR_WIDTH: f64 = 20.0;

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Devices")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Color")]
    color: String,
}

#[derive(Tabled)]
struct SeriesRow {
    #[tabled(rename = "Series")]
    label: String,
    #[tabled(rename = "VLAN")]
    vlan: u32,
    #[tabled(rename = "Peak")]
    peak: String,
    #[tabled(rename = "Mean")]
    mean: String,
}

#[derive(Tabled)]
struct UsageRow {
    #[tabled(rename = "VLAN")]
    vlan: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Devices")]
    value: usize,
    #[tabled(rename = "Bar")]
    bar: String,
}

#[derive(Serialize)]
struct TrafficTrend<'a> {
    labels: &'a [String],
    scale: TrafficScale,
    series: &'a [TrafficSeries],
}

fn overview_detail(o: &OverviewStats) -> String {
    [
        format!("Total devices:   {}", o.total_devices),
        format!("Online:          {}", o.online),
        format!("Offline:         {}", o.offline),
        format!("Warnings:        {}", o.warning),
        format!("Maintenance:     {}", o.maintenance),
        format!("VLANs:           {}", o.vlan_count),
        format!("Avg. VLAN load:  {:.1}%", o.average_traffic_load),
    ]
    .join("\n")
}

fn status_row(s: &StatusSlice) -> StatusRow {
    StatusRow {
        status: s.status.label().to_owned(),
        count: s.count,
        share: format!("{:.1}%", s.percentage),
        color: s.color.to_string(),
    }
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn series_row(s: &TrafficSeries) -> SeriesRow {
    let peak = s.values.iter().copied().fold(0.0_f64, f64::max);
    let mean = if s.values.is_empty() {
        0.0
    } else {
        s.values.iter().sum::<f64>() / s.values.len() as f64
    };
    SeriesRow {
        label: s.label.clone(),
        vlan: s.vlan_id,
        peak: format!("{peak:.0}"),
        mean: format!("{mean:.1}"),
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn usage_row(b: &VlanBar) -> UsageRow {
    let cells = (b.height_percent / 100.0 * BAR_WIDTH).round() as usize;
    UsageRow {
        vlan: b.vlan_id,
        name: b.name.clone(),
        value: b.value,
        bar: "█".repeat(cells),
    }
}

fn trend_detail(trend: &TrafficTrend<'_>) -> String {
    let rows: Vec<SeriesRow> = trend.series.iter().map(series_row).collect();
    let axis: Vec<String> = trend.scale.labels.iter().map(ToString::to_string).collect();
    format!(
        "{} hourly samples, axis: {}\n{}",
        trend.labels.len(),
        axis.join(" / "),
        output::render_table(&rows)
    )
}

pub fn handle(store: &NetworkStore, args: &StatsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let format = global.output_format();
    let devices = store.devices();
    let vlans = store.vlans();

    let out = match args.view {
        None => output::render_single(
            &format,
            &charts::overview(&devices, &vlans),
            overview_detail,
            |o| o.total_devices.to_string(),
        )?,
        Some(StatsView::Status) => output::render_list(
            &format,
            &charts::status_distribution(&devices),
            status_row,
            |s| format!("{} {}", s.status, s.count),
        )?,
        Some(StatsView::Traffic) => {
            let traffic = store.traffic();
            let trend = TrafficTrend {
                labels: &traffic.labels,
                scale: charts::traffic_scale(&traffic),
                series: &traffic.series,
            };
            output::render_single(&format, &trend, trend_detail, |t| {
                t.series
                    .iter()
                    .map(|s| s.label.clone())
                    .collect::<Vec<_>>()
                    .join("\n")
            })?
        }
        Some(StatsView::Vlans) => output::render_list(
            &format,
            &charts::vlan_usage(&vlans),
            usage_row,
            |b| format!("{} {}", b.vlan_id, b.value),
        )?,
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
