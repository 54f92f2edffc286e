//! Device command handlers.

use std::sync::Arc;

use tabled::Tabled;

use citygrid_core::{Device, DeviceQuery, NetworkStore};

use crate::cli::{DeviceFilterArgs, DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    dtype: &'static str,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
}

fn row(store: &NetworkStore, d: &Arc<Device>, color: bool) -> DeviceRow {
    DeviceRow {
        id: d.id.clone(),
        name: d.name.clone(),
        dtype: d.device_type.label(),
        status: output::status_cell(d.status, color),
        ip: d.ip.clone(),
        location: d.location.clone(),
        vlan: util::vlan_label(store, d.vlan_id),
    }
}

fn detail(store: &NetworkStore, d: &Arc<Device>) -> String {
    let links = store.links().iter().filter(|l| l.touches(&d.id)).count();
    [
        format!("ID:       {}", d.id),
        format!("Name:     {}", d.name),
        format!("Type:     {}", d.device_type.label()),
        format!("Status:   {}", d.status.label()),
        format!("IP:       {}", d.ip),
        format!("Location: {}", d.location),
        format!("VLAN:     {}", util::vlan_label(store, d.vlan_id)),
        format!("Links:    {links}"),
    ]
    .join("\n")
}

fn query(args: &DeviceFilterArgs) -> DeviceQuery {
    DeviceQuery {
        search: args.search.clone().unwrap_or_default(),
        status: args.status.map(util::status_from_arg),
        vlan: args.vlan,
        device_type: args.device_type.map(util::type_from_arg),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(store: &NetworkStore, args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let format = global.output_format();
    let color = output::should_color(&global.color_mode());

    match args.command {
        DevicesCommand::List(filter) => {
            let matches = query(&filter).apply(&store.devices());
            tracing::debug!(count = matches.len(), "filtered devices");

            if matches.is_empty() {
                if let Some(notice) = output::empty_notice(&format, "No matching devices") {
                    output::print_output(&notice, global.quiet);
                    return Ok(());
                }
            }

            let out = output::render_list(
                &format,
                &matches,
                |d| row(store, d, color),
                |d| d.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { device } => {
            let found = store.device(&device).ok_or_else(|| CliError::NotFound {
                resource_type: "device".into(),
                identifier: device.clone(),
                list_command: "devices list".into(),
            })?;
            let out = output::render_single(
                &format,
                &found,
                |d| detail(store, d),
                |d| d.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
