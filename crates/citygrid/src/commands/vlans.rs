//! VLAN command handlers.

use std::sync::Arc;

use tabled::Tabled;

use citygrid_core::{NetworkStore, VlanNetwork};

use crate::cli::{GlobalOpts, VlansArgs, VlansCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct VlanRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Subnet")]
    subnet: String,
    #[tabled(rename = "Devices")]
    devices: usize,
    #[tabled(rename = "Load")]
    load: String,
    #[tabled(rename = "Security")]
    security: String,
    #[tabled(rename = "Department")]
    department: String,
}

fn row(store: &NetworkStore, v: &Arc<VlanNetwork>) -> VlanRow {
    VlanRow {
        id: v.id,
        name: v.name.clone(),
        subnet: v.subnet.clone(),
        devices: store.device_count_by_vlan(v.id),
        load: format!("{}%", v.traffic_load),
        security: v.security_level.to_string(),
        department: v.department.clone(),
    }
}

fn detail(store: &NetworkStore, v: &Arc<VlanNetwork>) -> String {
    let mut lines = vec![
        format!("ID:          {}", v.id),
        format!("Name:        {}", v.name),
        format!("Subnet:      {}", v.subnet),
        format!("Description: {}", v.description),
        format!("Color:       {}", v.color),
        format!("Load:        {}%", v.traffic_load),
        format!("Security:    {}", v.security_level),
        format!("Department:  {}", v.department),
        String::new(),
    ];

    let members = store.devices_in_vlan(v.id);
    if members.is_empty() {
        lines.push("No devices in this VLAN".into());
    } else {
        lines.push(format!("Devices ({}):", members.len()));
        for d in &members {
            lines.push(format!("  {:<8} {:<28} {}", d.id, d.name, d.status.label()));
        }
    }
    lines.join("\n")
}

pub fn handle(store: &NetworkStore, args: VlansArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let format = global.output_format();

    match args.command {
        VlansCommand::List => {
            let vlans = store.vlans();
            let out = output::render_list(
                &format,
                &vlans,
                |v| row(store, v),
                |v| v.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VlansCommand::Get { id } => {
            let vlan = store.vlan(id).ok_or_else(|| CliError::NotFound {
                resource_type: "VLAN".into(),
                identifier: id.to_string(),
                list_command: "vlans list".into(),
            })?;
            let out = output::render_single(
                &format,
                &vlan,
                |v| detail(store, v),
                |v| v.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
