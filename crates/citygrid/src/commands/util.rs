//! Shared helpers for command handlers.

use std::io::{IsTerminal, Read};
use std::path::Path;

use citygrid_core::{DeviceStatus, DeviceType, NetworkStore, VlanId};

use crate::cli::{StatusArg, TypeArg};
use crate::error::CliError;

pub fn status_from_arg(arg: StatusArg) -> DeviceStatus {
    match arg {
        StatusArg::Online => DeviceStatus::Online,
        StatusArg::Offline => DeviceStatus::Offline,
        StatusArg::Warning => DeviceStatus::Warning,
        StatusArg::Maintenance => DeviceStatus::Maintenance,
    }
}

pub fn type_from_arg(arg: TypeArg) -> DeviceType {
    match arg {
        TypeArg::Router => DeviceType::Router,
        TypeArg::Switch => DeviceType::Switch,
        TypeArg::AccessPoint => DeviceType::AccessPoint,
        TypeArg::Sensor => DeviceType::Sensor,
        TypeArg::Camera => DeviceType::Camera,
        TypeArg::Controller => DeviceType::Controller,
    }
}

/// `VLAN {id} - {name}`, or `Unassigned` when the id does not resolve.
pub fn vlan_label(store: &NetworkStore, vlan: VlanId) -> String {
    store
        .vlan(vlan)
        .map_or_else(|| "Unassigned".to_owned(), |v| format!("VLAN {} - {}", v.id, v.name))
}

/// Reject a VLAN filter that names no VLAN.
pub fn require_vlan(store: &NetworkStore, vlan: VlanId) -> Result<(), CliError> {
    if store.vlan(vlan).is_some() {
        Ok(())
    } else {
        Err(CliError::NotFound {
            resource_type: "VLAN".into(),
            identifier: vlan.to_string(),
            list_command: "vlans list".into(),
        })
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Read JSON from a file path, or stdin for `-`.
pub fn read_json_input(source: &str) -> Result<serde_json::Value, CliError> {
    let contents = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(Path::new(source))?
    };
    Ok(serde_json::from_str(&contents)?)
}

/// `Some(x)` shown as text, `None` as a dash.
pub fn or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}
