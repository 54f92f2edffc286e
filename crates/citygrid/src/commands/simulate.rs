//! Publish a simulated device reading through the backend.

use serde::Serialize;

use citygrid_core::sync::{AIR_QUALITY_RANGE, TEMPERATURE_RANGE, TRAFFIC_RANGE};
use citygrid_core::{LiveAssignment, LiveDevice, RemoteSync, SimulationDraft, SyncConfig};

use crate::cli::{GlobalOpts, SimulateArgs};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Outcome {
    status: String,
    device: LiveDevice,
    vlan: Option<LiveAssignment>,
}

fn in_range(field: &str, value: Option<f64>, (min, max): (f64, f64)) -> Result<(), CliError> {
    match value {
        Some(v) if !(min..=max).contains(&v) => Err(CliError::Validation {
            field: field.into(),
            reason: format!("{v} is outside {min}-{max}"),
        }),
        _ => Ok(()),
    }
}

fn draft_from(args: SimulateArgs) -> Result<SimulationDraft, CliError> {
    if args.name.trim().is_empty() {
        return Err(CliError::Validation {
            field: "name".into(),
            reason: "must not be empty".into(),
        });
    }
    in_range("temperature", args.temperature, TEMPERATURE_RANGE)?;
    in_range("traffic", args.traffic, TRAFFIC_RANGE)?;
    in_range("air-quality", args.air_quality, AIR_QUALITY_RANGE)?;

    let defaults = SimulationDraft::default();
    Ok(SimulationDraft {
        device_id: args.device_id.unwrap_or_default(),
        name: args.name,
        kind: args.kind,
        temperature: args.temperature.unwrap_or(defaults.temperature),
        traffic: args.traffic.unwrap_or(defaults.traffic),
        air_quality: args.air_quality.unwrap_or(defaults.air_quality),
        location: args.location,
    })
}

fn detail(o: &Outcome) -> String {
    let vlan = o.vlan.as_ref().map_or_else(
        || "not assigned".to_owned(),
        |a| match &a.reason {
            Some(reason) => format!("VLAN {} ({reason})", a.vlan_id),
            None => format!("VLAN {}", a.vlan_id),
        },
    );
    [
        format!("Device:   {} ({})", o.device.display_name(), o.device.id),
        format!("Reading:  {}", o.device.reading.summary()),
        format!("Assigned: {vlan}"),
    ]
    .join("\n")
}

pub async fn handle(
    sync: SyncConfig,
    args: SimulateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let draft = draft_from(args)?;
    tracing::debug!(name = %draft.name, kind = %draft.kind, "sending simulated reading");

    let response = RemoteSync::new(sync)?.simulate(&draft.to_request()).await?;
    let outcome = Outcome {
        status: response.status.clone(),
        device: LiveDevice::from_record(response.device_id(), &response.device),
        vlan: response
            .vlan
            .as_ref()
            .map(|v| LiveAssignment::from_wire(response.device_id(), v)),
    };

    let out = output::render_single(&global.output_format(), &outcome, detail, |o| {
        o.device.id.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args() -> SimulateArgs {
        SimulateArgs {
            name: "Test Sensor".into(),
            kind: "sensor".into(),
            temperature: None,
            traffic: Some(90.0),
            air_quality: None,
            location: "City Center".into(),
            device_id: None,
        }
    }

    #[test]
    fn omitted_readings_take_form_defaults() {
        let draft = draft_from(args()).unwrap();
        assert_eq!(draft.temperature, 25.0);
        assert_eq!(draft.traffic, 90.0);
        assert_eq!(draft.air_quality, 100.0);
        assert!(draft.to_request().device_id.is_none());
    }

    #[test]
    fn out_of_range_reading_is_rejected() {
        let mut bad = args();
        bad.air_quality = Some(301.0);
        let err = draft_from(bad).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "air-quality"));
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut bad = args();
        bad.name = "  ".into();
        assert!(draft_from(bad).is_err());
    }
}
