//! Dataset consistency report. Informational: always exits 0.

use citygrid_core::store::{ConsistencyReport, DriftKind};
use citygrid_core::NetworkStore;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn issue_lines(report: &ConsistencyReport) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.issue_count());

    for d in &report.dangling_vlans {
        lines.push(format!("{}: assigned to unknown VLAN {}", d.device_id, d.vlan_id));
    }
    for e in &report.dangling_endpoints {
        lines.push(format!("link {}: unknown device {}", e.link, e.device_id));
    }
    for m in &report.membership_drift {
        let line = match m.kind {
            DriftKind::ListedNotAssigned => format!(
                "VLAN {} lists {} but it is assigned to VLAN {}",
                m.vlan_id,
                m.device_id,
                m.assigned_vlan.map_or_else(|| "?".into(), |v| v.to_string()),
            ),
            DriftKind::AssignedNotListed => format!(
                "{} is assigned to VLAN {} but missing from its member list",
                m.device_id, m.vlan_id
            ),
            DriftKind::UnknownMember => {
                format!("VLAN {} lists unknown device {}", m.vlan_id, m.device_id)
            }
        };
        lines.push(line);
    }
    for s in &report.shared_subnets {
        let ids: Vec<String> = s.vlans.iter().map(ToString::to_string).collect();
        lines.push(format!("subnet {} shared by VLANs {}", s.subnet, ids.join(", ")));
    }
    lines
}

fn detail(report: &ConsistencyReport) -> String {
    if report.is_clean() {
        return "No consistency issues".into();
    }
    let mut out = vec![format!("{} issue(s):", report.issue_count())];
    out.extend(issue_lines(report).into_iter().map(|l| format!("  - {l}")));
    out.join("\n")
}

pub fn handle(store: &NetworkStore, global: &GlobalOpts) -> Result<(), CliError> {
    let report = store.consistency_report();
    tracing::debug!(issues = report.issue_count(), "consistency report built");

    let out = output::render_single(&global.output_format(), &report, detail, |r| {
        issue_lines(r).join("\n")
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_report_reads_naturally() {
        let store = NetworkStore::seeded(Some(1));
        let text = detail(&store.consistency_report());
        assert!(text.starts_with("3 issue(s):"));
        assert!(text.contains("VLAN 50 lists dev-010 but it is assigned to VLAN 40"));
        assert!(text.contains("subnet 10.40.0.0/24 shared by VLANs 40, 50"));
    }
}
