//! Link listing.

use std::sync::Arc;

use tabled::Tabled;

use citygrid_core::{NetworkLink, NetworkStore};

use crate::cli::{GlobalOpts, LinksArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
pub(crate) struct LinkRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
    #[tabled(rename = "Strength")]
    strength: String,
}

pub(crate) fn row(l: &Arc<NetworkLink>) -> LinkRow {
    LinkRow {
        source: l.source.clone(),
        target: l.target.clone(),
        vlan: if l.is_cross_vlan() {
            "cross".into()
        } else {
            l.vlan_id.to_string()
        },
        strength: format!("{:.1}", l.strength),
    }
}

pub fn handle(store: &NetworkStore, args: &LinksArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(vlan) = args.vlan {
        util::require_vlan(store, vlan)?;
    }
    let format = global.output_format();
    let links = store.links_for(args.vlan);

    if links.is_empty() {
        if let Some(notice) = output::empty_notice(&format, "No matching links") {
            output::print_output(&notice, global.quiet);
            return Ok(());
        }
    }

    let out = output::render_list(&format, &links, row, |l| {
        format!("{} -> {}", l.source, l.target)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
