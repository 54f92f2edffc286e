//! Topology projection: the nodes and links the canvas would draw.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use citygrid_core::{NetworkLink, NetworkNode, NetworkStore, VlanId};

use crate::cli::{GlobalOpts, TopologyArgs};
use crate::error::CliError;
use crate::output;

use super::{links, util};

#[derive(Serialize)]
struct TopologyView {
    selected_vlan: Option<VlanId>,
    nodes: Vec<Arc<NetworkNode>>,
    links: Vec<Arc<NetworkLink>>,
}

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Glyph")]
    glyph: &'static str,
    #[tabled(rename = "VLAN")]
    vlan: VlanId,
    #[tabled(rename = "X")]
    x: String,
    #[tabled(rename = "Y")]
    y: String,
}

fn detail(view: &TopologyView) -> String {
    let nodes: Vec<NodeRow> = view
        .nodes
        .iter()
        .map(|n| NodeRow {
            id: n.id.clone(),
            label: n.label.clone(),
            glyph: n.device_type.glyph(),
            vlan: n.vlan_id,
            x: format!("{:.0}", n.x),
            y: format!("{:.0}", n.y),
        })
        .collect();
    let links: Vec<_> = view.links.iter().map(links::row).collect();

    let heading = view
        .selected_vlan
        .map_or_else(|| "All VLANs".to_owned(), |v| format!("VLAN {v}"));
    format!(
        "{heading}: {} nodes, {} links\n{}\n{}",
        view.nodes.len(),
        view.links.len(),
        output::render_table(&nodes),
        output::render_table(&links),
    )
}

pub fn handle(
    store: &NetworkStore,
    args: &TopologyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(vlan) = args.vlan {
        util::require_vlan(store, vlan)?;
    }
    store.set_selected_vlan(args.vlan);

    let view = TopologyView {
        selected_vlan: store.selected_vlan(),
        nodes: store.filtered_nodes(),
        links: store.filtered_links(),
    };
    let out = output::render_single(&global.output_format(), &view, detail, |v| {
        v.nodes
            .iter()
            .map(|n| n.id.clone())
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
