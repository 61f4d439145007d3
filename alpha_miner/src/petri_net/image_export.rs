use std::{fs::File, io::Write, path::Path};

use graphviz_rust::{
    cmd::Format,
    dot_generator::{attr, edge, graph, id, node, node_id, stmt},
    dot_structures::*,
    printer::{DotPrinter, PrinterContext},
};
use itertools::Itertools;

use super::petri_net_struct::PetriNet;

/// Build the Graphviz graph of a [`PetriNet`] (nodes sorted by id)
fn petri_net_to_graph(net: &PetriNet, dpi_factor: Option<f32>) -> Graph {
    let place_nodes: Vec<_> = net
        .places
        .iter()
        .sorted_by_key(|(p_id, _)| **p_id)
        .map(|(p_id, p)| {
            let symbol = if net.is_in_initial_marking(&p.into()) {
                "●"
            } else {
                ""
            };
            let name = p.label.clone().unwrap_or_default();
            let shape = if net.is_in_a_final_marking(&p.into()) {"doublecircle"} else {"circle"};
            let size = if net.is_in_a_final_marking(&p.into()) {0.4} else {0.5};
            stmt!(node!(esc p_id; attr!("label", esc symbol), attr!("xlabel", esc name), attr!("shape",shape), attr!("fixedsize",true), attr!("width",size), attr!("height",size)))
        }).collect();

    let transition_nodes: Vec<_> = net
        .transitions
        .iter()
        .sorted_by_key(|(t_id, _)| **t_id)
        .map(|(t_id, t)| {
            let label = t.label.clone().unwrap_or_default();
            let fill_color = if t.label.is_none() { "black" } else { "white" };
            stmt!(node!(esc t_id; attr!("label", esc label), attr!("shape","box"), attr!("style","filled"), attr!("fillcolor",fill_color), attr!("width",1.0), attr!("height",0.5)))
        }).collect();

    let arcs: Vec<_> = net
        .arcs
        .iter()
        .map(|arc| {
            let (from_id, to_id) = arc.from_to.source_target();
            stmt!(edge!(node_id!(esc from_id) => node_id!(esc to_id)))
        })
        .collect();

    let mut global_graph_options = vec![stmt!(attr!("rankdir", "LR"))];
    if let Some(dpi_fac) = dpi_factor {
        global_graph_options.push(stmt!(attr!("dpi", (dpi_fac * 96.0))))
    }

    graph!(strict di id!("alpha_net"), vec![global_graph_options, place_nodes, transition_nodes, arcs].into_iter().flatten().collect())
}

///
/// Render a [`PetriNet`] as Graphviz DOT text
///
/// Places show their label next to the node, initially marked places carry a token.
///
pub fn export_petri_net_to_dot(net: &PetriNet) -> String {
    petri_net_to_graph(net, None).print(&mut PrinterContext::default())
}

///
/// Export the image of a [`PetriNet`]
///
/// Requires an active graphviz installation in the PATH.
/// Also see [`export_petri_net_image_svg`] and [`export_petri_net_image_png`]
///
pub fn export_petri_net_image<P: AsRef<Path>>(
    net: &PetriNet,
    path: P,
    format: Format,
    dpi_factor: Option<f32>,
) -> Result<(), std::io::Error> {
    let g = petri_net_to_graph(net, dpi_factor);
    let out = graphviz_rust::exec(g, &mut PrinterContext::default(), vec![format.into()])?;
    let mut f = File::create(path)?;
    f.write_all(&out)?;
    Ok(())
}

///
/// Export the image of a [`PetriNet`] as a SVG file
///
pub fn export_petri_net_image_svg<P: AsRef<Path>>(net: &PetriNet, path: P) -> Result<(), std::io::Error> {
    export_petri_net_image(net, path, Format::Svg, None)
}

///
/// Export the image of a [`PetriNet`] as a PNG file
///
pub fn export_petri_net_image_png<P: AsRef<Path>>(net: &PetriNet, path: P) -> Result<(), std::io::Error> {
    export_petri_net_image(net, path, Format::Png, Some(2.0))
}

#[cfg(test)]
mod test {
    use crate::{alpha::full::alpha_discover_petri_net, AlphaConfig, TraceLog};

    use super::export_petri_net_to_dot;

    #[test]
    pub fn test_petri_net_dot_export() {
        let log = TraceLog::from_traces(vec![vec!["register", "decide"]]);
        let (pn, _) = alpha_discover_petri_net(&log, &AlphaConfig::default()).unwrap();
        let dot = export_petri_net_to_dot(&pn);
        assert!(dot.contains("digraph"));
        assert!(dot.contains("rankdir"));
        assert!(dot.contains("register"));
        assert!(dot.contains("({register},{decide})"));
        assert_eq!(dot.matches("->").count(), pn.arcs.len());
        assert_eq!(dot, export_petri_net_to_dot(&pn));
    }
}
