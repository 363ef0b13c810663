use crate::model::network::BayesianNetwork;
use std::fmt::Write as _;

const NODE_COLOR: &str = "#6FA8DC";
const HIGHLIGHT_COLOR: &str = "#FF6F61";

/// Renders the network topology as a Graphviz `digraph`.
///
/// Only names and parent to child edges are used, never probabilities.
/// `highlight` fills one node with a contrasting color, typically the node
/// being predicted.
pub fn render_dot(network: &BayesianNetwork, highlight: Option<&str>) -> String {
    let mut out = String::from("digraph network {\n");
    out.push_str("    node [shape=ellipse, style=filled];\n");
    for node in network.nodes() {
        let color = if Some(node.name.as_str()) == highlight {
            HIGHLIGHT_COLOR
        } else {
            NODE_COLOR
        };
        let _ = writeln!(
            out,
            "    \"{}\" [fillcolor=\"{}\"];",
            escape(&node.name),
            color
        );
    }
    for (parent, child) in network.edges() {
        let _ = writeln!(out, "    \"{}\" -> \"{}\";", escape(parent), escape(child));
    }
    out.push_str("}\n");
    out
}

fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_lists_nodes_and_edges() {
        let network = BayesianNetwork::from_structure_str("spam:\nlab: spam\n").unwrap();
        let dot = render_dot(&network, Some("spam"));
        assert!(dot.starts_with("digraph network {"));
        assert!(dot.contains("\"spam\" [fillcolor=\"#FF6F61\"];"));
        assert!(dot.contains("\"lab\" [fillcolor=\"#6FA8DC\"];"));
        assert!(dot.contains("\"spam\" -> \"lab\";"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_quotes_are_escaped() {
        let network = BayesianNetwork::from_structure_str("a\"b:\n").unwrap();
        assert!(render_dot(&network, None).contains("\"a\\\"b\""));
    }
}
