use anyhow::{Context, Result, bail};
use probnet::common::setup::parse_configuration_options;
use probnet::model::BayesianNetwork;
use probnet::model::diagram::render_dot;
use probnet::{print_blue, print_green};
use std::fs;

fn main() -> Result<()> {
    let config = parse_configuration_options("visualize", "Render the network topology as Graphviz DOT.");
    let Some(structure) = config.structure.as_deref() else {
        bail!("--structure is required");
    };
    print_blue!("Network Visualization: {}", structure);

    let network = BayesianNetwork::from_structure_file(structure)
        .with_context(|| format!("reading structure '{}'", structure))?;
    let dot = render_dot(&network, config.highlight.as_deref());

    let output = config.dot_output.as_deref().unwrap_or("network.dot");
    fs::write(output, dot).with_context(|| format!("writing '{}'", output))?;
    print_green!(
        "Diagram with {} nodes and {} edges saved to {}",
        network.len(),
        network.edges().len(),
        output
    );
    Ok(())
}
