use anyhow::{Context, Result, bail};
use probnet::common::setup::parse_configuration_options;
use probnet::common::train::setup_and_learn;
use probnet::model::serialize::write_cpt_dump;
use probnet::model::snapshot::NetworkSnapshot;
use probnet::{print_blue, print_green};

fn main() -> Result<()> {
    let config = parse_configuration_options("train", "Learn the CPTs of a binary Bayesian network.");

    let Some(structure) = config.structure.as_deref() else {
        bail!("--structure is required");
    };
    let Some(train) = config.train.as_deref() else {
        bail!("--train is required");
    };
    print_blue!("Structure: {}", structure);
    print_blue!("Training data: {}", train);

    let (network, report) = setup_and_learn(structure, train)
        .with_context(|| format!("learning from '{}' and '{}'", structure, train))?;

    if let Some(path) = config.cpt_output.as_deref() {
        write_cpt_dump(&network, path).context("writing CPT dump")?;
        print_green!("CPTs written to {}", path);
    }
    if let Some(path) = config.model_output.as_deref() {
        NetworkSnapshot::from_network(&network, Some(report.rows))
            .save_to_file(path)
            .context("writing network snapshot")?;
        print_green!("Snapshot written to {}", path);
    }

    print_green!(
        "CPT learning completed: {} nodes from {} rows",
        network.len(),
        report.rows
    );
    Ok(())
}
