use anyhow::{Context, Result, bail};
use probnet::common::setup::parse_configuration_options;
use probnet::common::train::{predict_file, setup_and_learn};
use probnet::inference::PredictOptions;
use probnet::model::serialize::write_cpt_dump;
use probnet::model::snapshot::NetworkSnapshot;
use probnet::scenarios::sample_table_seeded;
use probnet::{print_blue, print_green, print_red, print_yellow};

fn main() -> Result<()> {
    let config = parse_configuration_options(
        "probnet",
        "Learn CPTs of a binary Bayesian network and predict missing values.",
    );

    let (Some(structure), Some(train)) = (config.structure.as_deref(), config.train.as_deref()) else {
        print_red!("--structure and --train are required");
        bail!("missing required arguments");
    };

    print_blue!("===== LEARNING =====");
    let (network, report) = setup_and_learn(structure, train)
        .with_context(|| format!("learning from '{}' and '{}'", structure, train))?;
    print_green!("Learned {} nodes from {} rows", network.len(), report.rows);

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

    if let Some(test) = config.test.as_deref() {
        print_blue!("===== PREDICTION =====");
        let output = config
            .prediction_output
            .as_deref()
            .unwrap_or("completedTest.csv");
        let options = PredictOptions {
            target: config.target.clone(),
        };
        let summary = predict_file(&network, test, output, &options, config.parallel)
            .with_context(|| format!("predicting '{}'", test))?;
        if summary.predicted == 0 {
            print_yellow!("No predictions were made; check the '?' column and --target");
        } else {
            print_green!(
                "Predicted {} of {} rows ({} ones), written to {}",
                summary.predicted,
                summary.rows,
                summary.predicted_ones,
                output
            );
        }
    }

    if let Some(rows) = config.sample_rows {
        print_blue!("===== SAMPLING =====");
        let output = config.sample_output.as_deref().unwrap_or("samples.csv");
        sample_table_seeded(&network, rows, config.seed)
            .and_then(|table| table.write_csv(output))
            .context("sampling synthetic rows")?;
        print_green!("{} synthetic rows written to {}", rows, output);
    }

    Ok(())
}
