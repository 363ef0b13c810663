use anyhow::{Context, Result, bail};
use probnet::common::setup::parse_configuration_options;
use probnet::common::train::{predict_file, setup_and_learn};
use probnet::inference::PredictOptions;
use probnet::model::snapshot::NetworkSnapshot;
use probnet::{print_blue, print_green, print_yellow};

fn main() -> Result<()> {
    let config = parse_configuration_options(
        "run_inference",
        "Fill the '?' column of a test table with Markov blanket predictions.",
    );

    let network = match (config.model.as_deref(), config.structure.as_deref(), config.train.as_deref()) {
        (Some(model), _, _) => {
            print_blue!("Loading snapshot {}", model);
            NetworkSnapshot::load_from_file(model)
                .and_then(|snapshot| snapshot.to_network())
                .with_context(|| format!("loading snapshot '{}'", model))?
        }
        (None, Some(structure), Some(train)) => {
            print_blue!("Learning from {} and {}", structure, train);
            setup_and_learn(structure, train)
                .with_context(|| format!("learning from '{}' and '{}'", structure, train))?
                .0
        }
        _ => bail!("either --model or both --structure and --train are required"),
    };

    let Some(test) = config.test.as_deref() else {
        bail!("--test is required");
    };
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
    Ok(())
}
