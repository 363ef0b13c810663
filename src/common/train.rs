use crate::common::errors::Result;
use crate::common::table::DataTable;
use crate::inference::predict::{
    PredictOptions, PredictionSummary, predict_missing, predict_missing_parallel,
};
use crate::learning::{LearningReport, learn_cpts};
use crate::model::network::BayesianNetwork;
use log::info;
use std::path::Path;

/// Parses the structure file, links it and learns every CPT from the
/// training table.
pub fn setup_and_learn(
    structure: impl AsRef<Path>,
    train: impl AsRef<Path>,
) -> Result<(BayesianNetwork, LearningReport)> {
    let structure = structure.as_ref();
    let train = train.as_ref();
    info!("Parsing network structure from '{}'", structure.display());
    let mut network = BayesianNetwork::from_structure_file(structure)?;

    info!("Learning CPTs from training data '{}'", train.display());
    let table = DataTable::read_csv(train)?;
    let report = learn_cpts(&mut network, &table)?;
    Ok((network, report))
}

/// Reads `test`, fills its `?` column and writes the completed table to
/// `output`. Nothing is written if prediction fails.
pub fn predict_file(
    network: &BayesianNetwork,
    test: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &PredictOptions,
    parallel: bool,
) -> Result<PredictionSummary> {
    let test = test.as_ref();
    let output = output.as_ref();
    info!("Predicting missing values in '{}'", test.display());
    let mut table = DataTable::read_csv(test)?;
    let summary = if parallel {
        predict_missing_parallel(network, &mut table, options)?
    } else {
        predict_missing(network, &mut table, options)?
    };
    table.write_csv(output)?;
    info!("Predictions written to '{}'", output.display());
    Ok(summary)
}
