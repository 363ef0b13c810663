use crate::common::errors::Result;
use crate::common::table::{DataTable, MISSING_MARKER};
use crate::inference::assignment::Assignment;
use crate::inference::markov_blanket::markov_blanket;
use crate::model::network::BayesianNetwork;
use crate::model::{BinaryValue, NodeId};
use log::{debug, info, trace, warn};
use rayon::prelude::*;

#[derive(Debug, Clone, Default)]
pub struct PredictOptions {
    /// Node whose value the `?` column holds. When unset, the node named by
    /// the column header itself is used.
    pub target: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PredictionSummary {
    pub rows: usize,
    /// Rows whose target cell was overwritten.
    pub predicted: usize,
    /// Predictions that came out as `1`.
    pub predicted_ones: usize,
}

/// Column bindings shared by every row of one table.
struct PredictionPlan {
    /// Column backing each node, by node index.
    columns: Vec<Option<usize>>,
    marker: usize,
    query: NodeId,
}

fn plan(
    network: &BayesianNetwork,
    table: &DataTable,
    options: &PredictOptions,
) -> Result<Option<PredictionPlan>> {
    let Some(marker) = table.marker_column() else {
        warn!(
            "No '{}' column in the table header; rows pass through unchanged",
            MISSING_MARKER
        );
        return Ok(None);
    };

    let query = match options.target.as_deref() {
        Some(target) => network.require(target)?,
        None => match network.id_of(&table.header[marker]) {
            Some(id) => id,
            None => {
                warn!(
                    "No node named '{}' for the target column; rows pass through unchanged",
                    table.header[marker]
                );
                return Ok(None);
            }
        },
    };

    let columns = network
        .nodes()
        .iter()
        .map(|node| table.column_index(&node.name))
        .collect();
    debug!(
        "Predicting '{}' into column {}",
        network.node(query).name,
        marker
    );
    Ok(Some(PredictionPlan {
        columns,
        marker,
        query,
    }))
}

fn predict_row(network: &BayesianNetwork, plan: &PredictionPlan, row: &[String]) -> Result<BinaryValue> {
    let assignment = Assignment::from_row(&plan.columns, row);
    trace!(
        "Row evidence: {} of {} nodes known",
        assignment.known(),
        network.len()
    );
    let posterior = markov_blanket(network, plan.query, &assignment)?;
    Ok(BinaryValue::from(posterior >= 0.5))
}

fn apply(table: &mut DataTable, marker: usize, predictions: Vec<BinaryValue>) -> PredictionSummary {
    let mut summary = PredictionSummary {
        rows: table.len(),
        ..Default::default()
    };
    for (row, value) in table.rows.iter_mut().zip(predictions) {
        if let Some(cell) = row.get_mut(marker) {
            *cell = value.as_token().to_string();
            summary.predicted += 1;
            if value == BinaryValue::One {
                summary.predicted_ones += 1;
            }
        }
    }
    info!(
        "Predicted {} of {} rows ({} ones)",
        summary.predicted, summary.rows, summary.predicted_ones
    );
    summary
}

/// Fills the `?` column of every row with the thresholded
/// [`markov_blanket`] posterior of the target node.
///
/// Each row is read into its own [`Assignment`]; rows share no state. Without
/// a `?` column or a matching node the table is left exactly as it was. An
/// explicit [`PredictOptions::target`] that names no node is an error. On
/// error no cell is modified.
pub fn predict_missing(
    network: &BayesianNetwork,
    table: &mut DataTable,
    options: &PredictOptions,
) -> Result<PredictionSummary> {
    let Some(plan) = plan(network, table, options)? else {
        return Ok(PredictionSummary {
            rows: table.len(),
            ..Default::default()
        });
    };
    let predictions = table
        .rows
        .iter()
        .map(|row| predict_row(network, &plan, row))
        .collect::<Result<Vec<_>>>()?;
    Ok(apply(table, plan.marker, predictions))
}

/// [`predict_missing`] with rows spread over the rayon thread pool. The
/// output is identical to the sequential version.
pub fn predict_missing_parallel(
    network: &BayesianNetwork,
    table: &mut DataTable,
    options: &PredictOptions,
) -> Result<PredictionSummary> {
    let Some(plan) = plan(network, table, options)? else {
        return Ok(PredictionSummary {
            rows: table.len(),
            ..Default::default()
        });
    };
    let predictions = table
        .rows
        .par_iter()
        .map(|row| predict_row(network, &plan, row))
        .collect::<Result<Vec<_>>>()?;
    Ok(apply(table, plan.marker, predictions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::ProbNetError;
    use crate::model::node::Cpt;

    fn network() -> BayesianNetwork {
        let mut network = BayesianNetwork::from_structure_str("spam:\nlab: spam\n").unwrap();
        network.set_cpt("spam", Cpt::from_pairs(&[[0.5, 0.5]])).unwrap();
        // row 0: spam = 1, row 1: spam = 0
        network
            .set_cpt("lab", Cpt::from_pairs(&[[0.9, 0.1], [0.2, 0.8]]))
            .unwrap();
        network
    }

    fn with_target() -> PredictOptions {
        PredictOptions {
            target: Some("spam".to_string()),
        }
    }

    #[test]
    fn test_no_marker_is_a_no_op() {
        let mut table = DataTable::from_slices(&["spam", "lab"], &[&["?", "1"], &["0", "0"]]);
        let before = table.clone();
        let summary = predict_missing(&network(), &mut table, &with_target()).unwrap();
        assert_eq!(table, before);
        assert_eq!(summary.predicted, 0);
        assert_eq!(summary.rows, 2);
    }

    #[test]
    fn test_marker_without_matching_node_is_a_no_op() {
        let mut table = DataTable::from_slices(&["?", "lab"], &[&["x", "1"]]);
        let before = table.clone();
        predict_missing(&network(), &mut table, &PredictOptions::default()).unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn test_explicit_target_fills_marker_column() {
        let mut table = DataTable::from_slices(
            &["?", "lab"],
            &[&["x", "1"], &["x", "0"], &["x", "?"]],
        );
        let summary = predict_missing(&network(), &mut table, &with_target()).unwrap();
        // lab = 1 favours spam = 0, lab = 0 favours spam = 1, unknown lab ties at 0.5
        assert_eq!(table.rows[0], vec!["0", "1"]);
        assert_eq!(table.rows[1], vec!["1", "0"]);
        assert_eq!(table.rows[2], vec!["1", "?"]);
        assert_eq!(table.header, vec!["?", "lab"]);
        assert_eq!(
            summary,
            PredictionSummary {
                rows: 3,
                predicted: 3,
                predicted_ones: 2
            }
        );
    }

    #[test]
    fn test_unknown_explicit_target_is_an_error() {
        let mut table = DataTable::from_slices(&["?", "lab"], &[&["x", "1"]]);
        let options = PredictOptions {
            target: Some("ham".to_string()),
        };
        let err = predict_missing(&network(), &mut table, &options).unwrap_err();
        assert!(matches!(err, ProbNetError::UnknownNode { .. }));
    }

    #[test]
    fn test_node_named_like_marker_is_used() {
        let mut network = BayesianNetwork::from_structure_str("?:\nlab: ?\n").unwrap();
        network.set_cpt("?", Cpt::from_pairs(&[[0.5, 0.5]])).unwrap();
        network
            .set_cpt("lab", Cpt::from_pairs(&[[0.9, 0.1], [0.2, 0.8]]))
            .unwrap();
        let mut table = DataTable::from_slices(&["?", "lab"], &[&["x", "0"]]);
        predict_missing(&network, &mut table, &PredictOptions::default()).unwrap();
        assert_eq!(table.rows[0], vec!["1", "0"]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let rows: Vec<Vec<String>> = (0..64)
            .map(|i| vec!["x".to_string(), ["0", "1", "?"][i % 3].to_string()])
            .collect();
        let mut sequential = DataTable::new(vec!["?".to_string(), "lab".to_string()], rows);
        let mut parallel = sequential.clone();
        let network = network();
        let a = predict_missing(&network, &mut sequential, &with_target()).unwrap();
        let b = predict_missing_parallel(&network, &mut parallel, &with_target()).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(a, b);
    }
}
