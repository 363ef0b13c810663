use crate::common::errors::{ProbNetError, Result};
use crate::common::table::DataTable;
use crate::model::network::BayesianNetwork;
use crate::model::node::Cpt;
use crate::model::{BinaryValue, NodeId, encode_parent_row};
use log::{debug, info, trace};
use ndarray::Array2;

/// Pseudo-count added to every cell before normalizing (Laplace smoothing).
pub const PSEUDO_COUNT: f64 = 1.0;

/// What a learning pass saw.
#[derive(Debug, Clone, PartialEq)]
pub struct LearningReport {
    /// Data rows scanned.
    pub rows: usize,
    /// Per node, in declaration order: rows where the node's cell was `0`/`1`.
    pub observed: Vec<(String, usize)>,
}

/// Learns every CPT of `network` from `table` in one pass.
///
/// Every node must have a column of the same name. All columns are resolved
/// and all tables computed before any node is touched, so on error the
/// network keeps its previous CPTs.
pub fn learn_cpts(network: &mut BayesianNetwork, table: &DataTable) -> Result<LearningReport> {
    info!(
        "Learning CPTs for {} nodes from {} rows",
        network.len(),
        table.len()
    );

    let columns = network
        .nodes()
        .iter()
        .map(|node| {
            table
                .column_index(&node.name)
                .ok_or_else(|| ProbNetError::ColumnNotFound {
                    column: node.name.clone(),
                })
        })
        .collect::<Result<Vec<usize>>>()?;

    let mut learned = Vec::with_capacity(network.len());
    let mut observed = Vec::with_capacity(network.len());
    for id in network.ids() {
        let node = network.node(id);
        let column = columns[id.index()];
        let cpt = if node.parents.is_empty() {
            learn_root_cpt(table, column)
        } else {
            let parent_columns: Vec<usize> =
                node.parents.iter().map(|parent| columns[parent.index()]).collect();
            learn_conditional_cpt(table, column, &parent_columns)
        };
        let seen = table
            .rows
            .iter()
            .filter(|row| cell_value(row, column).is_some())
            .count();
        debug!(
            "Learned {} CPT rows for '{}' ({} observed cells)",
            cpt.rows(),
            node.name,
            seen
        );
        observed.push((node.name.clone(), seen));
        learned.push(cpt);
    }

    for (index, (cpt, column)) in learned.into_iter().zip(columns).enumerate() {
        let node = network.node_mut(NodeId(index));
        node.cpt = cpt;
        node.data_index = Some(column);
    }

    info!("CPT learning completed");
    Ok(LearningReport {
        rows: table.len(),
        observed,
    })
}

fn cell_value(row: &[String], column: usize) -> Option<BinaryValue> {
    row.get(column).and_then(|cell| BinaryValue::from_token(cell))
}

/// Single-row CPT of a parentless node:
/// `P(0) = (low + 1) / (low + high + 2)`, `P(1) = (high + 1) / (low + high + 2)`.
pub fn learn_root_cpt(table: &DataTable, column: usize) -> Cpt {
    let (mut low, mut high) = (0usize, 0usize);
    for row in &table.rows {
        match cell_value(row, column) {
            Some(BinaryValue::Zero) => low += 1,
            Some(BinaryValue::One) => high += 1,
            None => {}
        }
    }
    trace!("Root column {}: low={} high={}", column, low, high);

    let total = (low + high) as f64;
    if total == 0.0 {
        return Cpt::from_pairs(&[[0.5, 0.5]]);
    }
    let denominator = total + 2.0 * PSEUDO_COUNT;
    Cpt::from_pairs(&[[
        (low as f64 + PSEUDO_COUNT) / denominator,
        (high as f64 + PSEUDO_COUNT) / denominator,
    ]])
}

/// CPT of a node with parents, one row per parent configuration.
///
/// Every row starts at counts `(1, 1)`. A data row adds one to the cell of the
/// node's observed value in the row selected by [`encode_parent_row`]; rows
/// where the node itself is unobserved are skipped.
pub fn learn_conditional_cpt(table: &DataTable, column: usize, parent_columns: &[usize]) -> Cpt {
    let configurations = 1usize << parent_columns.len();
    let mut counts = Array2::from_elem((configurations, 2), PSEUDO_COUNT);

    for row in &table.rows {
        let Some(value) = cell_value(row, column) else {
            continue;
        };
        let index = encode_parent_row(parent_columns.iter().map(|&parent| cell_value(row, parent)));
        counts[[index, value.index()]] += 1.0;
    }

    for mut pair in counts.rows_mut() {
        let total = pair.sum();
        if total == 0.0 {
            pair.fill(0.5);
        } else {
            pair.mapv_inplace(|count| count / total);
        }
    }
    Cpt::from_table(counts)
}
