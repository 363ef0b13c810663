use crate::model::network::BayesianNetwork;
use crate::model::{BinaryValue, NodeId};

/// Observed values for one query, indexed by node.
///
/// Replaces a mutable per-node value slot: every probability computation
/// receives the assignment explicitly, so the network itself stays shared
/// and immutable during inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<Option<BinaryValue>>,
}

impl Assignment {
    /// An assignment with every node of `network` unknown.
    pub fn unknown(network: &BayesianNetwork) -> Self {
        Assignment {
            values: vec![None; network.len()],
        }
    }

    /// Reads one table row. `columns[i]` is the column backing node `i`, if
    /// any; cells that are not `"0"`/`"1"` leave the node unknown.
    pub fn from_row(columns: &[Option<usize>], row: &[String]) -> Self {
        let values = columns
            .iter()
            .map(|column| {
                column
                    .and_then(|column| row.get(column))
                    .and_then(|cell| BinaryValue::from_token(cell))
            })
            .collect();
        Assignment { values }
    }

    pub fn get(&self, id: NodeId) -> Option<BinaryValue> {
        self.values.get(id.index()).copied().flatten()
    }

    pub fn set(&mut self, id: NodeId, value: BinaryValue) {
        self.values[id.index()] = Some(value);
    }

    /// Builder-style [`Self::set`].
    pub fn with(mut self, id: NodeId, value: BinaryValue) -> Self {
        self.set(id, value);
        self
    }

    pub fn known(&self) -> usize {
        self.values.iter().filter(|value| value.is_some()).count()
    }
}
