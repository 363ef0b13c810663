use crate::model::{BinaryValue, NodeId};
use ndarray::{Array2, ArrayView1, Axis};

/// Conditional probability table of a binary node.
///
/// One row per parent configuration (`2^k` rows for `k` parents), each row
/// holding `[P(0), P(1)]`. A freshly parsed node has an empty table until the
/// learner fills it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cpt {
    table: Array2<f64>,
}

impl Default for Cpt {
    fn default() -> Self {
        Cpt::empty()
    }
}

impl Cpt {
    pub fn empty() -> Self {
        Cpt {
            table: Array2::zeros((0, 2)),
        }
    }

    /// Wraps a `rows x 2` probability matrix.
    pub fn from_table(table: Array2<f64>) -> Self {
        debug_assert_eq!(table.ncols(), 2);
        Cpt { table }
    }

    /// Builds a table from `[P(0), P(1)]` pairs.
    pub fn from_pairs(pairs: &[[f64; 2]]) -> Self {
        let mut table = Array2::zeros((pairs.len(), 2));
        for (row, pair) in pairs.iter().enumerate() {
            table[[row, 0]] = pair[0];
            table[[row, 1]] = pair[1];
        }
        Cpt { table }
    }

    pub fn rows(&self) -> usize {
        self.table.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.table.nrows() == 0
    }

    pub fn row(&self, row: usize) -> Option<ArrayView1<'_, f64>> {
        (row < self.rows()).then(|| self.table.index_axis(Axis(0), row))
    }

    /// `P(value | configuration row)`.
    pub fn probability(&self, row: usize, value: BinaryValue) -> Option<f64> {
        self.table.get([row, value.index()]).copied()
    }

    pub fn pairs(&self) -> Vec<[f64; 2]> {
        self.table
            .rows()
            .into_iter()
            .map(|row| [row[0], row[1]])
            .collect()
    }

    pub fn table(&self) -> &Array2<f64> {
        &self.table
    }
}

/// A binary variable of the network.
///
/// `parent_names` keeps the names as declared in the structure file; the link
/// step resolves them into `parents` and derives `children`. Both id lists
/// are only meaningful once the owning network has linked.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub parent_names: Vec<String>,
    pub parents: Vec<NodeId>,
    pub children: Vec<NodeId>,
    pub cpt: Cpt,
    /// Column of this node in the most recent training table.
    pub data_index: Option<usize>,
}

impl Node {
    /// Creates an unlinked skeleton node.
    pub fn new(name: impl Into<String>, parent_names: Vec<String>) -> Self {
        Node {
            name: name.into(),
            parent_names,
            parents: Vec::new(),
            children: Vec::new(),
            cpt: Cpt::empty(),
            data_index: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_names.is_empty()
    }

    /// Number of CPT rows this node needs once learned.
    pub fn expected_rows(&self) -> usize {
        1 << self.parent_names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpt_lookup() {
        let cpt = Cpt::from_pairs(&[[0.25, 0.75], [0.6, 0.4]]);
        assert_eq!(cpt.rows(), 2);
        assert_eq!(cpt.probability(0, BinaryValue::One), Some(0.75));
        assert_eq!(cpt.probability(1, BinaryValue::Zero), Some(0.6));
        assert_eq!(cpt.probability(2, BinaryValue::Zero), None);
        assert_eq!(cpt.row(1).unwrap().to_vec(), vec![0.6, 0.4]);
        assert!(cpt.row(2).is_none());
        assert_eq!(cpt.pairs(), vec![[0.25, 0.75], [0.6, 0.4]]);
    }

    #[test]
    fn test_skeleton_node() {
        let node = Node::new("lab", vec!["spam".to_string(), "george".to_string()]);
        assert!(!node.is_root());
        assert_eq!(node.expected_rows(), 4);
        assert!(node.cpt.is_empty());
        assert!(Node::new("spam", vec![]).is_root());
    }
}
