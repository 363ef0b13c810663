use crate::common::errors::{ProbNetError, Result};
use crate::inference::assignment::Assignment;
use crate::model::network::BayesianNetwork;
use crate::model::{BinaryValue, NodeId, encode_parent_row};
use log::trace;

/// CPT row of `node` selected by its parents' assigned values.
///
/// Parents assigned `0` set their bit, first parent most significant. Parents
/// without a value set no bit; callers are expected to assign them.
pub fn cpt_row_index(network: &BayesianNetwork, node: NodeId, assignment: &Assignment) -> usize {
    encode_parent_row(
        network
            .node(node)
            .parents
            .iter()
            .map(|&parent| assignment.get(parent)),
    )
}

fn lookup(
    network: &BayesianNetwork,
    id: NodeId,
    assignment: &Assignment,
    value: BinaryValue,
) -> Result<f64> {
    let node = network.node(id);
    if node.cpt.rows() != node.expected_rows() {
        return Err(ProbNetError::CptNotLearned {
            node: node.name.clone(),
        });
    }
    let row = cpt_row_index(network, id, assignment);
    node.cpt
        .probability(row, value)
        .ok_or_else(|| ProbNetError::CptNotLearned {
            node: node.name.clone(),
        })
}

/// `P(node = 1 | parents)` with the parents' values taken from `assignment`.
pub fn probability_of_one(
    network: &BayesianNetwork,
    node: NodeId,
    assignment: &Assignment,
) -> Result<f64> {
    lookup(network, node, assignment, BinaryValue::One)
}

/// The CPT entry for the node's assigned value, at the row selected by its
/// parents' assigned values.
pub fn conditional_probability(
    network: &BayesianNetwork,
    node: NodeId,
    assignment: &Assignment,
) -> Result<f64> {
    let value = assignment
        .get(node)
        .ok_or_else(|| ProbNetError::UnassignedValue {
            node: network.node(node).name.clone(),
        })?;
    lookup(network, node, assignment, value)
}

/// Approximate `P(query = 1)` from the query's own CPT and its observed
/// children.
///
/// For each candidate value `v` the joint is `P(query = v | parents)` times,
/// for every child with a known value, `P(child = 1 | parents)` when the child
/// is `1` or `1 - P(child = 1 | parents)` when it is `0`, where the child's
/// parents include the query set to `v`. Children without a value contribute
/// nothing. The children's other parents are only used as already assigned,
/// so this is not exact Markov blanket inference.
///
/// The query's own factor is the probability of the candidate value itself,
/// `P(query = 0 | parents)` for `v = 0`, rather than `P(query = 1 | parents)`
/// for both candidates. With no evidence the result is therefore the prior
/// `P(query = 1)`.
///
/// Returns `joint(1) / (joint(0) + joint(1))`, or exactly `0.5` when both
/// joints are zero. `assignment` itself is left untouched.
pub fn markov_blanket(
    network: &BayesianNetwork,
    query: NodeId,
    assignment: &Assignment,
) -> Result<f64> {
    let mut working = assignment.clone();
    let mut joints = [0.0f64; 2];

    for value in [BinaryValue::Zero, BinaryValue::One] {
        working.set(query, value);
        let p = conditional_probability(network, query, &working)?;

        let mut p_children = 1.0;
        for &child in &network.node(query).children {
            match working.get(child) {
                Some(BinaryValue::One) => {
                    p_children *= probability_of_one(network, child, &working)?
                }
                Some(BinaryValue::Zero) => {
                    p_children *= 1.0 - probability_of_one(network, child, &working)?
                }
                None => {}
            }
        }
        joints[value.index()] = p * p_children;
    }

    let total = joints[0] + joints[1];
    trace!(
        "markov_blanket '{}': joint(0)={} joint(1)={}",
        network.node(query).name,
        joints[0],
        joints[1]
    );
    if total == 0.0 {
        return Ok(0.5);
    }
    Ok(joints[1] / total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::Cpt;
    use BinaryValue::*;

    const TOLERANCE: f64 = 1e-12;

    /// A -> B with P(A=1) = 0.6, P(B=1 | A=1) = 0.8, P(B=1 | A=0) = 0.3.
    fn two_node_network() -> BayesianNetwork {
        let mut network = BayesianNetwork::from_structure_str("A:\nB: A\n").unwrap();
        network.set_cpt("A", Cpt::from_pairs(&[[0.4, 0.6]])).unwrap();
        // row 0: A observed 1, row 1: A observed 0
        network
            .set_cpt("B", Cpt::from_pairs(&[[0.2, 0.8], [0.7, 0.3]]))
            .unwrap();
        network
    }

    #[test]
    fn test_conditional_probability_uses_assigned_value() {
        let network = two_node_network();
        let a = network.require("A").unwrap();
        let b = network.require("B").unwrap();
        let assignment = Assignment::unknown(&network).with(a, Zero).with(b, Zero);
        assert_eq!(cpt_row_index(&network, b, &assignment), 1);
        assert_eq!(conditional_probability(&network, b, &assignment).unwrap(), 0.7);
        assert_eq!(conditional_probability(&network, a, &assignment).unwrap(), 0.4);
        assert_eq!(probability_of_one(&network, b, &assignment).unwrap(), 0.3);
    }

    #[test]
    fn test_unassigned_node_is_an_error() {
        let network = two_node_network();
        let b = network.require("B").unwrap();
        let err = conditional_probability(&network, b, &Assignment::unknown(&network)).unwrap_err();
        assert!(matches!(err, ProbNetError::UnassignedValue { .. }));
    }

    #[test]
    fn test_unlearned_cpt_is_an_error() {
        let network = BayesianNetwork::from_structure_str("A:\n").unwrap();
        let a = network.require("A").unwrap();
        let err = markov_blanket(&network, a, &Assignment::unknown(&network)).unwrap_err();
        assert!(matches!(err, ProbNetError::CptNotLearned { .. }));
    }

    #[test]
    fn test_no_evidence_returns_prior_of_one() {
        let mut network = two_node_network();
        network.set_cpt("A", Cpt::from_pairs(&[[0.7, 0.3]])).unwrap();
        let a = network.require("A").unwrap();
        let posterior = markov_blanket(&network, a, &Assignment::unknown(&network)).unwrap();
        // 0.3 / (0.7 + 0.3), below the threshold, so A is predicted 0
        assert!((posterior - 0.3).abs() < TOLERANCE);
    }

    #[test]
    fn test_observed_child_shifts_posterior() {
        let network = two_node_network();
        let a = network.require("A").unwrap();
        let b = network.require("B").unwrap();

        let child_one = Assignment::unknown(&network).with(b, One);
        // 0.6 * 0.8 / (0.6 * 0.8 + 0.4 * 0.3)
        let posterior = markov_blanket(&network, a, &child_one).unwrap();
        assert!((posterior - 0.8).abs() < TOLERANCE);

        let child_zero = Assignment::unknown(&network).with(b, Zero);
        // 0.6 * 0.2 / (0.6 * 0.2 + 0.4 * 0.7)
        let posterior = markov_blanket(&network, a, &child_zero).unwrap();
        assert!((posterior - 0.3).abs() < TOLERANCE);
    }

    #[test]
    fn test_unobserved_child_is_neutral() {
        let network = two_node_network();
        let a = network.require("A").unwrap();
        let posterior = markov_blanket(&network, a, &Assignment::unknown(&network)).unwrap();
        assert!((posterior - 0.6).abs() < TOLERANCE);
    }

    #[test]
    fn test_caller_assignment_is_untouched() {
        let network = two_node_network();
        let a = network.require("A").unwrap();
        let b = network.require("B").unwrap();
        let assignment = Assignment::unknown(&network).with(b, One);
        let before = assignment.clone();
        markov_blanket(&network, a, &assignment).unwrap();
        assert_eq!(assignment, before);
    }

    #[test]
    fn test_both_joints_zero_gives_half() {
        let mut network = BayesianNetwork::from_structure_str("A:\nB: A\n").unwrap();
        network.set_cpt("A", Cpt::from_pairs(&[[0.5, 0.5]])).unwrap();
        network
            .set_cpt("B", Cpt::from_pairs(&[[1.0, 0.0], [1.0, 0.0]]))
            .unwrap();
        let a = network.require("A").unwrap();
        let b = network.require("B").unwrap();
        let assignment = Assignment::unknown(&network).with(b, One);
        assert_eq!(markov_blanket(&network, a, &assignment).unwrap(), 0.5);
    }

    #[test]
    fn test_child_lookup_uses_co_parent_value() {
        // C: A B, query A with B = 0 and C = 1
        let mut network = BayesianNetwork::from_structure_str("A:\nB:\nC: A B\n").unwrap();
        network.set_cpt("A", Cpt::from_pairs(&[[0.5, 0.5]])).unwrap();
        network.set_cpt("B", Cpt::from_pairs(&[[0.5, 0.5]])).unwrap();
        network
            .set_cpt(
                "C",
                // rows: (A=1,B=1), (A=1,B=0), (A=0,B=1), (A=0,B=0)
                Cpt::from_pairs(&[[0.5, 0.5], [0.1, 0.9], [0.5, 0.5], [0.7, 0.3]]),
            )
            .unwrap();
        let a = network.require("A").unwrap();
        let b = network.require("B").unwrap();
        let c = network.require("C").unwrap();
        let assignment = Assignment::unknown(&network).with(b, Zero).with(c, One);
        // 0.5 * 0.9 / (0.5 * 0.9 + 0.5 * 0.3)
        let posterior = markov_blanket(&network, a, &assignment).unwrap();
        assert!((posterior - 0.75).abs() < TOLERANCE);
    }
}
