use crate::common::errors::{ProbNetError, Result};
use crate::common::table::DataTable;
use crate::inference::assignment::Assignment;
use crate::inference::markov_blanket::probability_of_one;
use crate::model::network::BayesianNetwork;
use crate::model::{BinaryValue, NodeId};
use log::{debug, info};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::VecDeque;

/// Orders nodes so every parent comes before its children, keeping
/// declaration order among nodes that are ready at the same time.
pub fn topological_order(network: &BayesianNetwork) -> Result<Vec<NodeId>> {
    let mut pending: Vec<usize> = network.nodes().iter().map(|n| n.parents.len()).collect();
    let mut ready: VecDeque<NodeId> = network
        .ids()
        .filter(|id| pending[id.index()] == 0)
        .collect();
    let mut order = Vec::with_capacity(network.len());

    while let Some(id) = ready.pop_front() {
        order.push(id);
        for &child in &network.node(id).children {
            // a child lists a repeated parent once per occurrence
            let edges = network
                .node(child)
                .parents
                .iter()
                .filter(|&&parent| parent == id)
                .count();
            pending[child.index()] -= edges;
            if pending[child.index()] == 0 {
                ready.push_back(child);
            }
        }
    }

    if order.len() != network.len() {
        let nodes = network
            .ids()
            .filter(|id| pending[id.index()] > 0)
            .map(|id| network.node(id).name.clone())
            .collect();
        return Err(ProbNetError::CycleDetected { nodes });
    }
    Ok(order)
}

/// Draws `rows` complete rows from the learned joint distribution by
/// ancestral sampling. Columns follow declaration order.
pub fn sample_table<R: Rng>(
    network: &BayesianNetwork,
    rows: usize,
    rng: &mut R,
) -> Result<DataTable> {
    let order = topological_order(network)?;
    let header = network.nodes().iter().map(|n| n.name.clone()).collect();
    let mut data = Vec::with_capacity(rows);

    for _ in 0..rows {
        let mut assignment = Assignment::unknown(network);
        for &id in &order {
            let p_one = probability_of_one(network, id, &assignment)?.clamp(0.0, 1.0);
            assignment.set(id, BinaryValue::from(rng.gen_bool(p_one)));
        }
        data.push(
            network
                .ids()
                .map(|id| {
                    assignment
                        .get(id)
                        .map(BinaryValue::as_token)
                        .unwrap_or("?")
                        .to_string()
                })
                .collect(),
        );
    }

    debug!("Sampled {} rows over {} nodes", rows, network.len());
    Ok(DataTable::new(header, data))
}

/// [`sample_table`] with a reproducible seed.
pub fn sample_table_seeded(network: &BayesianNetwork, rows: usize, seed: u64) -> Result<DataTable> {
    info!("Sampling {} synthetic rows with seed {}", rows, seed);
    let mut rng = StdRng::seed_from_u64(seed);
    sample_table(network, rows, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::learn_cpts;
    use crate::model::node::Cpt;

    fn sprinkler() -> BayesianNetwork {
        let mut network =
            BayesianNetwork::from_structure_str("wet: rain sprinkler\nrain:\nsprinkler: rain\n")
                .unwrap();
        network.set_cpt("rain", Cpt::from_pairs(&[[0.8, 0.2]])).unwrap();
        network
            .set_cpt("sprinkler", Cpt::from_pairs(&[[0.99, 0.01], [0.6, 0.4]]))
            .unwrap();
        network
            .set_cpt(
                "wet",
                Cpt::from_pairs(&[[0.01, 0.99], [0.2, 0.8], [0.1, 0.9], [1.0, 0.0]]),
            )
            .unwrap();
        network
    }

    #[test]
    fn test_parents_come_first() {
        let network = sprinkler();
        let order: Vec<&str> = topological_order(&network)
            .unwrap()
            .into_iter()
            .map(|id| network.node(id).name.as_str())
            .collect();
        assert_eq!(order, vec!["rain", "sprinkler", "wet"]);
    }

    #[test]
    fn test_cycle_is_reported() {
        let network = BayesianNetwork::from_structure_str("A: B\nB: A\nC:\n").unwrap();
        match topological_order(&network).unwrap_err() {
            ProbNetError::CycleDetected { nodes } => assert_eq!(nodes, vec!["A", "B"]),
            other => panic!("Expected CycleDetected, got {:?}", other),
        }
    }

    #[test]
    fn test_same_seed_same_table() {
        let network = sprinkler();
        let a = sample_table_seeded(&network, 50, 7).unwrap();
        let b = sample_table_seeded(&network, 50, 7).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.header, vec!["wet", "rain", "sprinkler"]);
        assert!(a.rows.iter().flatten().all(|cell| cell == "0" || cell == "1"));
    }

    #[test]
    fn test_relearning_recovers_cpts() {
        let source = sprinkler();
        let table = sample_table_seeded(&source, 20_000, 11).unwrap();
        let mut learned = BayesianNetwork::from_structure_str(
            "wet: rain sprinkler\nrain:\nsprinkler: rain\n",
        )
        .unwrap();
        learn_cpts(&mut learned, &table).unwrap();

        let rain = learned.node_by_name("rain").unwrap();
        assert!((rain.cpt.probability(0, BinaryValue::One).unwrap() - 0.2).abs() < 0.02);
        let sprinkler = learned.node_by_name("sprinkler").unwrap();
        // row 1: rain observed 0
        assert!((sprinkler.cpt.probability(1, BinaryValue::One).unwrap() - 0.4).abs() < 0.03);
    }
}
