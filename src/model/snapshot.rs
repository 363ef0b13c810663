use crate::common::errors::{ProbNetError, Result};
use crate::model::network::BayesianNetwork;
use crate::model::node::{Cpt, Node};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Serialized form of one node: its declared parents and learned CPT rows.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub name: String,
    pub parents: Vec<String>,
    /// `[P(0), P(1)]` per parent configuration row.
    pub cpt: Vec<[f64; 2]>,
}

/// Storage format for a learned network, so prediction can run without
/// re-learning.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NetworkSnapshot {
    /// Version for format compatibility
    pub version: u32,
    /// Timestamp when the snapshot was taken
    pub created_at: DateTime<Utc>,
    /// Number of training rows the CPTs were learned from
    pub training_rows: Option<usize>,
    pub nodes: Vec<NodeRecord>,
}

impl NetworkSnapshot {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn from_network(network: &BayesianNetwork, training_rows: Option<usize>) -> Self {
        if !network.is_learned() {
            warn!("Taking a snapshot of a network with unlearned CPTs");
        }
        let nodes = network
            .nodes()
            .iter()
            .map(|node| NodeRecord {
                name: node.name.clone(),
                parents: node.parent_names.clone(),
                cpt: node.cpt.pairs(),
            })
            .collect();
        NetworkSnapshot {
            version: Self::CURRENT_VERSION,
            created_at: Utc::now(),
            training_rows,
            nodes,
        }
    }

    /// Rebuilds and links the network, checking each CPT has `2^k` rows of
    /// probabilities in `[0, 1]` that sum to one.
    pub fn to_network(&self) -> Result<BayesianNetwork> {
        let skeleton = self
            .nodes
            .iter()
            .map(|record| Node::new(record.name.clone(), record.parents.clone()))
            .collect();
        let mut network = BayesianNetwork::from_skeleton(skeleton)?;
        for record in &self.nodes {
            let expected = network.node(network.require(&record.name)?).expected_rows();
            if record.cpt.len() != expected {
                return Err(ProbNetError::InvalidSnapshot(format!(
                    "node '{}' has {} CPT rows, expected {}",
                    record.name,
                    record.cpt.len(),
                    expected
                )));
            }
            if let Some((row, pair)) = record
                .cpt
                .iter()
                .enumerate()
                .find(|(_, pair)| !is_distribution(pair))
            {
                return Err(ProbNetError::InvalidSnapshot(format!(
                    "node '{}' row {} is not a probability distribution: {:?}",
                    record.name, row, pair
                )));
            }
            network.set_cpt(&record.name, Cpt::from_pairs(&record.cpt))?;
        }
        Ok(network)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: NetworkSnapshot = serde_json::from_str(json)?;
        if snapshot.version > Self::CURRENT_VERSION {
            return Err(ProbNetError::SnapshotVersion {
                found: snapshot.version,
                supported: Self::CURRENT_VERSION,
            });
        }
        Ok(snapshot)
    }

    /// Save the snapshot to a file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|e| ProbNetError::file_access(path, e))?;
        info!("Saved network snapshot to {}", path.display());
        Ok(())
    }

    /// Load a snapshot from a file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| ProbNetError::file_access(path, e))?;
        Self::from_json(&json)
    }
}

/// Allowed drift of `P(0) + P(1)` from one in a stored CPT row.
const ROW_SUM_TOLERANCE: f64 = 1e-9;

fn is_distribution(pair: &[f64; 2]) -> bool {
    pair.iter().all(|p| (0.0..=1.0).contains(p))
        && (pair[0] + pair[1] - 1.0).abs() <= ROW_SUM_TOLERANCE
}
