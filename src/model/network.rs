use crate::common::errors::{ProbNetError, Result};
use crate::model::node::{Cpt, Node};
use crate::model::structure::{parse_structure, parse_structure_str};
use crate::model::{MAX_PARENTS, NodeId};
use log::{debug, trace, warn};
use std::collections::HashMap;
use std::path::Path;

/// Registry of the nodes of a binary Bayesian network.
///
/// Nodes keep their declaration order, which is also the order of every
/// output. Parent references are resolved by [`BayesianNetwork::link`], which
/// runs on construction and after any structural change.
#[derive(Debug, Clone, Default)]
pub struct BayesianNetwork {
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
}

impl BayesianNetwork {
    /// Builds and links a network from skeleton nodes.
    pub fn from_skeleton(skeleton: Vec<Node>) -> Result<Self> {
        let mut network = BayesianNetwork::default();
        for node in skeleton {
            match network.index.get(&node.name) {
                Some(&id) => {
                    warn!("Duplicate node '{}'; keeping the later parent list", node.name);
                    network.nodes[id.index()].parent_names = node.parent_names;
                }
                None => {
                    network.index.insert(node.name.clone(), NodeId(network.nodes.len()));
                    network.nodes.push(node);
                }
            }
        }
        network.link()?;
        Ok(network)
    }

    pub fn from_structure_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_skeleton(parse_structure(path)?)
    }

    pub fn from_structure_str(text: &str) -> Result<Self> {
        Self::from_skeleton(parse_structure_str(text)?)
    }

    /// Resolves every raw parent name into a node id and recomputes all
    /// children lists from scratch. Safe to call any number of times.
    ///
    /// Fails on the first parent name that has no node; the network is left
    /// unchanged in that case.
    pub fn link(&mut self) -> Result<()> {
        let mut resolved = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if node.parent_names.len() > MAX_PARENTS {
                return Err(ProbNetError::TooManyParents {
                    node: node.name.clone(),
                    count: node.parent_names.len(),
                });
            }
            let parents = node
                .parent_names
                .iter()
                .map(|parent| {
                    self.index
                        .get(parent)
                        .copied()
                        .ok_or_else(|| ProbNetError::UnresolvedParent {
                            node: node.name.clone(),
                            parent: parent.clone(),
                        })
                })
                .collect::<Result<Vec<_>>>()?;
            resolved.push(parents);
        }

        for (node, parents) in self.nodes.iter_mut().zip(resolved) {
            node.parents = parents;
            node.children.clear();
        }

        for child in 0..self.nodes.len() {
            for parent in self.nodes[child].parents.clone() {
                let children = &mut self.nodes[parent.index()].children;
                if !children.contains(&NodeId(child)) {
                    children.push(NodeId(child));
                }
            }
        }

        trace!("Linked {} nodes", self.nodes.len());
        Ok(())
    }

    /// Replaces the declared parents of `name` and re-links the network.
    ///
    /// The node's CPT is cleared because its row layout depends on the parent
    /// list. If linking fails the previous parents and CPT are restored.
    pub fn set_parents(&mut self, name: &str, parents: Vec<String>) -> Result<()> {
        let id = self.require(name)?;
        let node = &mut self.nodes[id.index()];
        let previous_parents = std::mem::replace(&mut node.parent_names, parents);
        let previous_cpt = std::mem::take(&mut node.cpt);

        if let Err(e) = self.link() {
            let node = &mut self.nodes[id.index()];
            node.parent_names = previous_parents;
            node.cpt = previous_cpt;
            return Err(e);
        }
        debug!("Parents of '{}' are now {:?}", name, self.nodes[id.index()].parent_names);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.id_of(name).map(|id| self.node(id))
    }

    /// Like [`Self::id_of`] but reports an unknown name as an error.
    pub fn require(&self, name: &str) -> Result<NodeId> {
        self.id_of(name).ok_or_else(|| ProbNetError::UnknownNode {
            name: name.to_string(),
        })
    }

    /// Installs a CPT for `name`, used when restoring a learned network.
    pub fn set_cpt(&mut self, name: &str, cpt: Cpt) -> Result<()> {
        let id = self.require(name)?;
        self.nodes[id.index()].cpt = cpt;
        Ok(())
    }

    /// True once every node carries a CPT of the right shape.
    pub fn is_learned(&self) -> bool {
        self.nodes
            .iter()
            .all(|node| node.cpt.rows() == node.expected_rows())
    }

    /// Parent to child edges by name, in declaration order of the children.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.nodes
            .iter()
            .flat_map(|child| {
                child
                    .parents
                    .iter()
                    .map(move |&parent| (self.node(parent).name.as_str(), child.name.as_str()))
            })
            .collect()
    }
}
