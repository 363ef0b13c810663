use crate::common::errors::{ProbNetError, Result};
use crate::model::network::BayesianNetwork;
use log::info;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Renders every learned CPT as text, one block per node in declaration
/// order.
///
/// ```text
/// spam:
/// 0, 0.6
/// 1, 0.4
/// lab:
/// spam george
/// 0, 0, 0.2
/// 0, 1, 0.5
/// ```
///
/// Root nodes list `P(0)` and `P(1)`. Other nodes list their parents, then one
/// line per CPT row: the row index as a zero-padded bit pattern (a `1` means
/// that parent was observed as `0`) followed by `P(1)`.
///
/// Fails with [`ProbNetError::CptNotLearned`] on the first node whose CPT is
/// missing or does not have `2^k` rows.
pub fn render_cpt_dump(network: &BayesianNetwork) -> Result<String> {
    let mut out = String::new();
    for node in network.nodes() {
        if node.cpt.rows() != node.expected_rows() {
            return Err(ProbNetError::CptNotLearned {
                node: node.name.clone(),
            });
        }
        let _ = writeln!(out, "{}:", node.name);
        if node.parents.is_empty() {
            let [p0, p1] = node.cpt.pairs()[0];
            let _ = writeln!(out, "0, {}\n1, {}", p0, p1);
            continue;
        }

        let parent_names: Vec<&str> = node
            .parents
            .iter()
            .map(|&id| network.node(id).name.as_str())
            .collect();
        let _ = writeln!(out, "{}", parent_names.join(" "));

        let width = node.parents.len();
        for (row, pair) in node.cpt.pairs().iter().enumerate() {
            let bits: Vec<String> = format!("{:0width$b}", row, width = width)
                .chars()
                .map(String::from)
                .collect();
            let _ = writeln!(out, "{}, {}", bits.join(", "), pair[1]);
        }
    }
    Ok(out)
}

/// Writes the dump produced by [`render_cpt_dump`] to `path`. Nothing is
/// written unless every node has been learned.
pub fn write_cpt_dump(network: &BayesianNetwork, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let dump = render_cpt_dump(network)?;
    fs::write(path, dump).map_err(|e| ProbNetError::file_access(path, e))?;
    info!("Wrote CPTs for {} nodes to {}", network.len(), path.display());
    Ok(())
}
