use crate::common::errors::{ProbNetError, Result};
use crate::model::node::Node;
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Reads a structure file into unlinked skeleton nodes.
pub fn parse_structure(path: impl AsRef<Path>) -> Result<Vec<Node>> {
    let path = path.as_ref();
    debug!("Parsing network structure from {}", path.display());
    let text = fs::read_to_string(path).map_err(|e| ProbNetError::file_access(path, e))?;
    parse_structure_str(&text)
}

/// Parses structure text of the form `<name>: <parent> <parent> ...`.
///
/// Blank lines and `#` comments are skipped. The name is the first
/// whitespace-separated token with its trailing colons removed, so colons
/// inside a name are kept. A repeated name replaces the earlier parent list
/// but keeps its position.
pub fn parse_structure_str(text: &str) -> Result<Vec<Node>> {
    let mut nodes: Vec<Node> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (line_number, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut tokens = trimmed.split_whitespace();
        let name = tokens.next().unwrap_or("").trim_end_matches(':');
        if name.is_empty() {
            return Err(ProbNetError::MalformedStructure {
                line: line_number + 1,
                content: line.to_string(),
            });
        }
        let parents: Vec<String> = tokens.map(str::to_string).collect();

        match positions.get(name) {
            Some(&position) => {
                warn!(
                    "Node '{}' declared again at line {}; replacing its parents",
                    name,
                    line_number + 1
                );
                nodes[position].parent_names = parents;
            }
            None => {
                positions.insert(name.to_string(), nodes.len());
                nodes.push(Node::new(name, parents));
            }
        }
    }

    debug!("Parsed {} nodes", nodes.len());
    Ok(nodes)
}
