use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing, linking, learning or querying a network.
#[derive(Debug, Error)]
pub enum ProbNetError {
    /// A structure, data or output file could not be read or written.
    #[error("failed to access '{}': {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the table (ragged rows, bad quoting, ...).
    #[error("malformed table '{}': {source}", .path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("table '{}' has no header row", .path.display())]
    EmptyTable { path: PathBuf },

    #[error("malformed structure at line {line}: '{content}'")]
    MalformedStructure { line: usize, content: String },

    /// A parent name that matches no declared node.
    #[error("node '{node}' references unknown parent '{parent}'")]
    UnresolvedParent { node: String, parent: String },

    #[error("node '{node}' has {count} parents, more than the supported {max}", max = crate::model::MAX_PARENTS)]
    TooManyParents { node: String, count: usize },

    /// Only raised where an ordering is required, such as forward sampling.
    #[error("cycle detected among nodes: {nodes:?}")]
    CycleDetected { nodes: Vec<String> },

    #[error("no node named '{name}' in the network")]
    UnknownNode { name: String },

    /// Every node needs a backing column to learn from.
    #[error("column '{column}' not found in table header")]
    ColumnNotFound { column: String },

    #[error("node '{node}' has no assigned value")]
    UnassignedValue { node: String },

    #[error("node '{node}' has no learned CPT")]
    CptNotLearned { node: String },

    #[error("snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("snapshot version {found} is newer than supported version {supported}")]
    SnapshotVersion { found: u32, supported: u32 },

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl ProbNetError {
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProbNetError::FileAccess {
            path: path.into(),
            source,
        }
    }
}

/// Result type used across the library.
pub type Result<T> = std::result::Result<T, ProbNetError>;
