pub mod diagram;
pub mod network;
pub mod node;
pub mod serialize;
pub mod snapshot;
pub mod structure;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use network::BayesianNetwork;
pub use node::{Cpt, Node};

/// Upper bound on parents per node; a CPT has `2^k` rows.
pub const MAX_PARENTS: usize = 24;

/// Stable index of a node inside its [`BayesianNetwork`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The observed state of a binary variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryValue {
    Zero,
    One,
}

impl BinaryValue {
    pub const ZERO_TOKEN: &'static str = "0";
    pub const ONE_TOKEN: &'static str = "1";

    /// Parses a table cell. Only the exact tokens `"0"` and `"1"` are
    /// observations; anything else means the cell is unobserved.
    pub fn from_token(token: &str) -> Option<BinaryValue> {
        match token {
            Self::ZERO_TOKEN => Some(BinaryValue::Zero),
            Self::ONE_TOKEN => Some(BinaryValue::One),
            _ => None,
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            BinaryValue::Zero => Self::ZERO_TOKEN,
            BinaryValue::One => Self::ONE_TOKEN,
        }
    }

    /// Column of this value inside a CPT row.
    pub fn index(self) -> usize {
        match self {
            BinaryValue::Zero => 0,
            BinaryValue::One => 1,
        }
    }
}

impl From<bool> for BinaryValue {
    fn from(value: bool) -> Self {
        if value {
            BinaryValue::One
        } else {
            BinaryValue::Zero
        }
    }
}

impl fmt::Display for BinaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_token())
    }
}

/// Row of a CPT selected by the parents' states, listed in parent order.
///
/// A parent observed as `0` sets bit `2^(k - i - 1)` for its position `i`;
/// the first parent is the most significant bit. Parents observed as `1` or
/// not observed at all contribute nothing. The learner, the inference engine
/// and the CPT dump all share this encoding.
pub fn encode_parent_row<I>(parent_states: I) -> usize
where
    I: IntoIterator<Item = Option<BinaryValue>>,
    I::IntoIter: ExactSizeIterator,
{
    let states = parent_states.into_iter();
    let k = states.len();
    states
        .enumerate()
        .filter(|(_, state)| *state == Some(BinaryValue::Zero))
        .fold(0, |index, (position, _)| index + (1 << (k - position - 1)))
}
