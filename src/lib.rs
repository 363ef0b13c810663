#[macro_use]
pub mod common;
pub mod inference;
pub mod learning;
pub mod model;
pub mod scenarios;

// Used by the print_* macros.
#[doc(hidden)]
pub use colored;

pub use common::{DataTable, ProbNetError, Result};
pub use inference::{Assignment, PredictOptions, markov_blanket, predict_missing};
pub use learning::learn_cpts;
pub use model::{BayesianNetwork, BinaryValue, NodeId};
