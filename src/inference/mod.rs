pub mod assignment;
pub mod markov_blanket;
pub mod predict;

pub use assignment::Assignment;
pub use markov_blanket::{conditional_probability, cpt_row_index, markov_blanket, probability_of_one};
pub use predict::{PredictOptions, PredictionSummary, predict_missing, predict_missing_parallel};
