pub mod errors;
#[macro_use]
pub mod logging;
pub mod setup;
pub mod table;
pub mod train;

// Re-export key types
pub use errors::{ProbNetError, Result};
pub use table::{DataTable, MISSING_MARKER};
