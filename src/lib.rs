//! Maximum flow and minimum cut by push-relabel, with highest-label and FIFO
//! vertex selection and optional global and gap relabeling.

pub mod error;
pub mod frontier;
pub mod graph;
pub mod heuristics;
pub mod instances;
pub mod io;
pub mod network;
pub mod push_relabel;
pub mod residual;
pub mod result;
pub mod utils;

pub use error::{GraphError, SolveError};
pub use network::Network;
pub use push_relabel::{solve, GlobalRelabel, PushRelabel, SolveStats, SolverConfig, Strategy};
pub use result::FlowResult;
