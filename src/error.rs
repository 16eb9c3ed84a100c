use thiserror::Error;

/// Structural errors raised while building a [`Network`](crate::network::Network).
/// A failing operation leaves the network untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("vertex `{0}` already exists")]
    DuplicateVertex(String),
    #[error("arc `{0}` already exists")]
    DuplicateArc(String),
    #[error("endpoint `{0}` is not a vertex of the network")]
    UnknownEndpoint(String),
    #[error("arc `{name}` would connect `{vertex}` to itself")]
    SelfLoop { name: String, vertex: String },
    #[error("arc `{0}` does not exist")]
    UnknownArc(String),
    #[error("arc `{name}` has invalid capacity {capacity}")]
    InvalidCapacity { name: String, capacity: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("vertex `{0}` is not part of the network")]
    UnknownVertex(String),
    #[error("source and sink are the same vertex `{0}`")]
    SourceIsSink(String),
    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),
    #[error("no convergence after {discharges} discharges")]
    NotConverged { discharges: usize },
}
