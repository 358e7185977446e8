//! `criticut`: critical-node moderation for undirected connected graphs.
//!
//! The pipeline scores every node by information centrality (from the Laplacian
//! pseudo-inverse), selects the statistically critical ones, and prunes edges incident to
//! them in decreasing effective-resistance order whenever the removal keeps the graph
//! connected. Every run ends in an [`AuditReport`] listing what was removed and why.
//!
//! Public invariants (must not drift):
//! - **Node order**: per-node outputs are indexed by dense node index \(0..n-1\), which is the
//!   graph's insertion order ("native order"). The critical node list is ordered, and that
//!   order is the pruning order.
//! - **Connectivity**: [`prune()`] never disconnects a connected graph, checked after every
//!   single removal, and only ever removes edges.
//! - **Determinism**: no operator draws randomness except [`generate`], which is seeded.
//! - **Explicit degradation**: numerical failures never abort the pipeline; they produce an
//!   [`Outcome::Degraded`] carrying the documented fallback and its cause.
//!
//! Swappable (allowed to change without breaking the contract):
//! - the dense inversion routine behind [`laplacian_pinv`]
//! - the connectivity check strategy (so long as it is exact)

pub mod audit;
pub mod centrality;
pub mod connectivity;
pub mod critical;
pub mod generate;
pub mod graph;
pub mod ingest;
pub mod laplacian;
pub mod outcome;
pub mod pipeline;
pub mod prune;
pub mod resistance;

pub use audit::{write_report, AuditReport, ReportEdge, ReportNode};
pub use centrality::{
    information_centrality, information_centrality_checked, information_centrality_with_pinv,
    CentralityConfig,
};
pub use connectivity::{
    component_count, connected_components, is_connected, is_connected_without_edge,
    largest_component,
};
pub use critical::{
    select_critical, select_critical_checked, select_critical_run, CriticalSelection, Selection,
    SelectorConfig,
};
pub use generate::{connected_erdos_renyi, erdos_renyi, GenerateConfig};
pub use graph::{GraphRef, NodeLabel, UndirectedGraph};
pub use ingest::{load_connected, parse_edge_list, LoadedGraph};
pub use laplacian::{laplacian_matrix, laplacian_pinv, LaplacianPinv};
pub use outcome::Outcome;
pub use pipeline::{Pipeline, PipelineConfig, PipelineRun};
pub use prune::{
    prune, prune_checked, NodePass, NodeRemovals, PinvPolicy, PruneConfig, PruneRun, Pruner,
    RemovedEdge,
};
pub use resistance::{effective_resistance, effective_resistance_checked};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("index out of bounds: {0}")]
    IndexOutOfBounds(usize),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("singular matrix: pivot {pivot:e} at column {column}")]
    SingularMatrix { column: usize, pivot: f64 },
    #[error("non-finite value: {0}")]
    NonFinite(String),
    #[error("graph is disconnected ({components} components)")]
    Disconnected { components: usize },
    #[error("self-loop on node {0}")]
    SelfLoop(NodeLabel),
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
