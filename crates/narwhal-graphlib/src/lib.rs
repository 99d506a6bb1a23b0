#![forbid(unsafe_code)]

//! Graph container used by `narwhal`.
//!
//! Nodes and edges live in arenas and are addressed by [`NodeId`] / [`EdgeId`]. Edges can be
//! re-pointed at another node without changing their id, which is what spacer insertion and
//! node splitting rely on.

pub mod alg;
mod graph;

pub use graph::{EdgeId, Graph, NodeId};

/// Returned by algorithms that require a directed acyclic graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("graph contains a cycle ({unresolved} nodes could not be ordered)")]
pub struct CycleError {
    pub unresolved: usize,
}
