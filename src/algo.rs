//! Query types shared by the routing algorithms.

use crate::datastr::graph::*;

pub mod contraction_hierarchy;

/// Simply a source-target pair.
#[derive(Debug, Clone, Copy)]
pub struct Query {
    pub from: NodeId,
    pub to: NodeId,
}

/// A source-target pair with partial edge costs at both endpoints.
///
/// When a query starts or ends in the interior of a road segment, the caller
/// resolves the endpoint to a node and passes the cost of the partial
/// segment as an offset. Offsets widen the termination check of the search
/// and are added onto the reported total weight.
#[derive(Debug, Clone, Copy)]
pub struct OffsetQuery {
    pub from: NodeId,
    pub to: NodeId,
    pub source_offset: Weight,
    pub target_offset: Weight,
}

impl From<Query> for OffsetQuery {
    fn from(query: Query) -> Self {
        OffsetQuery {
            from: query.from,
            to: query.to,
            source_offset: 0,
            target_offset: 0,
        }
    }
}

/// One original road segment of an unpacked path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathData {
    /// Id of the original edge.
    pub edge: EdgeId,
    /// Index into the street name table.
    pub name_index: u32,
    pub turn_instruction: TurnInstruction,
    pub weight: Weight,
}

/// A complete query result: total cost plus the unpacked road segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub total_weight: Weight,
    pub path: Vec<PathData>,
}

/// Failures indicating caller misuse or corrupt preprocessed data.
///
/// An unconnected source-target pair is not an error but a regular `None`
/// result. The engine performs no retries and no logging, handling policy
/// stays with the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    #[error("node id {node} out of bounds for graph with {num_nodes} nodes")]
    NodeOutOfRange { node: NodeId, num_nodes: usize },
    #[error("contracted graph is inconsistent: {0}")]
    InvariantViolation(&'static str),
}
