//! Point-to-point queries on a contracted graph.
//!
//! The search itself is not much more than a bidirectional Dijkstra with a
//! different pruning setup: because every record connects to a higher ranked
//! node, both sides only ever climb the hierarchy, and stall-on-demand cuts
//! off nodes that were reached on a detour. What makes the queries useful is
//! the path assembly afterwards, which turns parent pointers and shortcut
//! edges back into the actual road sequence (see [`unpacking`]).

use crate::datastr::{graph::*, query_heap::QueryHeap};

pub mod query;
pub mod unpacking;

/// Pre-allocated per-thread search state.
///
/// Holds the heap pair of the primary bidirectional search plus an auxiliary
/// pair for queries which run a second search while the state of the first
/// one is still needed, like multi-leg queries. Heaps are cleared, never
/// reallocated, between queries. Each query thread owns one instance, the
/// pool is never shared.
pub struct SearchEngineData {
    pub forward: QueryHeap,
    pub reverse: QueryHeap,
    pub aux_forward: QueryHeap,
    pub aux_reverse: QueryHeap,
}

impl SearchEngineData {
    pub fn new(n: usize) -> SearchEngineData {
        SearchEngineData {
            forward: QueryHeap::new(n),
            reverse: QueryHeap::new(n),
            aux_forward: QueryHeap::new(n),
            aux_reverse: QueryHeap::new(n),
        }
    }
}

/// The side of the bidirectional search being advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// Whether this search side may relax an edge record.
    #[inline]
    pub fn can_traverse(self, data: &EdgeData) -> bool {
        match self {
            Direction::Forward => data.forward,
            Direction::Reverse => data.backward,
        }
    }

    /// Whether an edge record is traversable against this search side,
    /// which is what the stalling scan looks for.
    #[inline]
    pub fn can_traverse_against(self, data: &EdgeData) -> bool {
        match self {
            Direction::Forward => data.backward,
            Direction::Reverse => data.forward,
        }
    }
}
