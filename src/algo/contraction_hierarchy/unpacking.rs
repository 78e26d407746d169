//! Turning parent pointers and shortcut edges back into road segments.
//!
//! The search only ever settles endpoints of records, so its parent chains
//! yield a packed path which may run over shortcut edges. Unpacking replaces
//! every shortcut by its two constituents, recursively, until only original
//! edges remain. The recursion runs over an explicit stack of node pairs:
//! shortcut chains on continental graphs get deep enough that the call stack
//! is the wrong place for them.

use super::*;
use crate::algo::{PathData, RoutingError};
use crate::util::in_range_option::InRangeOption;

/// Join the parent chains of both search sides at the meeting node.
///
/// The result starts at the forward search root, runs through the meeting
/// node and ends at the reverse search root. Adjacent nodes are connected by
/// records of the contracted graph, possibly shortcuts.
pub fn retrieve_packed_path(forward: &QueryHeap, reverse: &QueryHeap, meeting_node: NodeId) -> Vec<NodeId> {
    let mut packed_path = retrieve_packed_path_from_single_heap(forward, meeting_node);
    packed_path.reverse();
    packed_path.push(meeting_node);

    let mut current = meeting_node;
    while reverse.parent(current) != current {
        current = reverse.parent(current);
        packed_path.push(current);
    }

    packed_path
}

/// Walk the parent chain of a single heap from the given node to the search
/// root. Ordered from the node towards the root, the node itself excluded.
pub fn retrieve_packed_path_from_single_heap(heap: &QueryHeap, node: NodeId) -> Vec<NodeId> {
    let mut packed_path = Vec::new();
    let mut current = node;
    while heap.parent(current) != current {
        current = heap.parent(current);
        packed_path.push(current);
    }
    packed_path
}

/// Expand a packed node sequence into the ordered list of original road
/// segments with their annotation data.
pub fn unpack_path<Graph: ContractedGraph + EdgeAnnotated>(graph: &Graph, packed_path: &[NodeId]) -> Result<Vec<PathData>, RoutingError> {
    let mut unpacked_path = Vec::with_capacity(packed_path.len().saturating_sub(1));
    // pairs go onto the stack back to front so they pop off in path order
    let mut recursion_stack: Vec<(NodeId, NodeId)> = packed_path.windows(2).map(|pair| (pair[0], pair[1])).rev().collect();

    while let Some((a, b)) = recursion_stack.pop() {
        let edge = select_edge(graph, a, b)?;
        let data = graph.edge_data(edge);

        match data.payload {
            EdgePayload::Shortcut(middle) => {
                // again back to front, the left half has to pop first
                recursion_stack.push((middle, b));
                recursion_stack.push((a, middle));
            }
            EdgePayload::Original(original_edge) => {
                unpacked_path.push(PathData {
                    edge: original_edge,
                    name_index: graph.name_index(original_edge),
                    turn_instruction: graph.turn_instruction(original_edge),
                    weight: data.weight,
                });
            }
        }
    }

    Ok(unpacked_path)
}

/// Expand the record between two adjacent packed path nodes into the
/// sequence of original graph nodes it traverses, both endpoints included.
pub fn unpack_edge<Graph: ContractedGraph>(graph: &Graph, from: NodeId, to: NodeId) -> Result<Vec<NodeId>, RoutingError> {
    let mut unpacked_nodes = Vec::new();
    let mut recursion_stack = vec![(from, to)];

    while let Some((a, b)) = recursion_stack.pop() {
        let edge = select_edge(graph, a, b)?;

        match graph.edge_data(edge).payload {
            EdgePayload::Shortcut(middle) => {
                recursion_stack.push((middle, b));
                recursion_stack.push((a, middle));
            }
            EdgePayload::Original(_) => unpacked_nodes.push(a),
        }
    }

    unpacked_nodes.push(to);
    Ok(unpacked_nodes)
}

// The record realizing a packed pair: the cheapest forward record out of `a`
// into `b`, or failing that, the cheapest record out of `b` traversable
// backwards into `a`. Parallel records between the same endpoints do occur,
// an obsoleted shortcut next to a cheaper newer one for instance, and only
// the cheapest one matches the cost the search computed.
fn select_edge<Graph: ContractedGraph>(graph: &Graph, a: NodeId, b: NodeId) -> Result<EdgeId, RoutingError> {
    let mut selected = InRangeOption::NONE;
    let mut selected_weight = INFINITY;

    for edge in graph.neighbor_edge_indices(a) {
        let data = graph.edge_data(edge);
        if graph.target(edge) == b && data.forward && data.weight < selected_weight {
            selected = InRangeOption::some(edge);
            selected_weight = data.weight;
        }
    }

    if selected.value().is_none() {
        for edge in graph.neighbor_edge_indices(b) {
            let data = graph.edge_data(edge);
            if graph.target(edge) == a && data.backward && data.weight < selected_weight {
                selected = InRangeOption::some(edge);
                selected_weight = data.weight;
            }
        }
    }

    selected
        .value()
        .ok_or(RoutingError::InvariantViolation("no edge between adjacent path nodes"))
}
