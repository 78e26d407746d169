//! The bidirectional search over the contracted graph.

use super::unpacking::*;
use super::*;
use crate::algo::*;
use crate::report::push_context;
use crate::util::in_range_option::InRangeOption;

/// Advance one side of a bidirectional query by settling a single node.
///
/// Performs, in order: extract-min on `heap`; the meet-in-the-middle check
/// against `opposite_heap`, keeping the first meeting node that strictly
/// improves the upper bound; the termination check, draining `heap` once its
/// frontier has passed the upper bound; the stalling scan; and finally the
/// relaxation of the records traversable in `direction`.
///
/// A node is stalled if a strictly shorter path to it runs through an
/// already discovered neighbor on a record only traversable against the
/// search direction. Such a node was reached on a detour, so nothing behind
/// it can be part of a shortest path and its edges are not relaxed. The
/// shorter path itself stays in play at the neighbor and will be expanded
/// with correct keys from there.
///
/// `edge_expansion_offset` loosens the termination check by the partial edge
/// cost at this side's endpoint, so a search starting in the interior of a
/// segment keeps expanding long enough.
///
/// Returns the number of arcs relaxed, zero when the node was stalled or the
/// side terminated.
pub fn routing_step<Graph: ContractedGraph>(
    graph: &Graph,
    heap: &mut QueryHeap,
    opposite_heap: &QueryHeap,
    meeting_node: &mut InRangeOption<NodeId>,
    upper_bound: &mut Weight,
    edge_expansion_offset: Weight,
    direction: Direction,
) -> usize {
    let node = match heap.delete_min() {
        Some(node) => node,
        None => return 0,
    };
    let distance = heap.get_key(node);

    if opposite_heap.was_inserted(node) {
        let candidate = opposite_heap.get_key(node) + distance;
        if candidate < *upper_bound {
            *meeting_node = InRangeOption::some(node);
            *upper_bound = candidate;
        }
    }

    // everything still queued on this side is at least as far out, so once
    // the frontier passed the upper bound the side is done
    if distance.saturating_sub(edge_expansion_offset) > *upper_bound {
        heap.delete_all();
        return 0;
    }

    // stalling
    for edge in graph.neighbor_edge_indices(node) {
        let data = graph.edge_data(edge);
        if direction.can_traverse_against(data) {
            let neighbor = graph.target(edge);
            debug_assert!(data.weight > 0, "edge weight invalid");
            if heap.was_inserted(neighbor) && heap.get_key(neighbor) + data.weight < distance {
                return 0;
            }
        }
    }

    let mut num_relaxed_arcs = 0;
    for edge in graph.neighbor_edge_indices(node) {
        let data = graph.edge_data(edge);
        if direction.can_traverse(data) {
            let neighbor = graph.target(edge);
            debug_assert!(data.weight > 0, "edge weight invalid");
            let neighbor_distance = distance + data.weight;
            num_relaxed_arcs += 1;

            if !heap.was_inserted(neighbor) {
                heap.insert(neighbor, neighbor_distance, node);
            } else if neighbor_distance < heap.get_key(neighbor) {
                heap.decrease_key(neighbor, neighbor_distance, node);
            }
        }
    }
    num_relaxed_arcs
}

/// A query server owning a contracted graph view and the reusable search
/// state of one thread.
pub struct Server<Graph> {
    graph: Graph,
    data: SearchEngineData,
}

impl<Graph: ContractedGraph> Server<Graph> {
    pub fn new(graph: Graph) -> Server<Graph> {
        let n = graph.num_nodes();
        Server {
            graph,
            data: SearchEngineData::new(n),
        }
    }

    /// Shortest total cost between the query endpoints, or `Ok(None)` if the
    /// target is unreachable. Endpoint offsets are included in the total.
    pub fn distance(&mut self, query: impl Into<OffsetQuery>) -> Result<Option<Weight>, RoutingError> {
        let query = query.into();
        self.check_node(query.from)?;
        self.check_node(query.to)?;

        Ok(Self::bidir_search(&self.graph, &mut self.data.forward, &mut self.data.reverse, query)
            .map(|(weight, _)| weight + query.source_offset + query.target_offset))
    }

    /// Node sequence of the shortest path with all shortcuts expanded,
    /// without per-edge metadata.
    pub fn node_path(&mut self, query: impl Into<OffsetQuery>) -> Result<Option<Vec<NodeId>>, RoutingError> {
        let query = query.into();
        self.check_node(query.from)?;
        self.check_node(query.to)?;

        let (_, meeting_node) = match Self::bidir_search(&self.graph, &mut self.data.forward, &mut self.data.reverse, query) {
            Some(result) => result,
            None => return Ok(None),
        };

        let packed = retrieve_packed_path(&self.data.forward, &self.data.reverse, meeting_node);
        let mut path = vec![packed[0]];
        for pair in packed.windows(2) {
            let segment = unpack_edge(&self.graph, pair[0], pair[1])?;
            path.extend(&segment[1..]);
        }

        Ok(Some(path))
    }

    fn check_node(&self, node: NodeId) -> Result<(), RoutingError> {
        if (node as usize) < self.graph.num_nodes() {
            Ok(())
        } else {
            Err(RoutingError::NodeOutOfRange {
                node,
                num_nodes: self.graph.num_nodes(),
            })
        }
    }

    // Run one bidirectional search to completion on the given heap pair.
    // Returns the packed path weight (offsets not included) and the meeting
    // node. The sides advance strictly alternatingly until both heaps are
    // drained, either naturally or by the termination check. Queue and
    // relaxation counters are reported once the search is over, never from
    // inside the loop.
    fn bidir_search(graph: &Graph, forward: &mut QueryHeap, reverse: &mut QueryHeap, query: OffsetQuery) -> Option<(Weight, NodeId)> {
        report!("algo", "CH Query");
        forward.delete_all();
        reverse.delete_all();
        let num_queue_pushs_before = forward.num_queue_pushs() + reverse.num_queue_pushs();
        forward.insert(query.from, 0, query.from);
        reverse.insert(query.to, 0, query.to);

        let mut meeting_node = InRangeOption::NONE;
        let mut upper_bound = INFINITY;
        let mut num_queue_pops = 0;
        let mut num_relaxed_arcs = 0;

        while !forward.is_empty() || !reverse.is_empty() {
            if !forward.is_empty() {
                num_queue_pops += 1;
                num_relaxed_arcs += routing_step(
                    graph,
                    forward,
                    reverse,
                    &mut meeting_node,
                    &mut upper_bound,
                    query.source_offset,
                    Direction::Forward,
                );
            }
            if !reverse.is_empty() {
                num_queue_pops += 1;
                num_relaxed_arcs += routing_step(
                    graph,
                    reverse,
                    forward,
                    &mut meeting_node,
                    &mut upper_bound,
                    query.target_offset,
                    Direction::Reverse,
                );
            }
        }

        report!("num_queue_pops", num_queue_pops);
        report!("num_queue_pushs", forward.num_queue_pushs() + reverse.num_queue_pushs() - num_queue_pushs_before);
        report!("num_relaxed_arcs", num_relaxed_arcs);

        meeting_node.value().map(|node| (upper_bound, node))
    }
}

impl<Graph: ContractedGraph + EdgeAnnotated> Server<Graph> {
    /// Full shortest path query: total cost plus the unpacked road segments
    /// in traversal order.
    pub fn route(&mut self, query: impl Into<OffsetQuery>) -> Result<Option<Route>, RoutingError> {
        let query = query.into();
        self.check_node(query.from)?;
        self.check_node(query.to)?;

        let (weight, meeting_node) = match Self::bidir_search(&self.graph, &mut self.data.forward, &mut self.data.reverse, query) {
            Some(result) => result,
            None => return Ok(None),
        };

        let packed = retrieve_packed_path(&self.data.forward, &self.data.reverse, meeting_node);
        let path = unpack_path(&self.graph, &packed)?;

        Ok(Some(Route {
            total_weight: weight + query.source_offset + query.target_offset,
            path,
        }))
    }

    /// Query through an intermediate stop.
    ///
    /// The second leg runs on the auxiliary heap pair, so the search state of
    /// both legs is alive when the paths are put together.
    pub fn route_via(&mut self, from: NodeId, via: NodeId, to: NodeId) -> Result<Option<Route>, RoutingError> {
        self.check_node(from)?;
        self.check_node(via)?;
        self.check_node(to)?;

        let first_leg = {
            let _leg_context = push_context("first_leg");
            Self::bidir_search(
                &self.graph,
                &mut self.data.forward,
                &mut self.data.reverse,
                Query { from, to: via }.into(),
            )
        };
        let (first_weight, first_meeting) = match first_leg {
            Some(result) => result,
            None => return Ok(None),
        };

        let second_leg = {
            let _leg_context = push_context("second_leg");
            Self::bidir_search(
                &self.graph,
                &mut self.data.aux_forward,
                &mut self.data.aux_reverse,
                Query { from: via, to }.into(),
            )
        };
        let (second_weight, second_meeting) = match second_leg {
            Some(result) => result,
            None => return Ok(None),
        };

        let packed = retrieve_packed_path(&self.data.forward, &self.data.reverse, first_meeting);
        let mut path = unpack_path(&self.graph, &packed)?;
        let packed = retrieve_packed_path(&self.data.aux_forward, &self.data.aux_reverse, second_meeting);
        path.extend(unpack_path(&self.graph, &packed)?);

        Ok(Some(Route {
            total_weight: first_weight + second_weight,
            path,
        }))
    }
}
