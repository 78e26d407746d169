//! Adjacency array representation of a contracted graph.
//!
//! Nodes and edge records are identified by dense ids going from `0` to `n-1`
//! and `m-1` respectively. The topology is stored in two collections:
//! `first_out` with `n+1` entries and `head` with `m` entries. The first
//! entry of `first_out` is always 0 and the last one `m`, and
//! `head[first_out[x]..first_out[x+1]]` holds the targets of the records
//! stored at node `x`. Flags, weights and payloads live in a parallel
//! `edge_data` collection, and the name indices and turn instructions of the
//! original (pre-contraction) edges in two collections of their own, indexed
//! by original edge id.

use super::*;

/// Container struct for the collections of a contracted graph.
///
/// Generic over the types of the data collections, anything that can be
/// dereferenced to a slice works. Both owned (`Vec<T>`, `Box<[T]>`) and
/// shared (`Arc<[T]>`) or borrowed (slices, for example into a memory map)
/// data is possible.
#[derive(Debug, Clone)]
pub struct FirstOutGraph<FirstOutContainer, HeadContainer, EdgeDataContainer, NameContainer, TurnContainer> {
    // index of the first outgoing edge record of each node, +1 entry in the end
    first_out: FirstOutContainer,
    // the node each record points at
    head: HeadContainer,
    // flags, weight and payload of each record
    edge_data: EdgeDataContainer,
    // name table index of each original edge
    name_index: NameContainer,
    // turn instruction of each original edge
    turn_instruction: TurnContainer,
}

pub type OwnedGraph = FirstOutGraph<Vec<EdgeId>, Vec<NodeId>, Vec<EdgeData>, Vec<u32>, Vec<TurnInstruction>>;
pub type BorrowedGraph<'a> = FirstOutGraph<&'a [EdgeId], &'a [NodeId], &'a [EdgeData], &'a [u32], &'a [TurnInstruction]>;

impl<FirstOutContainer, HeadContainer, EdgeDataContainer, NameContainer, TurnContainer>
    FirstOutGraph<FirstOutContainer, HeadContainer, EdgeDataContainer, NameContainer, TurnContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    EdgeDataContainer: AsRef<[EdgeData]>,
    NameContainer: AsRef<[u32]>,
    TurnContainer: AsRef<[TurnInstruction]>,
{
    /// Borrow a slice of the first_out data
    pub fn first_out(&self) -> &[EdgeId] {
        self.first_out.as_ref()
    }
    /// Borrow a slice of the head data
    pub fn head(&self) -> &[NodeId] {
        self.head.as_ref()
    }

    /// Create a new `FirstOutGraph` from the five containers.
    ///
    /// Panics if the adjacency array is malformed, a weight is not strictly
    /// positive, an original edge payload points outside the annotation
    /// collections, or a shortcut payload outside the node id space. Corrupt
    /// preprocessed data fails here, before any query runs on it.
    pub fn new(
        first_out: FirstOutContainer,
        head: HeadContainer,
        edge_data: EdgeDataContainer,
        name_index: NameContainer,
        turn_instruction: TurnContainer,
    ) -> Self {
        assert!(first_out.as_ref().len() < NodeId::MAX as usize);
        assert!(head.as_ref().len() < EdgeId::MAX as usize);
        assert_eq!(*first_out.as_ref().first().unwrap(), 0);
        assert_eq!(*first_out.as_ref().last().unwrap() as usize, head.as_ref().len());
        assert_eq!(edge_data.as_ref().len(), head.as_ref().len());
        assert_eq!(name_index.as_ref().len(), turn_instruction.as_ref().len());

        let num_nodes = first_out.as_ref().len() - 1;
        for data in edge_data.as_ref() {
            assert!(data.weight > 0, "edge weights have to be strictly positive");
            match data.payload {
                EdgePayload::Original(original_edge) => {
                    assert!((original_edge as usize) < name_index.as_ref().len(), "original edge id out of bounds");
                }
                EdgePayload::Shortcut(middle) => {
                    assert!((middle as usize) < num_nodes, "shortcut middle node out of bounds");
                }
            }
        }

        let graph = Self {
            first_out,
            head,
            edge_data,
            name_index,
            turn_instruction,
        };
        report!("graph", { "num_nodes": graph.num_nodes(), "num_arcs": graph.num_arcs() });
        graph
    }

    /// A view of this graph borrowing the underlying data.
    pub fn borrowed(&self) -> BorrowedGraph {
        FirstOutGraph {
            first_out: self.first_out(),
            head: self.head(),
            edge_data: self.edge_data.as_ref(),
            name_index: self.name_index.as_ref(),
            turn_instruction: self.turn_instruction.as_ref(),
        }
    }
}

impl OwnedGraph {
    /// Build a graph from an unsorted `(source, target, data)` record list
    /// plus the annotation tables referenced by the original edge payloads.
    pub fn from_edges(
        num_nodes: usize,
        mut edges: Vec<(NodeId, NodeId, EdgeData)>,
        name_index: Vec<u32>,
        turn_instruction: Vec<TurnInstruction>,
    ) -> OwnedGraph {
        // stable, so parallel records of one node keep their relative order
        edges.sort_by_key(|&(source, ..)| source);

        let mut first_out = vec![0 as EdgeId; num_nodes + 1];
        for &(source, ..) in &edges {
            first_out[source as usize + 1] += 1;
        }
        let mut prefix_sum = 0;
        for entry in &mut first_out {
            prefix_sum += *entry;
            *entry = prefix_sum;
        }

        let (head, edge_data) = edges.into_iter().map(|(_, target, data)| (target, data)).unzip();

        OwnedGraph::new(first_out, head, edge_data, name_index, turn_instruction)
    }
}

impl<FirstOutContainer, HeadContainer, EdgeDataContainer, NameContainer, TurnContainer> Graph
    for FirstOutGraph<FirstOutContainer, HeadContainer, EdgeDataContainer, NameContainer, TurnContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    EdgeDataContainer: AsRef<[EdgeData]>,
    NameContainer: AsRef<[u32]>,
    TurnContainer: AsRef<[TurnInstruction]>,
{
    fn num_nodes(&self) -> usize {
        self.first_out().len() - 1
    }

    fn num_arcs(&self) -> usize {
        self.head().len()
    }

    fn degree(&self, node: NodeId) -> usize {
        let node = node as usize;
        (self.first_out()[node + 1] - self.first_out()[node]) as usize
    }
}

impl<FirstOutContainer, HeadContainer, EdgeDataContainer, NameContainer, TurnContainer> ContractedGraph
    for FirstOutGraph<FirstOutContainer, HeadContainer, EdgeDataContainer, NameContainer, TurnContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    EdgeDataContainer: AsRef<[EdgeData]>,
    NameContainer: AsRef<[u32]>,
    TurnContainer: AsRef<[TurnInstruction]>,
{
    #[inline]
    fn neighbor_edge_indices(&self, node: NodeId) -> std::ops::Range<EdgeId> {
        (self.first_out()[node as usize])..(self.first_out()[node as usize + 1])
    }

    #[inline]
    fn target(&self, edge: EdgeId) -> NodeId {
        self.head()[edge as usize]
    }

    #[inline]
    fn edge_data(&self, edge: EdgeId) -> &EdgeData {
        &self.edge_data.as_ref()[edge as usize]
    }
}

impl<FirstOutContainer, HeadContainer, EdgeDataContainer, NameContainer, TurnContainer> EdgeAnnotated
    for FirstOutGraph<FirstOutContainer, HeadContainer, EdgeDataContainer, NameContainer, TurnContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    EdgeDataContainer: AsRef<[EdgeData]>,
    NameContainer: AsRef<[u32]>,
    TurnContainer: AsRef<[TurnInstruction]>,
{
    #[inline]
    fn name_index(&self, original_edge: EdgeId) -> u32 {
        self.name_index.as_ref()[original_edge as usize]
    }

    #[inline]
    fn turn_instruction(&self, original_edge: EdgeId) -> TurnInstruction {
        self.turn_instruction.as_ref()[original_edge as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn original(weight: Weight, forward: bool, backward: bool, original_edge: EdgeId) -> EdgeData {
        EdgeData {
            weight,
            forward,
            backward,
            payload: EdgePayload::Original(original_edge),
        }
    }

    #[test]
    fn slot_ranges() {
        let graph = OwnedGraph::new(
            vec![0, 2, 3, 3],
            vec![1, 2, 2],
            vec![original(1, true, false, 0), original(2, true, true, 1), original(3, false, true, 2)],
            vec![10, 20, 30],
            vec![0, 0, 0],
        );

        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.num_arcs(), 3);
        assert_eq!(graph.neighbor_edge_indices(0), 0..2);
        assert_eq!(graph.neighbor_edge_indices(1), 2..3);
        assert_eq!(graph.neighbor_edge_indices(2), 3..3);
        assert_eq!(graph.degree(0), 2);
        assert_eq!(graph.target(2), 2);
        assert_eq!(graph.edge_data(1).weight, 2);
        assert_eq!(graph.name_index(1), 20);
    }

    #[test]
    fn from_edges_sorts_by_source() {
        let graph = OwnedGraph::from_edges(
            3,
            vec![
                (1, 2, original(4, true, false, 1)),
                (0, 1, original(3, true, false, 0)),
            ],
            vec![0, 0],
            vec![0, 0],
        );

        assert_eq!(graph.first_out(), &[0, 1, 2, 2]);
        assert_eq!(graph.head(), &[1, 2]);
        assert_eq!(graph.edge_data(0).weight, 3);
    }

    #[test]
    #[should_panic(expected = "strictly positive")]
    fn rejects_zero_weights() {
        OwnedGraph::new(vec![0, 1, 1], vec![1], vec![original(0, true, false, 0)], vec![0], vec![0]);
    }

    #[test]
    #[should_panic(expected = "middle node out of bounds")]
    fn rejects_dangling_middle_nodes() {
        OwnedGraph::new(
            vec![0, 1, 1],
            vec![1],
            vec![EdgeData {
                weight: 1,
                forward: true,
                backward: false,
                payload: EdgePayload::Shortcut(7),
            }],
            vec![],
            vec![],
        );
    }
}
