//! Flow networks with paired residual edges.
//!
//! The network stores every edge twice: a forward edge carrying the given
//! capacity and rank, immediately followed by its reverse with capacity 0.
//! The two live at indices `i` and `i ^ 1`, so either member of a pair finds
//! the other with [`EdgeId::paired`]. Pushing flow increments the forward
//! edge and decrements the reverse, which lets later augmenting paths cancel
//! flow by traversing the reverse direction.

use std::collections::VecDeque;
use std::fmt;

use fixedbitset::FixedBitSet;

/// Flow and capacity unit. Signed: reverse edges carry negative flow once
/// their pair has been pushed.
pub type Flow = i64;

/// Preference rank carried by an edge. `0` marks edges that do not come from
/// the original bipartite graph (tree and reverse edges).
pub type Rank = usize;

/// Node identifier: a dense index into the network's node arena.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn new(x: usize) -> Self {
        NodeId(x as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Edge identifier: a dense index into the network's edge arena.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(u32);

impl EdgeId {
    #[inline]
    pub fn new(x: usize) -> Self {
        EdgeId(x as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The other member of this edge's forward/reverse pair.
    #[inline]
    pub fn paired(self) -> EdgeId {
        EdgeId(self.0 ^ 1)
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

/// Decomposition label of a node after a max-flow computation.
///
/// `S` nodes are reachable from the source in the residual network, `T`
/// nodes reach the sink, and `U` nodes are neither. Every node starts as
/// `U`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Label {
    S,
    T,
    #[default]
    U,
}

/// An edge of the flow network.
#[derive(Clone, Debug)]
pub struct Edge {
    source: NodeId,
    target: NodeId,
    capacity: Flow,
    flow: Flow,
    rank: Rank,
}

impl Edge {
    /// Return the source node index.
    #[inline]
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Return the target node index.
    #[inline]
    pub fn target(&self) -> NodeId {
        self.target
    }

    #[inline]
    pub fn capacity(&self) -> Flow {
        self.capacity
    }

    #[inline]
    pub fn flow(&self) -> Flow {
        self.flow
    }

    #[inline]
    pub fn rank(&self) -> Rank {
        self.rank
    }
}

/// Whether the pair (`edge`, `paired`) still admits flow in `edge`'s
/// direction: either spare forward capacity, or pushed flow on the pair
/// that can be cancelled.
#[inline]
fn is_residual(edge: &Edge, paired: &Edge) -> bool {
    edge.flow < edge.capacity || paired.flow > 0
}

/// A directed flow network over a fixed set of nodes.
///
/// Edges may be added at any time, including between max-flow computations;
/// newly added edges start with zero flow. The network also tracks one
/// [`Label`] per node, written by [`decompose`](FlowNetwork::decompose) and
/// consumed by [`delete_edges`](FlowNetwork::delete_edges).
#[derive(Clone, Debug, Default)]
pub struct FlowNetwork {
    labels: Vec<Label>,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<EdgeId>>,
    dist: Vec<usize>,
    next_out: Vec<usize>,
}

impl FlowNetwork {
    /// Create a network with `node_count` nodes and no edges.
    pub fn new(node_count: usize) -> Self {
        FlowNetwork {
            labels: vec![Label::U; node_count],
            edges: Vec::new(),
            adjacency: vec![Vec::new(); node_count],
            dist: vec![0; node_count],
            next_out: vec![0; node_count],
        }
    }

    /// Number of nodes in the network.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of forward edges (reverse pair members are not counted).
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    /// The raw edge arena: forward edges at even indices, each followed by
    /// its reverse at the odd index.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Access an edge by id.
    ///
    /// **Panics** if the edge does not exist.
    #[inline]
    pub fn edge(&self, edge: EdgeId) -> &Edge {
        &self.edges[edge.index()]
    }

    /// Decomposition label of `node`.
    ///
    /// **Panics** if the node does not exist.
    #[inline]
    pub fn label(&self, node: NodeId) -> Label {
        self.labels[node.index()]
    }

    /// Overwrite the decomposition label of `node`.
    ///
    /// **Panics** if the node does not exist.
    #[inline]
    pub fn set_label(&mut self, node: NodeId, label: Label) {
        self.labels[node.index()] = label;
    }

    /// Reset every node's label to [`Label::U`].
    pub fn reset_labels(&mut self) {
        self.labels.fill(Label::U);
    }

    /// Add the edge `u → v` with the given capacity and rank, together with
    /// its zero-capacity reverse. Returns the id of the forward edge.
    ///
    /// Self-loops are rejected silently.
    ///
    /// **Panics** if `u` or `v` is out of bounds.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, capacity: Flow, rank: Rank) -> Option<EdgeId> {
        if u == v {
            return None;
        }
        let forward = EdgeId::new(self.edges.len());
        self.edges.push(Edge {
            source: u,
            target: v,
            capacity,
            flow: 0,
            rank,
        });
        self.adjacency[u.index()].push(forward);
        self.edges.push(Edge {
            source: v,
            target: u,
            capacity: 0,
            flow: 0,
            rank: 0,
        });
        self.adjacency[v.index()].push(forward.paired());
        Some(forward)
    }

    /// Add a batch of `(u, v, capacity, rank)` edges.
    pub fn add_edges<I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = (NodeId, NodeId, Flow, Rank)>,
    {
        for (u, v, capacity, rank) in edges {
            self.add_edge(u, v, capacity, rank);
        }
    }

    /// Compute the maximum flow from `source` to `sink` with Dinic's
    /// algorithm: build a BFS level graph restricted to residual-capacity
    /// edges, push blocking flow along it with a cursor-guided DFS, and
    /// repeat until the sink is unreachable.
    ///
    /// Flow already on the edges is kept; the return value is only the flow
    /// pushed by this call.
    pub fn max_flow(&mut self, source: NodeId, sink: NodeId) -> Flow {
        let mut total = 0;
        while self.path_between(source, sink) {
            self.next_out.fill(0);
            loop {
                let pushed = self.send_flow(source, sink, Flow::MAX);
                if pushed == 0 {
                    break;
                }
                total += pushed;
            }
        }
        total
    }

    // Level BFS: label every node with its shortest residual-capacity
    // distance from `source`, stopping early once `sink` is reached.
    fn path_between(&mut self, source: NodeId, sink: NodeId) -> bool {
        let unreached = self.node_count() + 1;
        self.dist.fill(unreached);
        self.dist[source.index()] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(source);
        while let Some(node) = queue.pop_front() {
            if node == sink {
                break;
            }
            for i in 0..self.adjacency[node.index()].len() {
                let edge = &self.edges[self.adjacency[node.index()][i].index()];
                if edge.flow < edge.capacity
                    && self.dist[edge.target.index()] > self.dist[edge.source.index()] + 1
                {
                    self.dist[edge.target.index()] = self.dist[edge.source.index()] + 1;
                    queue.push_back(edge.target);
                }
            }
        }
        self.dist[sink.index()] != unreached
    }

    // Blocking-flow DFS along level-graph edges. `next_out` remembers, per
    // node, the first outgoing edge that may still admit flow; it advances
    // only past saturated or blocked edges, so a successful push leaves the
    // cursor in place for the next call.
    fn send_flow(&mut self, node: NodeId, sink: NodeId, limit: Flow) -> Flow {
        if node == sink || limit == 0 {
            return limit;
        }
        while self.next_out[node.index()] < self.adjacency[node.index()].len() {
            let edge_id = self.adjacency[node.index()][self.next_out[node.index()]];
            let (target, spare) = {
                let edge = &self.edges[edge_id.index()];
                (edge.target, edge.capacity - edge.flow)
            };
            if self.dist[target.index()] == self.dist[node.index()] + 1 {
                let pushed = self.send_flow(target, sink, spare.min(limit));
                if pushed > 0 {
                    self.edges[edge_id.index()].flow += pushed;
                    self.edges[edge_id.paired().index()].flow -= pushed;
                    return pushed;
                }
            }
            self.next_out[node.index()] += 1;
        }
        0
    }

    /// Label the nodes of the residual network: `S` for everything the
    /// source still reaches, then `T` for everything that still reaches the
    /// sink. A node visited by both sweeps keeps the label of the second
    /// (`T`); nodes visited by neither keep their current label, so callers
    /// reusing a network across rounds must [`reset_labels`] first.
    ///
    /// [`reset_labels`]: FlowNetwork::reset_labels
    pub fn decompose(&mut self, source: NodeId, sink: NodeId) {
        self.find_s_nodes(source);
        self.find_t_nodes(sink);
    }

    // BFS from the source along residual pairs, marking S.
    fn find_s_nodes(&mut self, source: NodeId) {
        let mut visited = FixedBitSet::with_capacity(self.node_count());
        let mut queue = VecDeque::new();
        visited.insert(source.index());
        queue.push_back(source);

        while let Some(node) = queue.pop_front() {
            self.labels[node.index()] = Label::S;
            for &edge_id in &self.adjacency[node.index()] {
                let edge = &self.edges[edge_id.index()];
                let paired = &self.edges[edge_id.paired().index()];
                if is_residual(edge, paired) && !visited.contains(edge.target.index()) {
                    visited.insert(edge.target.index());
                    queue.push_back(edge.target);
                }
            }
        }
    }

    // BFS from the sink against the flow direction, marking T. An edge is
    // traversable backwards when its paired reverse is residual.
    fn find_t_nodes(&mut self, sink: NodeId) {
        let mut visited = FixedBitSet::with_capacity(self.node_count());
        let mut queue = VecDeque::new();
        visited.insert(sink.index());
        queue.push_back(sink);

        while let Some(node) = queue.pop_front() {
            self.labels[node.index()] = Label::T;
            for &edge_id in &self.adjacency[node.index()] {
                let edge = &self.edges[edge_id.index()];
                let paired = &self.edges[edge_id.paired().index()];
                if is_residual(paired, edge) && !visited.contains(edge.target.index()) {
                    visited.insert(edge.target.index());
                    queue.push_back(edge.target);
                }
            }
        }
    }

    /// Disable every edge running from a `from`-labeled node to a
    /// `to`-labeled node by zeroing capacity and flow on it and on its pair.
    /// Index alignment is preserved; the edge simply stops admitting flow.
    pub fn delete_edges(&mut self, from: Label, to: Label) {
        for edge_id in 0..self.edges.len() {
            let edge = &self.edges[edge_id];
            if self.labels[edge.source.index()] == from && self.labels[edge.target.index()] == to {
                self.edges[edge_id].capacity = 0;
                self.edges[edge_id].flow = 0;
                self.edges[edge_id ^ 1].capacity = 0;
                self.edges[edge_id ^ 1].flow = 0;
            }
        }
    }

    /// Iterate over the `(edge, paired edge)` pairs of the residual network:
    /// every edge with spare forward capacity or cancellable flow on its
    /// pair.
    pub fn residual_edges(&self) -> impl Iterator<Item = (&Edge, &Edge)> {
        (0..self.edges.len()).filter_map(move |i| {
            let edge = &self.edges[i];
            let paired = &self.edges[i ^ 1];
            is_residual(edge, paired).then_some((edge, paired))
        })
    }
}
