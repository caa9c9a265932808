//! The classification-tree reduction from a bipartite instance to a flow
//! network.
//!
//! Every vertex is wrapped in a two-level tree: a root capped at the
//! vertex's upper quota and one unit-capacity leaf per preference-list
//! entry. Applicant trees hang off the source, post trees feed the sink,
//! and each applicant additionally owns a unit-capacity *last-resort post*
//! subtree that can absorb it when no real post is available. The matching
//! algorithms then connect applicant leaves to post leaves rank by rank and
//! read the computed matching back out of the residual network.

use indexmap::{IndexMap, IndexSet};

use crate::instance::Instance;
use crate::matching::Matching;
use crate::network::{Flow, FlowNetwork, Label, NodeId, Rank};

/// Identity of a post inside the reduction: either a real B-vertex (by
/// dense index) or the synthetic last-resort post owned by an applicant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PostId {
    Real(usize),
    LastResort(usize),
}

impl PostId {
    /// Whether this is a synthetic last-resort post.
    #[inline]
    pub fn is_last_resort(self) -> bool {
        matches!(self, PostId::LastResort(_))
    }
}

/// Name of a node in the classification network.
///
/// Applicants are identified by their dense index in the instance's A
/// partition, posts by [`PostId`]. A leaf name records both the tree it
/// belongs to and the vertex on the other side it stands for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeName {
    Source,
    Sink,
    /// Root of an applicant's tree.
    ApplicantRoot(usize),
    /// Leaf of an applicant's tree for one preferred post.
    ApplicantLeaf { applicant: usize, post: PostId },
    /// Root of a post's tree.
    PostRoot(PostId),
    /// Leaf of a post's tree for one interested applicant.
    PostLeaf { post: PostId, applicant: usize },
}

/// The flow matching read back from the residual network: applicant leaf to
/// `(rank, post leaf)`.
pub type FlowMatching = IndexMap<NodeName, (Rank, NodeName)>;

/// The initial network H₀ for an instance, together with the arena mapping
/// node names to dense ids.
///
/// `Source` has id 0 and `Sink` id 1; classification nodes follow in
/// construction order. H₀ contains all tree edges but no edge between an
/// applicant leaf and a post leaf; those are added by the drivers.
#[derive(Clone, Debug)]
pub struct ClassifiedNetwork {
    nodes: IndexSet<NodeName>,
    network: FlowNetwork,
}

impl ClassifiedNetwork {
    /// Build H₀ for `instance`.
    ///
    /// **Panics** if a preference list references a post id that is not in
    /// the instance.
    pub fn build(instance: &Instance) -> Self {
        let mut nodes = IndexSet::new();
        let mut edges: Vec<(NodeName, NodeName, Flow, Rank)> = Vec::new();

        nodes.insert(NodeName::Source);
        nodes.insert(NodeName::Sink);

        // Applicant trees: source → root, root → one leaf per preference.
        for (a, applicant) in instance.applicants().enumerate() {
            nodes.insert(NodeName::ApplicantRoot(a));
            edges.push((
                NodeName::Source,
                NodeName::ApplicantRoot(a),
                Flow::from(applicant.upper_quota()),
                0,
            ));
        }
        for (a, applicant) in instance.applicants().enumerate() {
            for (_, post_id) in applicant.preferences().iter() {
                let post = PostId::Real(resolve_post(instance, post_id));
                let leaf = NodeName::ApplicantLeaf { applicant: a, post };
                nodes.insert(leaf);
                edges.push((NodeName::ApplicantRoot(a), leaf, 1, 0));
            }
        }

        // Post trees: root → sink, one leaf per interested applicant.
        for (p, post) in instance.posts().enumerate() {
            nodes.insert(NodeName::PostRoot(PostId::Real(p)));
            edges.push((
                NodeName::PostRoot(PostId::Real(p)),
                NodeName::Sink,
                Flow::from(post.upper_quota()),
                0,
            ));
        }
        for (a, applicant) in instance.applicants().enumerate() {
            for (_, post_id) in applicant.preferences().iter() {
                let post = PostId::Real(resolve_post(instance, post_id));
                let leaf = NodeName::PostLeaf { post, applicant: a };
                nodes.insert(leaf);
                edges.push((leaf, NodeName::PostRoot(post), 1, 0));
            }
        }

        // Last-resort subtrees, one per applicant, unit capacity throughout.
        for (a, _) in instance.applicants().enumerate() {
            nodes.insert(NodeName::PostRoot(PostId::LastResort(a)));
            edges.push((
                NodeName::PostRoot(PostId::LastResort(a)),
                NodeName::Sink,
                1,
                0,
            ));
        }
        for (a, _) in instance.applicants().enumerate() {
            let post = PostId::LastResort(a);
            let applicant_leaf = NodeName::ApplicantLeaf { applicant: a, post };
            nodes.insert(applicant_leaf);
            edges.push((NodeName::ApplicantRoot(a), applicant_leaf, 1, 0));

            let post_leaf = NodeName::PostLeaf { post, applicant: a };
            nodes.insert(post_leaf);
            edges.push((post_leaf, NodeName::PostRoot(post), 1, 0));
        }

        let mut classified = ClassifiedNetwork {
            network: FlowNetwork::new(nodes.len()),
            nodes,
        };
        classified.add_edges(edges);
        classified
    }

    /// Dense id of a named node.
    ///
    /// **Panics** if the name was never created.
    pub fn node(&self, name: NodeName) -> NodeId {
        match self.nodes.get_index_of(&name) {
            Some(index) => NodeId::new(index),
            None => panic!("unknown classification node {:?}", name),
        }
    }

    /// Name of the node with the given id.
    ///
    /// **Panics** if the id is out of bounds.
    pub fn name(&self, node: NodeId) -> NodeName {
        match self.nodes.get_index(node.index()) {
            Some(name) => *name,
            None => panic!("node id {:?} out of bounds", node),
        }
    }

    #[inline]
    pub fn source(&self) -> NodeId {
        self.node(NodeName::Source)
    }

    #[inline]
    pub fn sink(&self) -> NodeId {
        self.node(NodeName::Sink)
    }

    /// Decomposition label of a named node.
    pub fn label(&self, name: NodeName) -> Label {
        self.network.label(self.node(name))
    }

    #[inline]
    pub fn network(&self) -> &FlowNetwork {
        &self.network
    }

    #[inline]
    pub fn network_mut(&mut self) -> &mut FlowNetwork {
        &mut self.network
    }

    /// Add name-addressed edges to the network.
    pub fn add_edges<I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = (NodeName, NodeName, Flow, Rank)>,
    {
        for (from, to, capacity, rank) in edges {
            let from = self.node(from);
            let to = self.node(to);
            self.network.add_edge(from, to, capacity, rank);
        }
    }

    /// Run a max-flow computation between source and sink.
    pub fn max_flow(&mut self) -> Flow {
        let source = self.source();
        let sink = self.sink();
        self.network.max_flow(source, sink)
    }

    /// Read the matching encoded in the residual network.
    ///
    /// A unit of flow pushed from an applicant leaf to a post leaf shows up
    /// as a residual edge in the opposite direction; its paired edge is the
    /// original connecting edge and carries the preference rank. Rank-0
    /// pairs are skipped: the connecting edge of an applicant with an empty
    /// preference list is synthetic and represents no assignment.
    pub fn flow_matching(&self) -> FlowMatching {
        let mut matching = FlowMatching::new();
        for (edge, paired) in self.network.residual_edges() {
            let tail = self.name(edge.source());
            let head = self.name(edge.target());
            if let (NodeName::PostLeaf { .. }, NodeName::ApplicantLeaf { .. }) = (tail, head) {
                if paired.rank() == 0 {
                    continue;
                }
                let previous = matching.insert(head, (paired.rank(), tail));
                debug_assert!(
                    previous.is_none(),
                    "applicant leaf {:?} matched more than once",
                    head
                );
            }
        }
        matching
    }

    /// Translate a flow matching into vertex terms, dropping pairs whose
    /// post is a last resort. The applicant side keeps the flow rank; the
    /// post side records the applicant's rank on the post's list (1 when
    /// the post does not rank the applicant).
    pub fn matching_from_flow(&self, instance: &Instance, flow: &FlowMatching) -> Matching {
        let mut matching = Matching::new();
        for (leaf, (rank, _)) in flow {
            let (a, post) = match *leaf {
                NodeName::ApplicantLeaf { applicant, post } => (applicant, post),
                _ => continue,
            };
            let p = match post {
                PostId::Real(p) => p,
                PostId::LastResort(_) => continue,
            };
            let applicant = instance.applicant_at(a);
            let post = instance.post_at(p);
            let post_rank = post.preferences().rank_of(applicant.id()).unwrap_or(1);
            matching.add(applicant.id(), post.id(), *rank, post_rank);
        }
        matching
    }
}

pub(crate) fn resolve_post(instance: &Instance, id: &str) -> usize {
    match instance.post_index(id) {
        Some(index) => index,
        None => panic!("preference list references unknown post {:?}", id),
    }
}
