//! **matchgraph** computes two-sided matchings on bipartite instances with
//! ranked preferences, upper quotas and, for one of the algorithms, lower
//! quotas.
//!
//! An [`Instance`] has an applicant partition and a post partition; every
//! vertex carries quotas and a ranked preference list with ties. Three
//! matching semantics are provided, all driven through the same flow
//! machinery: each vertex is wrapped in a small *classification tree*
//! inside a flow network ([`classify`]), and the matching is read back from
//! the residual edges after a sequence of [Dinic max-flow]
//! computations ([`network`]).
//!
//! - [`classified_popular`](algo::classified_popular): a matching no other
//!   matching beats under majority voting.
//! - [`classified_rank_maximal`](algo::classified_rank_maximal): a matching
//!   whose rank histogram is lexicographically maximal.
//! - [`relaxed_stable`](algo::relaxed_stable): a matching meeting every
//!   post's lower quota while satisfying a relaxed stability criterion.
//!
//! ```
//! use matchgraph::{Instance, Vertex};
//! use matchgraph::algo::classified_rank_maximal;
//!
//! let mut instance = Instance::new();
//! let mut a1 = Vertex::new("a1", 0, 1);
//! a1.preferences_mut().push("b1");
//! a1.preferences_mut().push("b2");
//! instance.insert_applicant(a1);
//! instance.insert_post(Vertex::new("b1", 0, 1));
//! instance.insert_post(Vertex::new("b2", 0, 1));
//!
//! let matching = classified_rank_maximal(&instance);
//! assert!(matching.contains("a1", "b1"));
//! ```
//!
//! [Dinic max-flow]: https://en.wikipedia.org/wiki/Dinic%27s_algorithm

pub mod algo;
pub mod classify;
pub mod instance;
pub mod matching;
pub mod network;
pub mod stats;

pub use crate::instance::{Instance, PreferenceList, Vertex};
pub use crate::matching::{Matching, PartnerList};
pub use crate::stats::{matching_stats, MatchingStats};
