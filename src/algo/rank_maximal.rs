//! Classified rank-maximal matchings.
//!
//! A rank-maximal matching maximizes the number of rank-1 pairs, then the
//! number of rank-2 pairs, and so on: its rank histogram is lexicographically
//! maximal. The algorithm grows the classification network one rank at a
//! time, recomputing the max flow after each insertion and pruning edges
//! that can no longer appear in any rank-maximal matching.

use crate::classify::{resolve_post, ClassifiedNetwork, NodeName, PostId};
use crate::instance::Instance;
use crate::matching::Matching;
use crate::network::Label;

// An original bipartite edge awaiting insertion at its rank. Killed edges
// stay in the list but are never inserted.
struct RankedEdge {
    applicant: usize,
    post: usize,
    alive: bool,
}

/// Compute the classified rank-maximal matching of `instance`.
///
/// Always succeeds; applicants without any usable preference simply stay
/// unmatched (their last-resort subtree exists but is never connected).
///
/// **Panics** if a preference list references an id that is not in the
/// instance.
pub fn classified_rank_maximal(instance: &Instance) -> Matching {
    let mut classified = ClassifiedNetwork::build(instance);
    let source = classified.source();
    let sink = classified.sink();

    // Bucket every original edge by rank; all start alive.
    let max_rank = instance.max_rank();
    let mut ranked: Vec<Vec<RankedEdge>> = (0..max_rank).map(|_| Vec::new()).collect();
    for (a, applicant) in instance.applicants().enumerate() {
        for (rank, post_id) in applicant.preferences().iter() {
            ranked[rank - 1].push(RankedEdge {
                applicant: a,
                post: resolve_post(instance, post_id),
                alive: true,
            });
        }
    }

    for k in 1..=max_rank {
        // Insert the surviving edges of rank k and augment.
        let round: Vec<_> = ranked[k - 1]
            .iter()
            .filter(|edge| edge.alive)
            .map(|edge| {
                let post = PostId::Real(edge.post);
                (
                    NodeName::ApplicantLeaf {
                        applicant: edge.applicant,
                        post,
                    },
                    NodeName::PostLeaf {
                        post,
                        applicant: edge.applicant,
                    },
                    1,
                    k,
                )
            })
            .collect();
        classified.add_edges(round);
        classified.network_mut().max_flow(source, sink);

        // Fresh decomposition for this round.
        classified.network_mut().reset_labels();
        classified.network_mut().decompose(source, sink);
        classified.network_mut().delete_edges(Label::T, Label::S);
        classified.network_mut().delete_edges(Label::U, Label::S);

        // Worse-rank edges may no longer route through leaves that the
        // decomposition has pinned down: kill every pending edge whose
        // applicant leaf left S or whose post leaf left T.
        for j in k + 1..=max_rank {
            for edge in ranked[j - 1].iter_mut() {
                if !edge.alive {
                    continue;
                }
                let post = PostId::Real(edge.post);
                let applicant_leaf = classified.label(NodeName::ApplicantLeaf {
                    applicant: edge.applicant,
                    post,
                });
                let post_leaf = classified.label(NodeName::PostLeaf {
                    post,
                    applicant: edge.applicant,
                });
                if matches!(applicant_leaf, Label::T | Label::U)
                    || matches!(post_leaf, Label::S | Label::U)
                {
                    edge.alive = false;
                }
            }
        }
    }

    let flow = classified.flow_matching();
    classified.matching_from_flow(instance, &flow)
}
