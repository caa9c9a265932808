//! Classified popular matchings.
//!
//! A matching is *popular* when no other matching would win a majority vote
//! among the applicants. The classified variant additionally respects every
//! vertex's upper quota through the classification trees. The algorithm
//! runs two max-flow phases over the classification network: first along
//! the applicants' rank-1 edges, then along each remaining applicant's best
//! still-reachable alternatives.

use std::error::Error;
use std::fmt;

use crate::classify::{resolve_post, ClassifiedNetwork, NodeName, PostId};
use crate::instance::Instance;
use crate::matching::Matching;
use crate::network::{Flow, Label, Rank};

/// An algorithm error: the instance admits no applicant-complete popular
/// matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoPopularMatching(pub(crate) ());

impl fmt::Display for NoPopularMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no popular matching exists for this instance")
    }
}

impl Error for NoPopularMatching {}

/// Compute a classified popular matching of `instance`.
///
/// Fails when the flow assignment leaves an applicant without a partner.
/// An applicant with an empty preference list always does, since even its
/// last-resort absorption counts for nothing. Pairs involving last-resort
/// posts never appear in the returned matching.
///
/// **Panics** if a preference list references an id that is not in the
/// instance.
pub fn classified_popular(instance: &Instance) -> Result<Matching, NoPopularMatching> {
    let mut classified = ClassifiedNetwork::build(instance);
    let source = classified.source();
    let sink = classified.sink();

    // Phase one: connect every applicant to its rank-1 posts and saturate.
    classified.add_edges(f_edges(instance));
    classified.max_flow();

    // Decompose once; S-side nodes still want flow, T-side nodes can still
    // take it. Edges into S from outside cannot be part of a popular
    // assignment and are removed.
    classified.network_mut().decompose(source, sink);
    classified.network_mut().delete_edges(Label::T, Label::S);
    classified.network_mut().delete_edges(Label::U, Label::S);

    // Phase two: every applicant whose root stayed in S gets edges to its
    // most preferred T-labeled posts, or to its last resort.
    let promotions = s_edges(instance, &classified);
    classified.add_edges(promotions);
    classified.max_flow();

    let flow = classified.flow_matching();
    if flow.len() != instance.applicant_count() {
        return Err(NoPopularMatching(()));
    }
    Ok(classified.matching_from_flow(instance, &flow))
}

// One unit edge per rank-1 preference entry, applicant leaf → post leaf.
fn f_edges(instance: &Instance) -> Vec<(NodeName, NodeName, Flow, Rank)> {
    let mut edges = Vec::new();
    for (a, applicant) in instance.applicants().enumerate() {
        for (rank, post_id) in applicant.preferences().iter() {
            if rank != 1 {
                break;
            }
            let post = PostId::Real(resolve_post(instance, post_id));
            edges.push((
                NodeName::ApplicantLeaf { applicant: a, post },
                NodeName::PostLeaf { post, applicant: a },
                1,
                rank,
            ));
        }
    }
    edges
}

// For each applicant rooted in S, unit edges to all T-labeled post leaves
// of its most preferred rank that has one; the last-resort edge when no
// rank qualifies.
fn s_edges(
    instance: &Instance,
    classified: &ClassifiedNetwork,
) -> Vec<(NodeName, NodeName, Flow, Rank)> {
    let mut edges = Vec::new();
    for (a, applicant) in instance.applicants().enumerate() {
        if classified.label(NodeName::ApplicantRoot(a)) != Label::S {
            continue;
        }

        let mut best_rank = None;
        for (rank, post_id) in applicant.preferences().iter() {
            if let Some(best) = best_rank {
                if rank != best {
                    break;
                }
            }
            let post = PostId::Real(resolve_post(instance, post_id));
            if classified.label(NodeName::PostLeaf { post, applicant: a }) == Label::T {
                best_rank = Some(rank);
                edges.push((
                    NodeName::ApplicantLeaf { applicant: a, post },
                    NodeName::PostLeaf { post, applicant: a },
                    1,
                    rank,
                ));
            }
        }

        if best_rank.is_none() {
            let post = PostId::LastResort(a);
            edges.push((
                NodeName::ApplicantLeaf { applicant: a, post },
                NodeName::PostLeaf { post, applicant: a },
                1,
                applicant.preferences().len(),
            ));
        }
    }
    edges
}
