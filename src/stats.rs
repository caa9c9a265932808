//! Summary statistics of a matching with respect to its instance.

use fixedbitset::FixedBitSet;

use crate::instance::Instance;
use crate::matching::{Matching, PartnerList};

/// Aggregate quality measures of a matching.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchingStats {
    /// Applicants holding at least one partner.
    pub matched_applicants: usize,
    /// Pairs `(applicant, post)` that block the matching.
    pub blocking_pairs: usize,
    /// Applicants participating in at least one blocking pair.
    pub blocking_applicants: usize,
    /// Applicants matched to a rank-1 partner.
    pub rank_one: usize,
    /// `rank_histogram[r - 1]` counts the matched pairs whose applicant
    /// ranks the post at `r`. This is the objective rank-maximal matchings
    /// maximize lexicographically.
    pub rank_histogram: Vec<usize>,
}

/// Compute [`MatchingStats`] for `matching` over `instance`.
///
/// **Panics** if the matching mentions ids that are not in the instance.
pub fn matching_stats(instance: &Instance, matching: &Matching) -> MatchingStats {
    let (blocking, blocking_pairs) = blocking_marks(instance, matching);

    let mut stats = MatchingStats {
        blocking_pairs,
        blocking_applicants: blocking.count_ones(..),
        rank_histogram: vec![0; instance.max_rank()],
        ..MatchingStats::default()
    };

    for applicant in instance.applicants() {
        let partners = match matching.applicant_partners(applicant.id()) {
            Some(partners) if !partners.is_empty() => partners,
            _ => continue,
        };
        stats.matched_applicants += 1;
        if partners.iter().any(|(rank, _)| rank == 1) {
            stats.rank_one += 1;
        }
        for (rank, _) in partners.iter() {
            if rank >= 1 && rank <= stats.rank_histogram.len() {
                stats.rank_histogram[rank - 1] += 1;
            }
        }
    }
    stats
}

/// Mark every applicant that participates in a blocking pair and count the
/// blocking pairs.
///
/// A pair `(u, v)` with v not matched to u blocks when u prefers v to every
/// current partner (every post before u's best partner in preference order)
/// and v either has spare capacity or would not keep its least preferred
/// partner over u.
pub(crate) fn blocking_marks(instance: &Instance, matching: &Matching) -> (FixedBitSet, usize) {
    let mut blocking = FixedBitSet::with_capacity(instance.applicant_count());
    let mut pairs = 0;

    for (a, applicant) in instance.applicants().enumerate() {
        let partners = matching.applicant_partners(applicant.id());
        for (_, post_id) in applicant.preferences().iter() {
            if partners.map_or(false, |list| list.contains(post_id)) {
                // Everything from u's best partner onwards is no improvement.
                break;
            }
            let post = match instance.post(post_id) {
                Some(post) => post,
                None => panic!("preference list references unknown post {:?}", post_id),
            };
            let occupancy = matching
                .post_partners(post.id())
                .map_or(0, PartnerList::len);
            if occupancy >= post.upper_quota() as usize {
                let worst = matching
                    .post_partners(post.id())
                    .and_then(PartnerList::least_preferred);
                let (worst_rank, _) = match worst {
                    Some(worst) => worst,
                    // Zero capacity: the post can never take u.
                    None => continue,
                };
                match post.preferences().rank_of(applicant.id()) {
                    Some(rank) if worst_rank >= rank => {}
                    // The post keeps its current partners over u.
                    _ => continue,
                }
            }
            blocking.insert(a);
            pairs += 1;
        }
    }
    (blocking, pairs)
}
