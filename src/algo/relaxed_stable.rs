//! Relaxed stable matchings for instances with lower quotas.
//!
//! A feasible matching must give every post at least its lower quota of
//! partners; under that constraint classical stability may be unattainable,
//! so the relaxation tolerates blocking pairs as long as no unmatched
//! applicant is involved in one and every post keeps enough non-blocking
//! partners to cover its lower quota.
//!
//! The algorithm first fills all lower quotas by running the popular
//! matching on a reduced instance (post quotas clamped to the lower quota,
//! applicant preferences flattened into a single tie), then improves the
//! seed with a proposal loop in which seeded partners are displaceable
//! exactly once.

use std::error::Error;
use std::fmt;

use crate::algo::popular::classified_popular;
use crate::instance::{Instance, Vertex};
use crate::matching::{Matching, PartnerList};
use crate::network::Rank;
use crate::stats::blocking_marks;

/// An algorithm error: the lower quotas cannot all be met.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoFeasibleMatching(pub(crate) ());

impl fmt::Display for NoFeasibleMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no feasible matching satisfies the lower quotas")
    }
}

impl Error for NoFeasibleMatching {}

/// Compute a relaxed stable matching of `instance`.
///
/// **Panics** if a preference list references an id that is not in the
/// instance, or if an applicant proposes to a post that does not rank it.
pub fn relaxed_stable(instance: &Instance) -> Result<Matching, NoFeasibleMatching> {
    let reduced = reduced_instance(instance);
    let seed = classified_popular(&reduced).map_err(|_| NoFeasibleMatching(()))?;
    let mut matching = translate_seed(instance, &seed);

    // Seeded applicants are level 0 and may be displaced once regardless of
    // rank; everyone else starts level 1 on the free stack.
    let mut level = vec![0u8; instance.applicant_count()];
    let mut next_proposal = vec![0usize; instance.applicant_count()];
    let mut free = Vec::new();
    for (a, applicant) in instance.applicants().enumerate() {
        if !matching.applicant_is_matched(applicant.id()) {
            level[a] = 1;
            free.push(a);
        }
    }

    while let Some(a) = free.pop() {
        let applicant = instance.applicant_at(a);
        let (applicant_rank, post) = match applicant.preferences().get(next_proposal[a]) {
            Some((rank, post_id)) => (rank, post_of(instance, post_id)),
            // Preference list exhausted; the applicant stays as it is.
            None => continue,
        };
        let rank_at_post = match post.preferences().rank_of(applicant.id()) {
            Some(rank) => rank,
            None => panic!(
                "post {:?} does not rank applicant {:?}",
                post.id(),
                applicant.id()
            ),
        };

        let occupancy = matching
            .post_partners(post.id())
            .map_or(0, PartnerList::len);
        if occupancy < post.upper_quota() as usize {
            matching.add(applicant.id(), post.id(), applicant_rank, rank_at_post);
        } else if let Some(seeded) = level_zero_partner(instance, &matching, post.id(), &level) {
            // A seeded partner makes room exactly once.
            level[seeded] = 1;
            let seeded_id = instance.applicant_at(seeded).id().to_owned();
            matching.remove(&seeded_id, post.id());
            matching.add(applicant.id(), post.id(), applicant_rank, rank_at_post);
            free.push(seeded);
        } else {
            let worst = matching
                .post_partners(post.id())
                .and_then(PartnerList::least_preferred)
                .map(|(rank, id)| (rank, id.to_owned()));
            match worst {
                Some((worst_rank, worst_id)) if rank_at_post < worst_rank => {
                    matching.remove(&worst_id, post.id());
                    matching.add(applicant.id(), post.id(), applicant_rank, rank_at_post);
                    free.push(applicant_of(instance, &worst_id));
                }
                _ => {
                    // Rejected; try the next preference on a later turn.
                    free.push(a);
                }
            }
        }
        next_proposal[a] += 1;
    }

    Ok(matching)
}

/// Whether `matching` is relaxed stable for `instance`: no applicant in a
/// blocking pair is unmatched, and for every post the number of its
/// partners that sit in blocking pairs stays within its lower quota.
///
/// **Panics** if the matching mentions ids that are not in the instance.
pub fn is_relaxed_stable(instance: &Instance, matching: &Matching) -> bool {
    let (blocking, _) = blocking_marks(instance, matching);

    for (a, applicant) in instance.applicants().enumerate() {
        if blocking.contains(a) && !matching.applicant_is_matched(applicant.id()) {
            return false;
        }
    }

    for post in instance.posts() {
        let mut slack = i64::from(post.lower_quota());
        if let Some(partners) = matching.post_partners(post.id()) {
            for (_, applicant_id) in partners.iter() {
                if blocking.contains(applicant_of(instance, applicant_id)) {
                    slack -= 1;
                }
            }
        }
        if slack < 0 {
            return false;
        }
    }
    true
}

// The reduced instance whose popular matching fills all lower quotas: post
// quotas become (ℓ, ℓ) and applicant preferences collapse into one tie so
// that every acceptable post is equally good.
fn reduced_instance(instance: &Instance) -> Instance {
    let mut reduced = Instance::new();
    for applicant in instance.applicants() {
        let mut vertex = Vertex::new(
            applicant.id(),
            applicant.lower_quota(),
            applicant.upper_quota(),
        );
        for (position, (_, post_id)) in applicant.preferences().iter().enumerate() {
            if position == 0 {
                vertex.preferences_mut().push(post_id);
            } else {
                vertex.preferences_mut().push_tied(post_id);
            }
        }
        reduced.insert_applicant(vertex);
    }
    for post in instance.posts() {
        reduced.insert_post(Vertex::new(
            post.id(),
            post.lower_quota(),
            post.lower_quota(),
        ));
    }
    reduced
}

// Re-rank the reduced-instance matching against the original preference
// lists on both sides.
fn translate_seed(instance: &Instance, seed: &Matching) -> Matching {
    let mut matching = Matching::new();
    for post in instance.posts() {
        let partners = match seed.post_partners(post.id()) {
            Some(partners) => partners,
            None => continue,
        };
        for (_, applicant_id) in partners.iter() {
            let applicant = match instance.applicant(applicant_id) {
                Some(applicant) => applicant,
                None => panic!("matching references unknown applicant {:?}", applicant_id),
            };
            let applicant_rank = match applicant.preferences().rank_of(post.id()) {
                Some(rank) => rank,
                None => panic!(
                    "applicant {:?} does not rank post {:?}",
                    applicant_id,
                    post.id()
                ),
            };
            let rank_at_post: Rank = match post.preferences().rank_of(applicant_id) {
                Some(rank) => rank,
                None => panic!(
                    "post {:?} does not rank applicant {:?}",
                    post.id(),
                    applicant_id
                ),
            };
            matching.add(applicant_id, post.id(), applicant_rank, rank_at_post);
        }
    }
    matching
}

// First partner of the post (in matching order) still at level 0.
fn level_zero_partner(
    instance: &Instance,
    matching: &Matching,
    post_id: &str,
    level: &[u8],
) -> Option<usize> {
    let partners = matching.post_partners(post_id)?;
    partners
        .iter()
        .map(|(_, applicant_id)| applicant_of(instance, applicant_id))
        .find(|&a| level[a] == 0)
}

fn post_of<'a>(instance: &'a Instance, id: &str) -> &'a Vertex {
    match instance.post(id) {
        Some(post) => post,
        None => panic!("preference list references unknown post {:?}", id),
    }
}

fn applicant_of(instance: &Instance, id: &str) -> usize {
    match instance.applicant_index(id) {
        Some(index) => index,
        None => panic!("matching references unknown applicant {:?}", id),
    }
}
