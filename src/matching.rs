//! Matchings between the two sides of an instance.

use indexmap::IndexMap;

use crate::network::Rank;

/// The partners a single vertex is matched to: an ordered multiset of
/// `(rank, partner id)` pairs, in the order the pairs were added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartnerList {
    partners: Vec<(Rank, String)>,
}

impl PartnerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a partner with the rank it occupies on this vertex's list.
    pub fn add(&mut self, rank: Rank, partner: impl Into<String>) {
        self.partners.push((rank, partner.into()));
    }

    /// Remove the first occurrence of `partner`. Returns whether one was
    /// found.
    pub fn remove(&mut self, partner: &str) -> bool {
        match self.partners.iter().position(|(_, id)| id == partner) {
            Some(position) => {
                self.partners.remove(position);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, partner: &str) -> bool {
        self.partners.iter().any(|(_, id)| id == partner)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.partners.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    /// Iterate over `(rank, partner id)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Rank, &str)> {
        self.partners.iter().map(|(rank, id)| (*rank, id.as_str()))
    }

    /// The least preferred partner: the first entry carrying the largest
    /// rank.
    pub fn least_preferred(&self) -> Option<(Rank, &str)> {
        let mut worst: Option<&(Rank, String)> = None;
        for entry in &self.partners {
            match worst {
                Some((rank, _)) if entry.0 <= *rank => {}
                _ => worst = Some(entry),
            }
        }
        worst.map(|(rank, id)| (*rank, id.as_str()))
    }
}

/// A two-sided matching: every matched vertex maps to the ordered list of
/// its partners, each tagged with the rank the partner occupies on the
/// vertex's own preference list.
///
/// The matching algorithms guarantee that no vertex ever holds more
/// partners than its upper quota.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Matching {
    applicants: IndexMap<String, PartnerList>,
    posts: IndexMap<String, PartnerList>,
}

impl Matching {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pair `(applicant, post)`. `applicant_rank` is the rank of
    /// the post on the applicant's list, `post_rank` the rank of the
    /// applicant on the post's list.
    pub fn add(&mut self, applicant: &str, post: &str, applicant_rank: Rank, post_rank: Rank) {
        self.applicants
            .entry(applicant.to_owned())
            .or_default()
            .add(applicant_rank, post);
        self.posts
            .entry(post.to_owned())
            .or_default()
            .add(post_rank, applicant);
    }

    /// Remove the pair `(applicant, post)` from both sides, if present.
    pub fn remove(&mut self, applicant: &str, post: &str) {
        if let Some(partners) = self.applicants.get_mut(applicant) {
            partners.remove(post);
        }
        if let Some(partners) = self.posts.get_mut(post) {
            partners.remove(applicant);
        }
    }

    pub fn contains(&self, applicant: &str, post: &str) -> bool {
        self.applicants
            .get(applicant)
            .map_or(false, |partners| partners.contains(post))
    }

    /// The applicant's partners, if it was ever matched.
    pub fn applicant_partners(&self, applicant: &str) -> Option<&PartnerList> {
        self.applicants.get(applicant)
    }

    /// The post's partners, if it was ever matched.
    pub fn post_partners(&self, post: &str) -> Option<&PartnerList> {
        self.posts.get(post)
    }

    /// Whether the applicant currently holds at least one partner.
    pub fn applicant_is_matched(&self, applicant: &str) -> bool {
        self.applicants
            .get(applicant)
            .map_or(false, |partners| !partners.is_empty())
    }

    /// Iterate over `(applicant id, partners)` in first-matched order.
    pub fn applicants(&self) -> impl Iterator<Item = (&str, &PartnerList)> {
        self.applicants
            .iter()
            .map(|(id, partners)| (id.as_str(), partners))
    }

    /// Iterate over `(post id, partners)` in first-matched order.
    pub fn posts(&self) -> impl Iterator<Item = (&str, &PartnerList)> {
        self.posts
            .iter()
            .map(|(id, partners)| (id.as_str(), partners))
    }

    /// Total number of matched pairs.
    pub fn pair_count(&self) -> usize {
        self.applicants.values().map(PartnerList::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pair_count() == 0
    }
}
