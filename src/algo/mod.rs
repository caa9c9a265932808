/*!
The matching algorithms.

Each submodule implements one matching semantics over the classification
network built by [`classify`](crate::classify): popular matchings, rank
maximal matchings, and relaxed stable matchings. All entry points are free
functions taking an [`Instance`](crate::instance::Instance) and returning a
[`Matching`](crate::matching::Matching), or a `Result` for the semantics
that can fail to exist.
*/

pub mod popular;
pub mod rank_maximal;
pub mod relaxed_stable;

pub use self::popular::{classified_popular, NoPopularMatching};
pub use self::rank_maximal::classified_rank_maximal;
pub use self::relaxed_stable::{is_relaxed_stable, relaxed_stable, NoFeasibleMatching};
