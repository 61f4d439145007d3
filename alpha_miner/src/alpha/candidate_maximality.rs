use rayon::prelude::*;
use tracing::info;

use super::candidate_building::{CandidatePair, CandidateSet};

/// Whether sorted `small` is a subset of sorted `large`
fn is_sorted_subset(small: &[usize], large: &[usize]) -> bool {
    let mut large_iter = large.iter();
    small.iter().all(|s| large_iter.any(|l| l == s))
}

/// Whether `cnd` is dominated by a _different_ candidate `other` (`A ⊆ A2` and `B ⊆ B2`)
pub fn is_dominated_by(cnd: &CandidatePair, other: &CandidatePair) -> bool {
    cnd != other && is_sorted_subset(&cnd.0, &other.0) && is_sorted_subset(&cnd.1, &other.1)
}

///
/// Reduce `Xl` to `Yl`: the candidates not dominated by any other candidate in `Xl`
///
/// Mutually incomparable maximal candidates are all kept.
///
pub fn derive_yl(xl: &CandidateSet) -> CandidateSet {
    let yl: CandidateSet = xl
        .par_iter()
        .filter(|cnd| !xl.iter().any(|other| is_dominated_by(cnd, other)))
        .cloned()
        .collect();
    info!(
        candidates = xl.len(),
        maximal = yl.len(),
        "Reduced place candidates to maximal ones (Yl)"
    );
    yl
}
