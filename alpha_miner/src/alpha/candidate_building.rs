use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{info, warn};

use super::{
    error::AlphaError,
    footprint::Footprint,
    full::{AlphaConfig, DegenerateAlphabetPolicy},
    subsets::ActivitySubsets,
};

/// Place candidate `(A, B)`: sorted input and output activity indices
pub type CandidatePair = (Vec<usize>, Vec<usize>);

/// Set of place candidates (e.g., `Xl` or `Yl`)
pub type CandidateSet = HashSet<CandidatePair>;

/// Whether all activities in `acts` are pairwise unrelated (`a1 # a2`)
pub fn is_internally_independent(footprint: &Footprint, acts: &[usize]) -> bool {
    acts.iter()
        .all(|&a1| acts.iter().all(|&a2| footprint.is_unrelated(a1, a2)))
}

/// Whether every `a` in `a_set` is causally followed by every `b` in `b_set` (`a -> b`)
pub fn all_causal_between(footprint: &Footprint, a_set: &[usize], b_set: &[usize]) -> bool {
    a_set
        .iter()
        .all(|&a| b_set.iter().all(|&b| footprint.is_causal(a, b)))
}

/// Whether `(A, B)` is a valid place candidate, i.e., a member of `Xl`
pub fn is_candidate(footprint: &Footprint, a: &[usize], b: &[usize]) -> bool {
    !a.is_empty()
        && !b.is_empty()
        && is_internally_independent(footprint, a)
        && is_internally_independent(footprint, b)
        && all_causal_between(footprint, a, b)
}

///
/// Check the alphabet size against the [`AlphaConfig`] before enumerating subsets
///
/// Returns `Ok(false)` if the alphabet is degenerate (at most one activity) and the
/// configured policy asks for an empty result.
///
pub fn check_alphabet(footprint: &Footprint, config: &AlphaConfig) -> Result<bool, AlphaError> {
    let size = footprint.num_activities();
    if let Some(limit) = config.max_alphabet_size {
        if size > limit {
            return Err(AlphaError::ResourceLimitExceeded { size, limit });
        }
    }
    if size <= 1 {
        return match config.degenerate_alphabet {
            DegenerateAlphabetPolicy::Fail => Err(AlphaError::DegenerateAlphabet { size }),
            DegenerateAlphabetPolicy::EmptyResult => {
                warn!(size, "Degenerate activity alphabet, no place candidates");
                Ok(false)
            }
        };
    }
    Ok(true)
}

///
/// Lazily stream all members of `Xl`
///
/// Pairs are produced one by one from two independent [`ActivitySubsets`] enumerations;
/// nothing is materialized, so the caller may stop at any point.
///
pub fn iter_xl<'a>(
    footprint: &'a Footprint,
    config: &AlphaConfig,
) -> Result<impl Iterator<Item = CandidatePair> + 'a, AlphaError> {
    // An empty alphabet enumerates no subsets, so the stream is empty
    let n = if check_alphabet(footprint, config)? {
        footprint.num_activities()
    } else {
        0
    };
    Ok(ActivitySubsets::new(n)
        .filter(move |a| is_internally_independent(footprint, a))
        .flat_map(move |a| {
            let a_for_filter = a.clone();
            ActivitySubsets::new(n)
                .filter(move |b| {
                    is_internally_independent(footprint, b)
                        && all_causal_between(footprint, &a_for_filter, b)
                })
                .map(move |b| (a.clone(), b))
        }))
}

///
/// Build `Xl`: all pairs `(A, B)` of activity subsets (of size `1..n-1`) with internally
/// unrelated `A` and `B` and `a -> b` for all `a` in `A`, `b` in `B`
///
/// Subsets failing the independence test cannot take part in any pair, so they are
/// dropped once; the remaining pairs are checked in parallel.
///
pub fn derive_xl(footprint: &Footprint, config: &AlphaConfig) -> Result<CandidateSet, AlphaError> {
    if !check_alphabet(footprint, config)? {
        return Ok(CandidateSet::new());
    }
    let independent: Vec<Vec<usize>> = ActivitySubsets::new(footprint.num_activities())
        .filter(|s| is_internally_independent(footprint, s))
        .collect();
    let xl: CandidateSet = independent
        .par_iter()
        .flat_map_iter(|a| {
            independent
                .iter()
                .filter(move |b| all_causal_between(footprint, a, b))
                .map(move |b| (a.clone(), b.clone()))
        })
        .collect();
    info!(
        independent_subsets = independent.len(),
        candidates = xl.len(),
        "Built place candidates (Xl)"
    );
    Ok(xl)
}

#[cfg(test)]
mod tests {
    use crate::event_log::trace_log::TraceLog;

    use super::*;

    fn footprint_of(traces: Vec<Vec<&str>>) -> Footprint {
        Footprint::from_log(&TraceLog::from_traces(traces)).unwrap()
    }

    #[test]
    fn candidate_checks() {
        // a=0, b=1, c=2, d=3, e=4
        let fp = footprint_of(vec![
            vec!["a", "b", "c", "d"],
            vec!["a", "c", "b", "d"],
            vec!["a", "e", "d"],
        ]);
        assert!(is_internally_independent(&fp, &[1, 4]));
        assert!(!is_internally_independent(&fp, &[1, 2]));
        assert!(is_internally_independent(&fp, &[3]));
        assert!(all_causal_between(&fp, &[0], &[1, 4]));
        assert!(!all_causal_between(&fp, &[0], &[3]));
        assert!(is_candidate(&fp, &[1, 4], &[3]));
        assert!(!is_candidate(&fp, &[0], &[1, 2]));
        assert!(!is_candidate(&fp, &[], &[1]));
    }

    #[test]
    fn xl_of_sequence() {
        let fp = footprint_of(vec![vec!["a", "b", "c"]]);
        let xl = derive_xl(&fp, &AlphaConfig::default()).unwrap();
        let expected: CandidateSet = [(vec![0], vec![1]), (vec![1], vec![2])].into_iter().collect();
        assert_eq!(xl, expected);
    }

    #[test]
    fn lazy_stream_matches_parallel_build() {
        let fp = footprint_of(vec![
            vec!["a", "b", "c", "d"],
            vec!["a", "c", "b", "d"],
            vec!["a", "e", "d"],
        ]);
        let config = AlphaConfig::default();
        let streamed: CandidateSet = iter_xl(&fp, &config).unwrap().collect();
        assert_eq!(streamed, derive_xl(&fp, &config).unwrap());
        assert_eq!(streamed.len(), 10);
        let first = iter_xl(&fp, &config).unwrap().next();
        assert!(first.is_some_and(|(a, b)| streamed.contains(&(a, b))));
    }

    #[test]
    fn alphabet_limits() {
        let fp = footprint_of(vec![vec!["a", "b", "c"]]);
        let capped = AlphaConfig {
            max_alphabet_size: Some(2),
            ..AlphaConfig::default()
        };
        assert_eq!(
            derive_xl(&fp, &capped),
            Err(AlphaError::ResourceLimitExceeded { size: 3, limit: 2 })
        );
        assert!(iter_xl(&fp, &capped).is_err());
        let uncapped = AlphaConfig {
            max_alphabet_size: None,
            ..AlphaConfig::default()
        };
        assert_eq!(derive_xl(&fp, &uncapped).unwrap().len(), 2);
    }

    #[test]
    fn degenerate_alphabet_policies() {
        let fp = footprint_of(vec![vec!["a"], vec!["a", "a"]]);
        assert_eq!(derive_xl(&fp, &AlphaConfig::default()), Ok(CandidateSet::new()));
        assert_eq!(iter_xl(&fp, &AlphaConfig::default()).unwrap().count(), 0);
        let strict = AlphaConfig {
            degenerate_alphabet: DegenerateAlphabetPolicy::Fail,
            ..AlphaConfig::default()
        };
        assert_eq!(
            derive_xl(&fp, &strict),
            Err(AlphaError::DegenerateAlphabet { size: 1 })
        );
        assert!(matches!(
            iter_xl(&fp, &strict),
            Err(AlphaError::DegenerateAlphabet { size: 1 })
        ));
    }
}
