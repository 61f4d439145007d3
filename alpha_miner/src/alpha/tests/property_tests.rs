use proptest::prelude::*;

use crate::{
    alpha::{
        candidate_building::{derive_xl, is_candidate, iter_xl, CandidateSet},
        candidate_maximality::is_dominated_by,
        footprint::Footprint,
        full::alpha_discover,
        subsets::ActivitySubsets,
    },
    AlphaConfig, AlphaError, TraceLog,
};

/// Logs over a small alphabet, possibly with empty traces
fn small_log() -> impl Strategy<Value = TraceLog> {
    prop::collection::vec(
        prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d", "e"]), 0..7),
        1..6,
    )
    .prop_map(TraceLog::from_traces)
}

proptest::proptest! {
    #[test]
    fn prop_relations_partition_distinct_pairs(log in small_log()) {
        let fp = match Footprint::from_log(&log) {
            Ok(fp) => fp,
            Err(e) => {
                prop_assert_eq!(e, AlphaError::EmptyLog);
                prop_assert_eq!(log.num_events(), 0);
                return Ok(());
            }
        };
        let n = fp.num_activities();
        for a in 0..n {
            prop_assert!(fp.is_unrelated(a, a));
            for b in 0..n {
                if a == b {
                    continue;
                }
                let holding = [
                    fp.is_causal(a, b),
                    fp.is_causal(b, a),
                    fp.is_unrelated(a, b),
                    fp.parallel().contains(&(a, b)),
                ]
                .iter()
                .filter(|x| **x)
                .count();
                prop_assert_eq!(holding, 1);
            }
        }
    }

    #[test]
    fn prop_relation_symmetries(log in small_log()) {
        if let Ok(fp) = Footprint::from_log(&log) {
            for &(a, b) in fp.parallel() {
                prop_assert!(fp.parallel().contains(&(b, a)));
            }
            for &(a, b) in fp.causal() {
                prop_assert!(!fp.is_causal(b, a));
                prop_assert!(fp.directly_follows().contains(&(a, b)));
            }
            for &(a, b) in fp.unrelated() {
                prop_assert!(fp.is_unrelated(b, a));
            }
        }
    }

    #[test]
    fn prop_yl_is_maximal_subset_of_xl(log in small_log()) {
        if let Ok(res) = alpha_discover(&log, &AlphaConfig::default()) {
            for cnd in &res.yl {
                prop_assert!(res.xl.contains(cnd));
                prop_assert!(!res.xl.iter().any(|other| is_dominated_by(cnd, other)));
            }
            for cnd in &res.xl {
                prop_assert!(is_candidate(&res.footprint, &cnd.0, &cnd.1));
                prop_assert!(res.yl.contains(cnd) || res.yl.iter().any(|y| is_dominated_by(cnd, y)));
            }
        }
    }

    #[test]
    fn prop_trace_order_and_duplicates_are_irrelevant(log in small_log()) {
        let mut reordered = log.clone();
        reordered.traces.reverse();
        reordered.traces.extend(log.traces.iter().cloned());
        prop_assert_eq!(
            alpha_discover(&log, &AlphaConfig::default()),
            alpha_discover(&reordered, &AlphaConfig::default())
        );
    }

    #[test]
    fn prop_lazy_xl_matches_parallel_xl(log in small_log()) {
        if let Ok(fp) = Footprint::from_log(&log) {
            let config = AlphaConfig::default();
            let streamed: CandidateSet = iter_xl(&fp, &config).unwrap().collect();
            prop_assert_eq!(streamed, derive_xl(&fp, &config).unwrap());
        }
    }

    #[test]
    fn prop_subset_enumeration_is_restartable(n in 0usize..7) {
        let mut subsets = ActivitySubsets::new(n);
        let first: Vec<Vec<usize>> = subsets.by_ref().collect();
        subsets.restart();
        let second: Vec<Vec<usize>> = subsets.collect();
        prop_assert_eq!(first.len() as u128, ActivitySubsets::total_count(n));
        prop_assert_eq!(first, second);
    }
}
