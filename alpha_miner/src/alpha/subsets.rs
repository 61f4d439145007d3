use std::ops::Range;

use itertools::{Combinations, Itertools};

///
/// Lazy enumeration of all activity subsets of size `1..n-1` over the indices `0..n`
///
/// Subsets are produced in order of increasing size, each as a sorted `Vec<usize>`.
/// Nothing is materialized up front: the iterator can be dropped at any point,
/// and cloning it (or calling [`ActivitySubsets::restart`]) gives an independent
/// enumeration from the current (or initial) position.
///
/// For `n <= 1` there are no subsets.
///
#[derive(Debug, Clone)]
pub struct ActivitySubsets {
    num_activities: usize,
    size: usize,
    current: Option<Combinations<Range<usize>>>,
}

impl ActivitySubsets {
    /// Enumerate the subsets of an alphabet with `num_activities` activities
    pub fn new(num_activities: usize) -> Self {
        Self {
            num_activities,
            size: 1,
            current: (num_activities > 1).then(|| (0..num_activities).combinations(1)),
        }
    }

    /// Start over from the first subset
    pub fn restart(&mut self) {
        *self = Self::new(self.num_activities);
    }

    /// Total number of subsets of the full enumeration (`2^n - 2` for `n >= 1`)
    ///
    /// Saturates at [`u128::MAX`] for alphabets beyond 128 activities.
    pub fn total_count(num_activities: usize) -> u128 {
        match num_activities {
            0 | 1 => 0,
            n if n >= 128 => u128::MAX,
            n => (1u128 << n) - 2,
        }
    }
}

impl Iterator for ActivitySubsets {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let combinations = self.current.as_mut()?;
            if let Some(subset) = combinations.next() {
                return Some(subset);
            }
            self.size += 1;
            self.current = if self.size < self.num_activities {
                Some((0..self.num_activities).combinations(self.size))
            } else {
                None
            };
        }
    }
}

impl std::iter::FusedIterator for ActivitySubsets {}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn subsets_of_three() {
        let subsets: Vec<Vec<usize>> = ActivitySubsets::new(3).collect();
        assert_eq!(
            subsets,
            vec![
                vec![0],
                vec![1],
                vec![2],
                vec![0, 1],
                vec![0, 2],
                vec![1, 2]
            ]
        );
        assert_eq!(ActivitySubsets::total_count(3), 6);
    }

    #[test]
    fn degenerate_alphabets_have_no_subsets() {
        assert_eq!(ActivitySubsets::new(0).count(), 0);
        assert_eq!(ActivitySubsets::new(1).count(), 0);
        assert_eq!(ActivitySubsets::total_count(1), 0);
    }

    #[test]
    fn count_matches_and_subsets_are_unique_and_sorted() {
        let subsets: Vec<Vec<usize>> = ActivitySubsets::new(6).collect();
        assert_eq!(subsets.len() as u128, ActivitySubsets::total_count(6));
        let unique: HashSet<&Vec<usize>> = subsets.iter().collect();
        assert_eq!(unique.len(), subsets.len());
        assert!(subsets
            .iter()
            .all(|s| !s.is_empty() && s.len() < 6 && s.windows(2).all(|w| w[0] < w[1])));
    }

    #[test]
    fn enumeration_is_restartable() {
        let mut subsets = ActivitySubsets::new(4);
        let first_three: Vec<Vec<usize>> = subsets.by_ref().take(3).collect();
        let snapshot = subsets.clone();
        let rest: Vec<Vec<usize>> = subsets.by_ref().collect();
        assert_eq!(snapshot.collect::<Vec<_>>(), rest);
        assert_eq!(subsets.next(), None);
        subsets.restart();
        assert_eq!(subsets.take(3).collect::<Vec<_>>(), first_three);
    }
}
