use std::collections::HashSet;

use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::event_log::{
    activity_projection::{ActivityProjectionDFG, EventLogActivityProjection},
    trace_log::TraceLog,
};

use super::error::AlphaError;

/// Ordered pair of activity indices
pub type ActivityPair = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
/// Footprint relation between two activities `a` and `b`
pub enum FootprintRelation {
    /// `a -> b`: `a` is directly followed by `b`, never the other way around
    Causal,
    /// `a <- b`: `b` is directly followed by `a`, never the other way around
    CausalInverse,
    /// `a || b`: directly-follows observed in both directions
    Parallel,
    /// `a # b`: never directly follow each other
    Unrelated,
}

impl FootprintRelation {
    /// Symbol used in footprint matrices
    pub fn symbol(&self) -> &'static str {
        match self {
            FootprintRelation::Causal => "->",
            FootprintRelation::CausalInverse => "<-",
            FootprintRelation::Parallel => "||",
            FootprintRelation::Unrelated => "#",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
///
/// Footprint of an event log: the activity alphabet and its four ordering relations
///
/// Built once by [`build_footprint`] and read-only afterwards. Activities are
/// referred to by their index in [`Footprint::activities`], which is sorted
/// and identical to the index of the [`EventLogActivityProjection`] it was built from.
///
/// For distinct activities `a` and `b` exactly one of `causal(a,b)`, `causal(b,a)`,
/// `unrelated(a,b)`, `parallel(a,b)` holds. Additionally, `unrelated` contains
/// `(a, a)` for every activity, and a self-loop `(a, a)` also shows up in `parallel`.
///
pub struct Footprint {
    activities: Vec<String>,
    directly_follows: HashSet<ActivityPair>,
    causal: HashSet<ActivityPair>,
    unrelated: HashSet<ActivityPair>,
    parallel: HashSet<ActivityPair>,
}

///
/// Build the [`Footprint`] of a projected event log
///
/// Fails with [`AlphaError::EmptyLog`] if the log has no traces or no activities.
///
pub fn build_footprint(log: &EventLogActivityProjection) -> Result<Footprint, AlphaError> {
    if log.traces.is_empty() || log.activities.is_empty() {
        return Err(AlphaError::EmptyLog);
    }
    let n = log.activities.len();
    let directly_follows: HashSet<ActivityPair> = ActivityProjectionDFG::from_event_log_projection(log)
        .edges
        .into_iter()
        .filter_map(|(df_pair, w)| if w > 0 { Some(df_pair) } else { None })
        .collect();
    let df = |a: usize, b: usize| directly_follows.contains(&(a, b));

    let causal: HashSet<ActivityPair> = directly_follows
        .iter()
        .filter(|&&(a, b)| !df(b, a))
        .copied()
        .collect();
    let unrelated: HashSet<ActivityPair> = (0..n)
        .cartesian_product(0..n)
        .filter(|&(a, b)| a == b || (!df(a, b) && !df(b, a)))
        .collect();
    let parallel: HashSet<ActivityPair> = (0..n)
        .cartesian_product(0..n)
        .filter(|&(a, b)| df(a, b) && df(b, a))
        .collect();

    debug!(
        activities = n,
        directly_follows = directly_follows.len(),
        causal = causal.len(),
        parallel = parallel.len(),
        "Built footprint"
    );
    Ok(Footprint {
        activities: log.activities.clone(),
        directly_follows,
        causal,
        unrelated,
        parallel,
    })
}

impl Footprint {
    /// Build the footprint of a [`TraceLog`] (via its [`EventLogActivityProjection`])
    pub fn from_log(log: &TraceLog) -> Result<Self, AlphaError> {
        build_footprint(&log.into())
    }

    /// Activity alphabet (sorted, index = activity id)
    pub fn activities(&self) -> &[String] {
        &self.activities
    }

    /// Size of the activity alphabet
    pub fn num_activities(&self) -> usize {
        self.activities.len()
    }

    /// Index of the activity with the given name
    pub fn index_of(&self, activity: &str) -> Option<usize> {
        self.activities
            .binary_search_by(|a| a.as_str().cmp(activity))
            .ok()
    }

    /// Directly-follows relation (`a > b`)
    pub fn directly_follows(&self) -> &HashSet<ActivityPair> {
        &self.directly_follows
    }

    /// Causal relation (`a -> b`)
    pub fn causal(&self) -> &HashSet<ActivityPair> {
        &self.causal
    }

    /// Unrelated relation (`a # b`), including all reflexive pairs
    pub fn unrelated(&self) -> &HashSet<ActivityPair> {
        &self.unrelated
    }

    /// Parallel relation (`a || b`)
    pub fn parallel(&self) -> &HashSet<ActivityPair> {
        &self.parallel
    }

    /// Whether `a -> b`
    pub fn is_causal(&self, a: usize, b: usize) -> bool {
        self.causal.contains(&(a, b))
    }

    /// Whether `a # b`
    pub fn is_unrelated(&self, a: usize, b: usize) -> bool {
        self.unrelated.contains(&(a, b))
    }

    /// Footprint relation between `a` and `b`
    pub fn relation(&self, a: usize, b: usize) -> FootprintRelation {
        if self.parallel.contains(&(a, b)) {
            FootprintRelation::Parallel
        } else if self.causal.contains(&(a, b)) {
            FootprintRelation::Causal
        } else if self.causal.contains(&(b, a)) {
            FootprintRelation::CausalInverse
        } else {
            FootprintRelation::Unrelated
        }
    }

    /// Map activity indices to their names (sorted)
    pub fn acts_to_names(&self, acts: &[usize]) -> Vec<String> {
        let mut ret: Vec<String> = acts
            .iter()
            .map(|act| self.activities[*act].clone())
            .collect();
        ret.sort();
        ret
    }

    /// Map a set of activity indices to sorted names
    pub fn act_set_to_names(&self, acts: &HashSet<usize>) -> Vec<String> {
        self.acts_to_names(&acts.iter().copied().collect_vec())
    }

    /// Map a relation to sorted pairs of activity names
    pub fn pairs_to_names(&self, pairs: &HashSet<ActivityPair>) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(a, b)| (self.activities[*a].clone(), self.activities[*b].clone()))
            .sorted()
            .collect()
    }

    /// Render the footprint as a matrix (rows: `a`, columns: `b`, cells: relation symbol)
    pub fn render_matrix(&self) -> String {
        let width = self
            .activities
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(2);
        let mut out = format!("{:width$}", "");
        for act in &self.activities {
            out.push_str(&format!(" | {act:width$}"));
        }
        for (a, act) in self.activities.iter().enumerate() {
            out.push('\n');
            out.push_str(&format!("{act:width$}"));
            for b in 0..self.activities.len() {
                out.push_str(&format!(" | {:width$}", self.relation(a, b).symbol()));
            }
        }
        out
    }
}

fn fmt_pairs(pairs: &[(String, String)]) -> String {
    pairs.iter().map(|(a, b)| format!("({a},{b})")).join(",")
}

impl std::fmt::Display for Footprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Seen activities: ({})", self.activities.join(","))?;
        writeln!(
            f,
            "Direct followers >: ({})",
            fmt_pairs(&self.pairs_to_names(&self.directly_follows))
        )?;
        writeln!(
            f,
            "Causally dependent ->: ({})",
            fmt_pairs(&self.pairs_to_names(&self.causal))
        )?;
        writeln!(
            f,
            "Unrelated #: ({})",
            fmt_pairs(&self.pairs_to_names(&self.unrelated))
        )?;
        write!(
            f,
            "Parallel ||: ({})",
            fmt_pairs(&self.pairs_to_names(&self.parallel))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footprint_of(traces: Vec<Vec<&str>>) -> Footprint {
        Footprint::from_log(&TraceLog::from_traces(traces)).unwrap()
    }

    #[test]
    fn relations_of_sequence() {
        let fp = footprint_of(vec![vec!["a", "b", "c"]]);
        let (a, b, c) = (0, 1, 2);
        assert_eq!(fp.index_of("c"), Some(c));
        assert_eq!(fp.index_of("z"), None);
        assert_eq!(fp.relation(a, b), FootprintRelation::Causal);
        assert_eq!(fp.relation(b, a), FootprintRelation::CausalInverse);
        assert_eq!(fp.relation(a, c), FootprintRelation::Unrelated);
        assert!(fp.is_unrelated(a, a));
        assert!(fp.is_causal(b, c));
        assert!(!fp.is_causal(c, b));
    }

    #[test]
    fn self_loop_is_parallel_and_reflexively_unrelated() {
        let fp = footprint_of(vec![vec!["a", "a", "b"]]);
        assert!(fp.directly_follows().contains(&(0, 0)));
        assert!(fp.parallel().contains(&(0, 0)));
        assert!(fp.unrelated().contains(&(0, 0)));
        assert!(!fp.causal().contains(&(0, 0)));
        assert!(fp.is_causal(0, 1));
    }

    #[test]
    fn empty_logs_are_rejected() {
        assert_eq!(
            Footprint::from_log(&TraceLog::new()),
            Err(AlphaError::EmptyLog)
        );
        assert_eq!(
            Footprint::from_log(&TraceLog::from_traces(vec![Vec::<&str>::new(), vec![]])),
            Err(AlphaError::EmptyLog)
        );
    }

    #[test]
    fn empty_traces_contribute_nothing() {
        let with_empty = footprint_of(vec![vec!["a", "b"], vec![]]);
        let without = footprint_of(vec![vec!["a", "b"]]);
        assert_eq!(with_empty, without);
    }

    #[test]
    fn display_and_matrix() {
        let fp = footprint_of(vec![vec!["a", "b", "c"], vec!["a", "c", "b"]]);
        let printed = fp.to_string();
        assert!(printed.contains("Seen activities: (a,b,c)"));
        assert!(printed.contains("Causally dependent ->: ((a,b),(a,c))"));
        assert!(printed.contains("Parallel ||: ((b,c),(c,b))"));
        let matrix = fp.render_matrix();
        assert_eq!(matrix.lines().count(), 4);
        assert!(matrix.lines().nth(2).unwrap().starts_with("b "));
        assert!(matrix.contains("||"));
    }
}
