use std::collections::{BTreeSet, HashMap};

use rayon::prelude::*;

use super::trace_log::TraceLog;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Projection of a [`TraceLog`] onto dense activity indices
///
/// Activities are sorted, so the index of an activity does not depend on the
/// order in which traces were presented. Identical traces are collapsed into
/// one variant with a frequency.
pub struct EventLogActivityProjection {
    /// Activity names, index = activity id
    pub activities: Vec<String>,
    /// Reverse lookup from name to index
    pub act_to_index: HashMap<String, usize>,
    /// Trace variants with their frequency (sorted by variant)
    pub traces: Vec<(Vec<usize>, u64)>,
}

#[derive(Debug, Default, Clone)]
/// Weighted directly-follows graph over the indices of an [`EventLogActivityProjection`]
pub struct ActivityProjectionDFG {
    /// Activity indices
    pub nodes: Vec<usize>,
    /// `(a, b) => w`: `a` was directly followed by `b` in `w` cases
    pub edges: HashMap<(usize, usize), u64>,
}

impl ActivityProjectionDFG {
    /// Frequency of the directly-follows relation between `a` and `b` (0 if never observed)
    pub fn df_between(&self, a: usize, b: usize) -> u64 {
        *self.edges.get(&(a, b)).unwrap_or(&0)
    }

    /// Construct the DFG of a projected log
    pub fn from_event_log_projection(log: &EventLogActivityProjection) -> Self {
        let edges = log
            .traces
            .par_iter()
            .flat_map_iter(|(t, w)| t.windows(2).map(move |pair| ((pair[0], pair[1]), *w)))
            .fold(HashMap::<(usize, usize), u64>::new, |mut map, (df_pair, w)| {
                *map.entry(df_pair).or_insert(0) += w;
                map
            })
            .reduce(HashMap::new, |mut m1, m2| {
                for (k, v) in m2 {
                    *m1.entry(k).or_default() += v;
                }
                m1
            });
        ActivityProjectionDFG {
            nodes: (0..log.activities.len()).collect(),
            edges,
        }
    }
}

impl From<&TraceLog> for EventLogActivityProjection {
    fn from(val: &TraceLog) -> Self {
        let activity_set: BTreeSet<&String> = val.traces.iter().flatten().collect();
        let activities: Vec<String> = activity_set.into_iter().cloned().collect();
        let act_to_index: HashMap<String, usize> = activities
            .iter()
            .enumerate()
            .map(|(i, act)| (act.clone(), i))
            .collect();
        let mut variants: HashMap<Vec<usize>, u64> = HashMap::new();
        val.traces
            .par_iter()
            .map(|t| -> Vec<usize> { t.iter().map(|act| act_to_index[act]).collect() })
            .collect::<Vec<_>>()
            .into_iter()
            .for_each(|trace| {
                *variants.entry(trace).or_insert(0) += 1;
            });
        let mut traces: Vec<(Vec<usize>, u64)> = variants.into_iter().collect();
        traces.sort();

        EventLogActivityProjection {
            activities,
            act_to_index,
            traces,
        }
    }
}

impl From<TraceLog> for EventLogActivityProjection {
    fn from(val: TraceLog) -> Self {
        (&val).into()
    }
}

impl EventLogActivityProjection {
    /// Map activity indices to their names (sorted)
    pub fn acts_to_names(&self, acts: &[usize]) -> Vec<String> {
        let mut ret: Vec<String> = acts
            .iter()
            .map(|act| self.activities[*act].clone())
            .collect();
        ret.sort();
        ret
    }

    /// Number of cases (sum of all variant frequencies)
    pub fn num_cases(&self) -> u64 {
        self.traces.iter().map(|(_, w)| w).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_is_independent_of_trace_order() {
        let log1 = TraceLog::from_traces(vec![vec!["b", "c"], vec!["a", "b"], vec!["a", "b"]]);
        let log2 = TraceLog::from_traces(vec![vec!["a", "b"], vec!["b", "c"], vec!["a", "b"]]);
        let p1: EventLogActivityProjection = (&log1).into();
        let p2: EventLogActivityProjection = (&log2).into();
        assert_eq!(p1, p2);
        assert_eq!(p1.activities, vec!["a", "b", "c"]);
        assert_eq!(p1.traces, vec![(vec![0, 1], 2), (vec![1, 2], 1)]);
        assert_eq!(p1.num_cases(), 3);
    }

    #[test]
    fn dfg_counts_weighted_pairs() {
        let log = TraceLog::from_traces(vec![vec!["a", "b", "a", "b"], vec!["a", "b"], vec![]]);
        let proj: EventLogActivityProjection = (&log).into();
        let dfg = ActivityProjectionDFG::from_event_log_projection(&proj);
        assert_eq!(dfg.nodes, vec![0, 1]);
        assert_eq!(dfg.df_between(0, 1), 3);
        assert_eq!(dfg.df_between(1, 0), 1);
        assert_eq!(dfg.df_between(0, 0), 0);
        assert_eq!(proj.acts_to_names(&[1, 0]), vec!["a", "b"]);
    }
}
