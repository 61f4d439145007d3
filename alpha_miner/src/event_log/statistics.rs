use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::trace_log::TraceLog;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Basic size statistics of a [`TraceLog`]
pub struct LogStatistics {
    /// Number of cases (traces)
    pub num_cases: usize,
    /// Number of events over all cases
    pub num_events: usize,
    /// Number of distinct activities
    pub num_activities: usize,
    /// Length of the longest trace (0 for an empty log)
    pub longest_trace: usize,
    /// Length of the shortest trace (0 for an empty log)
    pub shortest_trace: usize,
    /// Mean trace length (0.0 for an empty log)
    pub mean_trace_length: f64,
}

impl LogStatistics {
    /// Compute statistics of a log
    pub fn from_log(log: &TraceLog) -> Self {
        let num_events = log.num_events();
        let activities: HashSet<&String> = log.traces.iter().flatten().collect();
        let lengths = log.traces.iter().map(Vec::len);
        Self {
            num_cases: log.len(),
            num_events,
            num_activities: activities.len(),
            longest_trace: lengths.clone().max().unwrap_or(0),
            shortest_trace: lengths.min().unwrap_or(0),
            mean_trace_length: if log.is_empty() {
                0.0
            } else {
                num_events as f64 / log.len() as f64
            },
        }
    }
}

impl std::fmt::Display for LogStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Number of cases: {}", self.num_cases)?;
        writeln!(f, "Number of activities: {}", self.num_activities)?;
        writeln!(f, "Number of events: {}", self.num_events)?;
        writeln!(f, "Length of longest case: {}", self.longest_trace)?;
        writeln!(f, "Length of shortest case: {}", self.shortest_trace)?;
        write!(f, "Average length of case: {:.1}", self.mean_trace_length)
    }
}

///
/// Count activity occurrences
///
/// * `case_count`: if true, count the number of cases in which an activity appears
///   (instead of its total number of occurrences)
///
pub fn activity_frequencies(log: &TraceLog, case_count: bool) -> BTreeMap<String, usize> {
    let mut freq: BTreeMap<String, usize> = BTreeMap::new();
    for trace in &log.traces {
        if case_count {
            let acts: HashSet<&String> = trace.iter().collect();
            for act in acts {
                *freq.entry(act.clone()).or_default() += 1;
            }
        } else {
            for act in trace {
                *freq.entry(act.clone()).or_default() += 1;
            }
        }
    }
    freq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_of_small_log() {
        let log = TraceLog::from_traces(vec![vec!["a", "b", "a"], vec!["c"], vec![]]);
        let stats = LogStatistics::from_log(&log);
        assert_eq!(stats.num_cases, 3);
        assert_eq!(stats.num_events, 4);
        assert_eq!(stats.num_activities, 3);
        assert_eq!(stats.longest_trace, 3);
        assert_eq!(stats.shortest_trace, 0);
        assert!((stats.mean_trace_length - 4.0 / 3.0).abs() < 1e-9);
        assert!(stats.to_string().contains("Number of cases: 3"));
    }

    #[test]
    fn statistics_of_empty_log() {
        let stats = LogStatistics::from_log(&TraceLog::new());
        assert_eq!(stats.num_cases, 0);
        assert_eq!(stats.longest_trace, 0);
        assert_eq!(stats.mean_trace_length, 0.0);
    }

    #[test]
    fn frequencies_by_occurrence_and_by_case() {
        let log = TraceLog::from_traces(vec![vec!["a", "b", "a"], vec!["a"]]);
        let occ = activity_frequencies(&log, false);
        assert_eq!(occ["a"], 3);
        assert_eq!(occ["b"], 1);
        let cases = activity_frequencies(&log, true);
        assert_eq!(cases["a"], 2);
        assert_eq!(cases["b"], 1);
    }
}
