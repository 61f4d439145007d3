use serde::{Deserialize, Serialize};

/// A single trace: the ordered activity identifiers of one case
pub type Trace = Vec<String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
///
/// Tokenized event log: an ordered sequence of [`Trace`]s
///
/// Activity identifiers are opaque tokens, compared by exact string equality.
/// Only the order _inside_ a trace is meaningful to discovery.
///
pub struct TraceLog {
    /// Traces (one per case)
    pub traces: Vec<Trace>,
}

impl TraceLog {
    /// Create a new [`TraceLog`] with no traces
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a [`TraceLog`] from anything that can be turned into nested string sequences
    ///
    /// ```
    /// use alpha_miner::event_log::TraceLog;
    /// let log = TraceLog::from_traces(vec![vec!["a", "b"], vec!["a", "c"]]);
    /// assert_eq!(log.len(), 2);
    /// ```
    pub fn from_traces<T, I, S>(traces: T) -> Self
    where
        T: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            traces: traces
                .into_iter()
                .map(|t| t.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Append a trace
    pub fn push_trace(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    /// Number of traces
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// Whether the log contains no traces at all
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Total number of events over all traces
    pub fn num_events(&self) -> usize {
        self.traces.iter().map(Vec::len).sum()
    }
}

impl<S: Into<String>> FromIterator<Vec<S>> for TraceLog {
    fn from_iter<T: IntoIterator<Item = Vec<S>>>(iter: T) -> Self {
        Self::from_traces(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_and_count() {
        let mut log = TraceLog::from_traces(vec![vec!["a", "b", "c"], vec![]]);
        log.push_trace(vec!["d".to_string()]);
        assert_eq!(log.len(), 3);
        assert_eq!(log.num_events(), 4);
        assert!(!log.is_empty());
        assert!(TraceLog::new().is_empty());
    }

    #[test]
    fn collect_from_iterator() {
        let log: TraceLog = vec![vec!["x", "y"]].into_iter().collect();
        assert_eq!(log.traces, vec![vec!["x".to_string(), "y".to_string()]]);
    }
}
