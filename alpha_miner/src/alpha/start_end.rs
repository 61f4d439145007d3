use std::collections::HashSet;

use crate::event_log::activity_projection::EventLogActivityProjection;

/// Activities occurring first in at least one (non-empty) trace (`Ti`)
pub fn start_activities(log: &EventLogActivityProjection) -> HashSet<usize> {
    log.traces
        .iter()
        .filter_map(|(trace, _)| trace.first().copied())
        .collect()
}

/// Activities occurring last in at least one (non-empty) trace (`To`)
pub fn end_activities(log: &EventLogActivityProjection) -> HashSet<usize> {
    log.traces
        .iter()
        .filter_map(|(trace, _)| trace.last().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::event_log::trace_log::TraceLog;

    use super::*;

    #[test]
    fn start_and_end_skip_empty_traces() {
        let log = TraceLog::from_traces(vec![vec!["a", "b", "c"], vec![], vec!["b"]]);
        let proj: EventLogActivityProjection = (&log).into();
        assert_eq!(start_activities(&proj), HashSet::from([0, 1]));
        assert_eq!(end_activities(&proj), HashSet::from([2, 1]));
    }
}
