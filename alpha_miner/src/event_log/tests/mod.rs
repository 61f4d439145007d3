use crate::{
    event_log::{import_trace_log::import_trace_log_str, statistics::LogStatistics},
    TraceLog,
};


#[test]
fn test_text_log_fixture() {
    let log = import_trace_log_str(include_str!("./test_data/L1.txt")).unwrap();
    assert_eq!(
        log,
        TraceLog::from_traces(vec![
            vec!["a", "b", "c", "d"],
            vec!["a", "c", "b", "d"],
            vec!["a", "e", "d"],
        ])
    );
    let stats = LogStatistics::from_log(&log);
    assert_eq!(stats.num_events, 11);
    assert_eq!(stats.num_activities, 5);
    assert_eq!(stats.shortest_trace, 3);
}
