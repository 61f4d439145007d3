use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use thiserror::Error;
use tracing::debug;

use super::trace_log::TraceLog;

///
/// Error encountered while importing a line-oriented trace log
///
#[derive(Debug, Error)]
pub enum TraceLogImportError {
    /// IO error (e.g., file not found or invalid UTF-8 line)
    #[error("failed to read trace log: {0}")]
    IOError(#[from] std::io::Error),
}

///
/// Import a [`TraceLog`] from a line-oriented reader
///
/// Every line is one trace; activity identifiers are separated by whitespace.
/// Blank lines are kept as empty traces.
///
pub fn import_trace_log_reader<R: BufRead>(reader: R) -> Result<TraceLog, TraceLogImportError> {
    let mut log = TraceLog::new();
    for line in reader.lines() {
        let line = line?;
        log.push_trace(line.split_whitespace().map(str::to_string).collect());
    }
    debug!(traces = log.len(), events = log.num_events(), "Imported trace log");
    Ok(log)
}

///
/// Import a [`TraceLog`] directly from a string
///
pub fn import_trace_log_str(log_str: &str) -> Result<TraceLog, TraceLogImportError> {
    import_trace_log_reader(log_str.as_bytes())
}

///
/// Import a [`TraceLog`] from a file path
///
pub fn import_trace_log_file<P: AsRef<Path>>(path: P) -> Result<TraceLog, TraceLogImportError> {
    let file = File::open(path)?;
    import_trace_log_reader(BufReader::new(file))
}
