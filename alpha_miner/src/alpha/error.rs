use thiserror::Error;

///
/// Error encountered while running Alpha discovery
///
/// Discovery is deterministic, so none of these are worth retrying with the same input.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AlphaError {
    /// The log contains no traces, or no trace contains any activity
    #[error("event log is empty: discovery needs at least one activity")]
    EmptyLog,
    /// The alphabet has fewer than two activities, so there are no subsets of size `1..n-1`
    ///
    /// Only raised under [`DegenerateAlphabetPolicy::Fail`](super::full::DegenerateAlphabetPolicy::Fail)
    #[error("degenerate activity alphabet of size {size}: candidate places need at least two activities")]
    DegenerateAlphabet {
        /// Number of distinct activities in the log
        size: usize,
    },
    /// The alphabet is larger than the configured cap; subset enumeration was not started
    #[error("activity alphabet of size {size} exceeds the configured limit of {limit}")]
    ResourceLimitExceeded {
        /// Number of distinct activities in the log
        size: usize,
        /// Configured maximum alphabet size
        limit: usize,
    },
}
