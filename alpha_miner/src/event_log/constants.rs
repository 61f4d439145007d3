/// Common identifying field for event activity names (XES concept extension)
pub const ACTIVITY_NAME: &str = "concept:name";
/// Lifecycle phase of an event (XES lifecycle extension), e.g. `complete`
///
/// Joined with [`ACTIVITY_NAME`] to form activity identifiers by default
pub const LIFECYCLE_TRANSITION: &str = "lifecycle:transition";
/// Event timestamp (XES time extension)
pub const TIMESTAMP: &str = "time:timestamp";
/// Activity identifier used for events that carry none of the classifier keys
pub const NO_ACTIVITY: &str = "No Activity";
