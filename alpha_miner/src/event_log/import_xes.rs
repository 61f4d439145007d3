use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use flate2::bufread::GzDecoder;
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::{
    constants::{ACTIVITY_NAME, LIFECYCLE_TRANSITION, NO_ACTIVITY, TIMESTAMP},
    trace_log::{Trace, TraceLog},
};

///
/// Error encountered while parsing XES
///
#[derive(Debug, Error)]
pub enum XESImportError {
    /// IO error
    #[error("failed to read XES: {0}")]
    IOError(#[from] std::io::Error),
    /// XML error (e.g., incorrect XML format)
    #[error("failed to parse XES: {0}")]
    XMLParsingError(#[from] quick_xml::Error),
    /// Malformed attribute on an XML element
    #[error("failed to parse XES attribute: {0}")]
    XMLAttributeError(#[from] quick_xml::events::attributes::AttrError),
    /// There is no top-level `<log>`
    #[error("failed to parse XES: no top-level <log> tag")]
    NoTopLevelLog,
    /// An `<event>` was encountered outside of an open `<trace>`
    #[error("failed to parse XES: <event> outside of a <trace>")]
    EventOutsideTrace,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
///
/// Options for XES Import
///
/// The default classifier joins `concept:name` and `lifecycle:transition` with a single space
/// and orders events by `time:timestamp`.
///
pub struct XESImportOptions {
    /// Event attribute keys whose values make up the activity identifier (in order)
    ///
    /// Keys missing on an event are skipped; if none is present the event is labelled [`NO_ACTIVITY`]
    pub activity_keys: Vec<String>,
    /// Separator placed between the values of [`XESImportOptions::activity_keys`]
    pub activity_key_separator: String,
    /// Sort events via timestamp key before emitting the trace:
    /// * If None: No sorting (i.e., events are included in order of occurrence in the file)
    /// * If Some(key): stable sort on the parsed timestamp; events without a valid timestamp come first
    pub sort_events_with_timestamp_key: Option<String>,
    /// Optional date format to try first when parsing timestamps
    ///
    /// See <https://docs.rs/chrono/latest/chrono/format/strftime/index.html> for all available Specifiers.
    pub date_format: Option<String>,
}

impl Default for XESImportOptions {
    fn default() -> Self {
        Self {
            activity_keys: vec![ACTIVITY_NAME.to_string(), LIFECYCLE_TRANSITION.to_string()],
            activity_key_separator: " ".to_string(),
            sort_events_with_timestamp_key: Some(TIMESTAMP.to_string()),
            date_format: None,
        }
    }
}

/// String-valued attributes of one parsed event
type EventAttributes = HashMap<String, String>;

fn read_to_string(x: &[u8]) -> String {
    if let Ok(x_str) = std::str::from_utf8(x) {
        if let Ok(escaped) = quick_xml::escape::unescape(x_str) {
            return escaped.to_string();
        }
        return x_str.to_string();
    }
    String::from_utf8_lossy(x).to_string()
}

fn get_attribute_string(t: &BytesStart<'_>, key: &str) -> Result<Option<String>, XESImportError> {
    Ok(t.try_get_attribute(key)?
        .map(|attr| read_to_string(attr.value.as_ref())))
}

/// Store a `key`/`value` XES attribute tag on the currently open event (if any)
fn add_attribute_from_tag(
    t: &BytesStart<'_>,
    current_event: &mut Option<EventAttributes>,
) -> Result<(), XESImportError> {
    if let Some(event) = current_event.as_mut() {
        if let (Some(key), Some(value)) = (
            get_attribute_string(t, "key")?,
            get_attribute_string(t, "value")?,
        ) {
            event.insert(key, value);
        }
    }
    Ok(())
}

///
/// Parse a timestamp as found in XES files
///
/// Tries the custom format (if any), RFC 3339, `+0000`-style offsets and naive
/// date-times (assumed to be UTC).
///
pub fn parse_timestamp(time: &str, custom_format: Option<&str>) -> Option<DateTime<FixedOffset>> {
    if let Some(date_format) = custom_format {
        if let Ok(dt) = DateTime::parse_from_str(time, date_format) {
            return Some(dt);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(time, date_format) {
            return Some(dt.and_utc().into());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(time) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt);
    }
    ["%FT%T%.f", "%F %T%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(time, fmt).ok())
        .map(|dt| dt.and_utc().into())
}

///
/// Derive the activity identifier of an event from the configured classifier keys
///
pub fn activity_identity(event: &EventAttributes, options: &XESImportOptions) -> String {
    let parts: Vec<&str> = options
        .activity_keys
        .iter()
        .filter_map(|key| event.get(key).map(String::as_str))
        .collect();
    if parts.is_empty() {
        NO_ACTIVITY.to_string()
    } else {
        parts.join(&options.activity_key_separator)
    }
}

fn events_to_trace(mut events: Vec<EventAttributes>, options: &XESImportOptions) -> Trace {
    if let Some(ts_key) = &options.sort_events_with_timestamp_key {
        events.sort_by_cached_key(|e| {
            e.get(ts_key)
                .and_then(|ts| parse_timestamp(ts, options.date_format.as_deref()))
        });
    }
    events
        .iter()
        .map(|e| activity_identity(e, options))
        .collect()
}

/// Parse XES from the given reader into a [`TraceLog`]
///
/// Only string-valued event attributes are collected; global declarations and the
/// children of nested (list/container) attributes are skipped.
pub fn import_xes<T>(reader: T, options: &XESImportOptions) -> Result<TraceLog, XESImportError>
where
    T: BufRead,
{
    let mut reader = Reader::from_reader(reader);
    reader.config_mut().trim_text(true);
    let mut buf: Vec<u8> = Vec::new();

    let mut encountered_log = false;
    // Depth inside an element whose content is ignored (globals, nested attributes)
    let mut skip_depth: usize = 0;
    let mut current_trace: Option<Vec<EventAttributes>> = None;
    let mut current_event: Option<EventAttributes> = None;
    let mut log = TraceLog::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(t) => {
                if skip_depth > 0 {
                    skip_depth += 1;
                } else {
                    match t.name().as_ref() {
                        b"log" => encountered_log = true,
                        _ if !encountered_log => return Err(XESImportError::NoTopLevelLog),
                        b"global" => skip_depth = 1,
                        b"trace" => current_trace = Some(Vec::new()),
                        b"event" => {
                            if current_trace.is_none() {
                                return Err(XESImportError::EventOutsideTrace);
                            }
                            current_event = Some(EventAttributes::new());
                        }
                        _ => {
                            add_attribute_from_tag(&t, &mut current_event)?;
                            skip_depth = 1;
                        }
                    }
                }
            }
            Event::Empty(t) => {
                if skip_depth == 0 {
                    match t.name().as_ref() {
                        b"log" => encountered_log = true,
                        _ if !encountered_log => return Err(XESImportError::NoTopLevelLog),
                        b"trace" => log.push_trace(Vec::new()),
                        b"event" => match current_trace.as_mut() {
                            Some(events) => events.push(EventAttributes::new()),
                            None => return Err(XESImportError::EventOutsideTrace),
                        },
                        _ => add_attribute_from_tag(&t, &mut current_event)?,
                    }
                }
            }
            Event::End(t) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                } else {
                    match t.name().as_ref() {
                        b"event" => {
                            if let (Some(events), Some(event)) =
                                (current_trace.as_mut(), current_event.take())
                            {
                                events.push(event);
                            }
                        }
                        b"trace" => {
                            if let Some(events) = current_trace.take() {
                                log.push_trace(events_to_trace(events, options));
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !encountered_log {
        return Err(XESImportError::NoTopLevelLog);
    }
    info!(
        traces = log.len(),
        events = log.num_events(),
        "Imported XES event log"
    );
    Ok(log)
}

///
/// Import a XES [`TraceLog`] from a file path
///
/// Files ending in `.gz` are decompressed on the fly.
///
pub fn import_xes_file<P: AsRef<Path>>(
    path: P,
    options: &XESImportOptions,
) -> Result<TraceLog, XESImportError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    if path.to_string_lossy().ends_with(".gz") {
        debug!(?path, "Importing gzip-compressed XES");
        let dec = GzDecoder::new(BufReader::new(file));
        import_xes(BufReader::new(dec), options)
    } else {
        import_xes(BufReader::new(file), options)
    }
}

///
/// Import a XES [`TraceLog`] directly from a string
///
pub fn import_xes_str(xes_str: &str, options: &XESImportOptions) -> Result<TraceLog, XESImportError> {
    import_xes(xes_str.as_bytes(), options)
}

///
/// Import a XES [`TraceLog`] from a byte slice (&\[u8\])
///
/// * `is_compressed_gz`: Parse the passed `xes_data` as a compressed .gz archive
///
pub fn import_xes_slice(
    xes_data: &[u8],
    is_compressed_gz: bool,
    options: &XESImportOptions,
) -> Result<TraceLog, XESImportError> {
    if is_compressed_gz {
        let gz: GzDecoder<&[u8]> = GzDecoder::new(xes_data);
        return import_xes(BufReader::new(gz), options);
    }
    import_xes(xes_data, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_in_several_formats() {
        let rfc = parse_timestamp("2011-10-01T00:38:44.546+02:00", None).unwrap();
        let no_colon = parse_timestamp("2011-10-01T00:38:44.546+0200", None).unwrap();
        assert_eq!(rfc, no_colon);
        assert!(parse_timestamp("2023-10-06 09:30:21.890421", None).is_some());
        assert!(parse_timestamp("2022-01-09T15:00:00", None).is_some());
        assert!(parse_timestamp("01.02.2020 10:00", Some("%d.%m.%Y %H:%M")).is_some());
        assert!(parse_timestamp("yesterday", None).is_none());
    }

    #[test]
    fn activity_identity_joins_present_keys() {
        let options = XESImportOptions::default();
        let mut event = EventAttributes::new();
        assert_eq!(activity_identity(&event, &options), NO_ACTIVITY);
        event.insert(ACTIVITY_NAME.to_string(), "register".to_string());
        assert_eq!(activity_identity(&event, &options), "register");
        event.insert(LIFECYCLE_TRANSITION.to_string(), "complete".to_string());
        assert_eq!(activity_identity(&event, &options), "register complete");
    }
}
