use std::{
    collections::HashSet,
    time::{SystemTime, UNIX_EPOCH},
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    event_log::{activity_projection::EventLogActivityProjection, trace_log::TraceLog},
    petri_net::petri_net_struct::{ArcType, Marking, PetriNet, TransitionID},
};

use super::{
    candidate_building::{derive_xl, CandidatePair, CandidateSet},
    candidate_maximality::derive_yl,
    error::AlphaError,
    footprint::{build_footprint, Footprint},
    start_end::{end_activities, start_activities},
};

/// Default cap on the number of distinct activities
///
/// With `n` mutually unrelated activities, `Xl` building checks `(2^n - 2)^2` subset pairs;
/// at 12 activities this is about 1.7e7 checks and finishes within seconds.
pub const DEFAULT_MAX_ALPHABET_SIZE: usize = 12;

/// Label of the source place of a discovered net
pub const START_PLACE: &str = "start";
/// Label of the sink place of a discovered net
pub const END_PLACE: &str = "end";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// What to do with an alphabet of at most one activity
pub enum DegenerateAlphabetPolicy {
    /// Return empty `Xl` and `Yl`
    #[default]
    EmptyResult,
    /// Fail with [`AlphaError::DegenerateAlphabet`]
    Fail,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
/// Algorithm parameters for Alpha discovery
pub struct AlphaConfig {
    /// Maximal number of distinct activities (`None`: no limit)
    ///
    /// Subset enumeration is exponential in the alphabet size.
    pub max_alphabet_size: Option<usize>,
    /// Handling of alphabets with at most one activity
    pub degenerate_alphabet: DegenerateAlphabetPolicy,
}

impl Default for AlphaConfig {
    fn default() -> Self {
        Self {
            max_alphabet_size: Some(DEFAULT_MAX_ALPHABET_SIZE),
            degenerate_alphabet: DegenerateAlphabetPolicy::default(),
        }
    }
}

impl AlphaConfig {
    /// Serialize Alpha parameters to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
    /// Deserialize Alpha parameters from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Duration (in seconds) per parts of the Alpha algorithm (+ total time)
pub struct AlgoDuration {
    /// Duration for building the footprint (in seconds)
    pub footprint: f32,
    /// Duration for building place candidates `Xl` (in seconds)
    pub cnd_building: f32,
    /// Duration for reducing candidates to maximal ones `Yl` (in seconds)
    pub cnd_maximality: f32,
    /// Duration for constructing Petri net (in seconds)
    pub build_net: f32,
    /// Total duration (in seconds)
    pub total: f32,
}

impl AlgoDuration {
    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Get current system time milliseconds
///
/// Falls back to `0` if the system clock is set before the UNIX epoch.
pub fn get_current_time_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

fn secs_since(start: u128, get_time_millis_fn: &dyn Fn() -> u128) -> f32 {
    get_time_millis_fn().saturating_sub(start) as f32 / 1000.0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
///
/// Result of Alpha discovery: footprint, start/end activities and the place candidates
///
/// All activity indices refer to [`Footprint::activities`].
///
pub struct AlphaResult {
    /// Footprint of the log
    pub footprint: Footprint,
    /// Start activities (`Ti`)
    pub start_activities: HashSet<usize>,
    /// End activities (`To`)
    pub end_activities: HashSet<usize>,
    /// All place candidates (`Xl`)
    pub xl: CandidateSet,
    /// Maximal place candidates (`Yl`)
    pub yl: CandidateSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// [`AlphaResult`] with activity names instead of indices (all lists sorted)
pub struct NamedAlphaResult {
    /// Activity alphabet
    pub activities: Vec<String>,
    /// Directly-follows relation
    pub directly_follows: Vec<(String, String)>,
    /// Causal relation
    pub causal: Vec<(String, String)>,
    /// Unrelated relation
    pub unrelated: Vec<(String, String)>,
    /// Parallel relation
    pub parallel: Vec<(String, String)>,
    /// Start activities (`Ti`)
    pub start_activities: Vec<String>,
    /// End activities (`To`)
    pub end_activities: Vec<String>,
    /// All place candidates (`Xl`)
    pub xl: Vec<(Vec<String>, Vec<String>)>,
    /// Maximal place candidates (`Yl`)
    pub yl: Vec<(Vec<String>, Vec<String>)>,
}

/// Helper function to transform place candidates to sorted lists of input and output activity names
pub fn cnds_to_names(footprint: &Footprint, cnds: &CandidateSet) -> Vec<(Vec<String>, Vec<String>)> {
    cnds.iter()
        .map(|(a, b)| (footprint.acts_to_names(a), footprint.acts_to_names(b)))
        .sorted()
        .collect()
}

fn fmt_cnd((a, b): &(Vec<String>, Vec<String>)) -> String {
    format!("({{{}}},{{{}}})", a.join(","), b.join(","))
}

impl AlphaResult {
    /// Convert to a [`NamedAlphaResult`]
    pub fn to_named(&self) -> NamedAlphaResult {
        let fp = &self.footprint;
        NamedAlphaResult {
            activities: fp.activities().to_vec(),
            directly_follows: fp.pairs_to_names(fp.directly_follows()),
            causal: fp.pairs_to_names(fp.causal()),
            unrelated: fp.pairs_to_names(fp.unrelated()),
            parallel: fp.pairs_to_names(fp.parallel()),
            start_activities: fp.act_set_to_names(&self.start_activities),
            end_activities: fp.act_set_to_names(&self.end_activities),
            xl: cnds_to_names(fp, &self.xl),
            yl: cnds_to_names(fp, &self.yl),
        }
    }

    /// Serialize (with activity names) to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_named())
    }

    /// `Yl` as sorted `(A, B)` name pairs
    pub fn yl_names(&self) -> Vec<(Vec<String>, Vec<String>)> {
        cnds_to_names(&self.footprint, &self.yl)
    }
}

impl std::fmt::Display for AlphaResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fp = &self.footprint;
        writeln!(
            f,
            "Ti set: ({})",
            fp.act_set_to_names(&self.start_activities).join(",")
        )?;
        writeln!(
            f,
            "To set: ({})",
            fp.act_set_to_names(&self.end_activities).join(",")
        )?;
        writeln!(
            f,
            "Xl set: ({})",
            cnds_to_names(fp, &self.xl).iter().map(fmt_cnd).join(",")
        )?;
        write!(
            f,
            "Yl set: ({})",
            cnds_to_names(fp, &self.yl).iter().map(fmt_cnd).join(",")
        )
    }
}

///
/// Run Alpha discovery on a [`TraceLog`]
///
/// Computes footprint, `Ti`, `To`, `Xl` and `Yl`.
///
pub fn alpha_discover(log: &TraceLog, config: &AlphaConfig) -> Result<AlphaResult, AlphaError> {
    let log_proj: EventLogActivityProjection = log.into();
    alpha_discover_with_timing_fn(&log_proj, config, &get_current_time_millis).map(|(res, _)| res)
}

/// Run Alpha discovery on an [`EventLogActivityProjection`]
///
/// Measures [`AlgoDuration`] using the passed `get_time_millis_fn` function
/// (`build_net` stays `0`).
pub fn alpha_discover_with_timing_fn(
    log_proj: &EventLogActivityProjection,
    config: &AlphaConfig,
    get_time_millis_fn: &dyn Fn() -> u128,
) -> Result<(AlphaResult, AlgoDuration), AlphaError> {
    let mut algo_dur = AlgoDuration::default();
    let total_start = get_time_millis_fn();

    let mut start = get_time_millis_fn();
    let footprint = build_footprint(log_proj)?;
    let start_activities = start_activities(log_proj);
    let end_activities = end_activities(log_proj);
    algo_dur.footprint = secs_since(start, get_time_millis_fn);
    info!(
        activities = footprint.num_activities(),
        secs = algo_dur.footprint,
        "Built footprint"
    );

    start = get_time_millis_fn();
    let xl = derive_xl(&footprint, config)?;
    algo_dur.cnd_building = secs_since(start, get_time_millis_fn);

    start = get_time_millis_fn();
    let yl = derive_yl(&xl);
    algo_dur.cnd_maximality = secs_since(start, get_time_millis_fn);

    algo_dur.total = secs_since(total_start, get_time_millis_fn);
    info!(
        xl = xl.len(),
        yl = yl.len(),
        secs = algo_dur.total,
        "Alpha discovery finished"
    );
    Ok((
        AlphaResult {
            footprint,
            start_activities,
            end_activities,
            xl,
            yl,
        },
        algo_dur,
    ))
}

///
/// Construct the workflow net of an [`AlphaResult`]
///
/// One transition per activity, one place per `Yl` candidate (labelled like `({a},{b,e})`),
/// plus a `start` place feeding all `Ti` activities and an `end` place fed by all `To` activities.
/// The initial marking puts one token on `start`, the final marking one token on `end`.
///
pub fn build_petri_net(result: &AlphaResult) -> PetriNet {
    let fp = &result.footprint;
    let mut pn = PetriNet::new();
    let transitions: Vec<TransitionID> = fp
        .activities()
        .iter()
        .map(|act| pn.add_transition(Some(act.clone()), None))
        .collect();

    let sorted_yl: Vec<&CandidatePair> = result
        .yl
        .iter()
        .sorted_by_key(|(a, b)| (fp.acts_to_names(a), fp.acts_to_names(b)))
        .collect();
    for (a, b) in sorted_yl {
        let label = fmt_cnd(&(fp.acts_to_names(a), fp.acts_to_names(b)));
        let place_id = pn.add_place(Some(label), None);
        for in_act in a {
            pn.add_arc(
                ArcType::transition_to_place(transitions[*in_act], place_id),
                None,
            );
        }
        for out_act in b {
            pn.add_arc(
                ArcType::place_to_transition(place_id, transitions[*out_act]),
                None,
            );
        }
    }

    let start_place = pn.add_place(Some(START_PLACE.to_string()), None);
    for act in result.start_activities.iter().sorted() {
        pn.add_arc(
            ArcType::place_to_transition(start_place, transitions[*act]),
            None,
        );
    }
    let end_place = pn.add_place(Some(END_PLACE.to_string()), None);
    for act in result.end_activities.iter().sorted() {
        pn.add_arc(
            ArcType::transition_to_place(transitions[*act], end_place),
            None,
        );
    }
    pn.initial_marking = Some(Marking::from([(start_place, 1)]));
    pn.final_markings = Some(vec![Marking::from([(end_place, 1)])]);
    info!(
        places = pn.places.len(),
        transitions = pn.transitions.len(),
        arcs = pn.arcs.len(),
        "Built Petri net"
    );
    pn
}

///
/// Discover a [`PetriNet`] using the Alpha algorithm
///
/// Additionally returns the durations for performance measurements
///
pub fn alpha_discover_petri_net(
    log: &TraceLog,
    config: &AlphaConfig,
) -> Result<(PetriNet, AlgoDuration), AlphaError> {
    let log_proj: EventLogActivityProjection = log.into();
    let (result, mut algo_dur) =
        alpha_discover_with_timing_fn(&log_proj, config, &get_current_time_millis)?;
    let start = get_current_time_millis();
    let pn = build_petri_net(&result);
    algo_dur.build_net = secs_since(start, &get_current_time_millis);
    algo_dur.total += algo_dur.build_net;
    Ok((pn, algo_dur))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_and_json() {
        let config = AlphaConfig::default();
        assert_eq!(config.max_alphabet_size, Some(DEFAULT_MAX_ALPHABET_SIZE));
        assert_eq!(
            config.degenerate_alphabet,
            DegenerateAlphabetPolicy::EmptyResult
        );
        let json = config.to_json().unwrap();
        assert_eq!(AlphaConfig::from_json(&json).unwrap(), config);
        let parsed = AlphaConfig::from_json(
            r#"{"max_alphabet_size":null,"degenerate_alphabet":"Fail"}"#,
        )
        .unwrap();
        assert_eq!(parsed.max_alphabet_size, None);
        assert_eq!(parsed.degenerate_alphabet, DegenerateAlphabetPolicy::Fail);
    }

    #[test]
    fn timing_uses_passed_clock() {
        let log = TraceLog::from_traces(vec![vec!["a", "b"]]);
        let (_, dur) =
            alpha_discover_with_timing_fn(&(&log).into(), &AlphaConfig::default(), &|| 42)
                .unwrap();
        assert_eq!(dur, AlgoDuration::default());
        assert!(dur.to_json().unwrap().contains("\"cnd_building\":0.0"));
    }

    #[test]
    fn candidate_names_are_sorted() {
        let log = TraceLog::from_traces(vec![vec!["b", "a"], vec!["b", "c"]]);
        let res = alpha_discover(&log, &AlphaConfig::default()).unwrap();
        assert_eq!(
            res.yl_names(),
            vec![(vec!["b".to_string()], vec!["a".to_string(), "c".to_string()])]
        );
        assert_eq!(fmt_cnd(&res.yl_names()[0]), "({b},{a,c})");
    }

    #[test]
    fn sequence_net() {
        let log = TraceLog::from_traces(vec![vec!["a", "b"]]);
        let (pn, _) = alpha_discover_petri_net(&log, &AlphaConfig::default()).unwrap();
        assert_eq!(pn.places.len(), 3);
        assert_eq!(pn.transitions.len(), 2);
        assert_eq!(pn.arcs.len(), 4);
        let start = pn.place_by_label(START_PLACE).unwrap();
        let end = pn.place_by_label(END_PLACE).unwrap();
        assert!(pn.is_in_initial_marking(&start));
        assert!(pn.is_in_a_final_marking(&end));
        assert_eq!(pn.transition_labels(&pn.postset_of_place(start)), vec!["a"]);
        assert_eq!(pn.transition_labels(&pn.preset_of_place(end)), vec!["b"]);
        let middle = pn.place_by_label("({a},{b})").unwrap();
        assert_eq!(pn.transition_labels(&pn.preset_of_place(middle)), vec!["a"]);
        assert_eq!(pn.transition_labels(&pn.postset_of_place(middle)), vec!["b"]);
    }
}
