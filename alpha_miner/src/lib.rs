#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]

#![doc = include_str!("../README.md")]

///
/// Event Logs ([`TraceLog`]) and their import from XES or plain text
///
pub mod event_log {
    /// Activity projection of event logs
    pub mod activity_projection;
    /// Constants
    pub mod constants;
    /// Plain text import (one trace per line)
    pub mod import_trace_log;
    /// XES Import
    pub mod import_xes;
    /// Log statistics (trace lengths, activity frequencies)
    pub mod statistics;
    /// [`TraceLog`] struct
    pub mod trace_log;

    pub use trace_log::{Trace, TraceLog};
    #[cfg(test)]
    mod tests;
}

///
/// Petri nets
///
pub mod petri_net {
    /// Export [`PetriNet`] to `.pnml`
    pub mod export_pnml;
    #[cfg(feature = "graphviz-export")]
    /// Export [`PetriNet`] to DOT and images (SVG, PNG, ...)
    ///
    /// __Requires the `graphviz-export` feature to be enabled__
    ///
    /// Image export also requires an active graphviz installation in the PATH.
    /// See also <https://github.com/besok/graphviz-rust?tab=readme-ov-file#caveats> and <https://graphviz.org/download/>
    pub mod image_export;
    /// [`PetriNet`] struct
    pub mod petri_net_struct;

    #[doc(inline)]
    pub use petri_net_struct::PetriNet;
}

///
/// Module for the classical Alpha Process Discovery algorithm
///
pub mod alpha {
    /// Place candidate building (`Xl`)
    pub mod candidate_building;
    /// Reduction of place candidates to maximal ones (`Yl`)
    pub mod candidate_maximality;
    /// Errors of Alpha discovery
    pub mod error;
    /// Footprint (ordering relations between activities)
    pub mod footprint;
    /// Full Alpha Discovery algorithm
    pub mod full;
    /// Start and end activities (`Ti`, `To`)
    pub mod start_end;
    /// Lazy enumeration of activity subsets
    pub mod subsets;
    #[cfg(test)]
    mod tests;
}

#[doc(inline)]
pub use alpha::full::alpha_discover;

#[doc(inline)]
pub use alpha::full::alpha_discover_petri_net;

#[doc(inline)]
pub use alpha::full::build_petri_net;

#[doc(inline)]
pub use alpha::full::AlphaConfig;

#[doc(inline)]
pub use alpha::full::AlphaResult;

#[doc(inline)]
pub use alpha::error::AlphaError;

#[doc(inline)]
pub use alpha::footprint::Footprint;

#[doc(inline)]
pub use event_log::trace_log::TraceLog;

#[doc(inline)]
pub use event_log::activity_projection::EventLogActivityProjection;

#[doc(inline)]
pub use event_log::import_trace_log::import_trace_log_file;

#[doc(inline)]
pub use event_log::import_trace_log::import_trace_log_str;

#[doc(inline)]
pub use event_log::import_xes::import_xes_file;

#[doc(inline)]
pub use event_log::import_xes::import_xes_slice;

#[doc(inline)]
pub use event_log::import_xes::import_xes_str;

#[doc(inline)]
pub use event_log::import_xes::XESImportOptions;

#[doc(inline)]
pub use event_log::statistics::LogStatistics;

#[doc(inline)]
pub use petri_net::petri_net_struct::PetriNet;

#[doc(inline)]
pub use petri_net::export_pnml::export_petri_net_to_pnml;

#[cfg(feature = "graphviz-export")]
#[doc(inline)]
pub use petri_net::image_export::export_petri_net_image_png;

#[cfg(feature = "graphviz-export")]
#[doc(inline)]
pub use petri_net::image_export::export_petri_net_image_svg;

#[cfg(feature = "graphviz-export")]
#[doc(inline)]
pub use petri_net::image_export::export_petri_net_to_dot;
