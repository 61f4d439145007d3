use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
/// Place in a Petri net
pub struct Place {
    /// Optional place name (e.g., `start` or the candidate `({a},{b,e})` it was built from)
    pub label: Option<String>,
    id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
/// Transition in a Petri net
pub struct Transition {
    /// Transition label (None if this transition is _invisible_)
    pub label: Option<String>,
    id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", content = "nodes")]
/// Arc type in a Petri net
pub enum ArcType {
    /// From Place to Transition
    PlaceTransition(Uuid, Uuid),
    /// From Transition to Place
    TransitionPlace(Uuid, Uuid),
}

impl ArcType {
    /// Create new from place to transition
    pub fn place_to_transition(from: PlaceID, to: TransitionID) -> ArcType {
        ArcType::PlaceTransition(from.0, to.0)
    }
    /// Create new from transition to place
    pub fn transition_to_place(from: TransitionID, to: PlaceID) -> ArcType {
        ArcType::TransitionPlace(from.0, to.0)
    }
    /// Source and target node ids
    pub fn source_target(&self) -> (Uuid, Uuid) {
        match *self {
            ArcType::PlaceTransition(from, to) | ArcType::TransitionPlace(from, to) => (from, to),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Arc in a Petri net
///
/// Connecting a transition and a place (or the other way around)
pub struct Arc {
    /// Source and target of Arc
    pub from_to: ArcType,
    /// Weight (i.e., how many tokens this arc moves)
    pub weight: u32,
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize, Eq, Hash)]
/// Place ID
pub struct PlaceID(pub Uuid);
impl PlaceID {
    /// Get UUID
    pub fn get_uuid(self) -> Uuid {
        self.0
    }
}
impl From<&Place> for PlaceID {
    fn from(value: &Place) -> Self {
        PlaceID(value.id)
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize, Eq, Hash)]
/// Transition ID
pub struct TransitionID(pub Uuid);
impl From<&Transition> for TransitionID {
    fn from(value: &Transition) -> Self {
        TransitionID(value.id)
    }
}
impl TransitionID {
    /// Get  UUID
    pub fn get_uuid(self) -> Uuid {
        self.0
    }
}

/// Marking of a Petri net: Assigning [`PlaceID`]s to a number of tokens
pub type Marking = HashMap<PlaceID, u64>;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
///
/// A Petri net of [`Place`]s and [`Transition`]s
///
/// Bipartite graph of [`Place`]s and [`Transition`]s with [`Arc`]s connecting them, as well as initial and final [`Marking`]s
pub struct PetriNet {
    /// Places
    pub places: HashMap<Uuid, Place>,
    /// Transitions
    pub transitions: HashMap<Uuid, Transition>,
    /// Arcs
    pub arcs: Vec<Arc>,
    /// Initial marking
    pub initial_marking: Option<Marking>,
    /// Final markings (any of them are accepted as a final marking)
    pub final_markings: Option<Vec<Marking>>,
}

impl PetriNet {
    /// Create new [`PetriNet`] with no places or transitions
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Add a place with an optional label (and with an optional passed UUID)
    ///
    /// If no ID is passed, a new UUID will be generated
    pub fn add_place(&mut self, label: Option<String>, place_id: Option<Uuid>) -> PlaceID {
        let place_id = place_id.unwrap_or_else(Uuid::new_v4);
        self.places.insert(
            place_id,
            Place {
                label,
                id: place_id,
            },
        );
        PlaceID(place_id)
    }

    /// Add a transition with an label (and with an optional passed UUID)
    ///
    /// If no ID is passed, a new UUID will be generated
    pub fn add_transition(
        &mut self,
        label: Option<String>,
        transition_id: Option<Uuid>,
    ) -> TransitionID {
        let transition_id = transition_id.unwrap_or_else(Uuid::new_v4);
        self.transitions.insert(
            transition_id,
            Transition {
                id: transition_id,
                label,
            },
        );
        TransitionID(transition_id)
    }

    /// Add an arc (with weight 1 if none is passed)
    pub fn add_arc(&mut self, from_to: ArcType, weight: Option<u32>) {
        self.arcs.push(Arc {
            from_to,
            weight: weight.unwrap_or(1),
        });
    }

    /// Find the first place with the given label
    pub fn place_by_label(&self, label: &str) -> Option<PlaceID> {
        self.places
            .values()
            .find(|p| p.label.as_deref() == Some(label))
            .map(PlaceID::from)
    }

    /// Find the first transition with the given label
    pub fn transition_by_label(&self, label: &str) -> Option<TransitionID> {
        self.transitions
            .values()
            .find(|t| t.label.as_deref() == Some(label))
            .map(TransitionID::from)
    }

    /// Get the preset of a [`PetriNet`] place
    pub fn preset_of_place(&self, p: PlaceID) -> Vec<TransitionID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match x.from_to {
                ArcType::TransitionPlace(from, to) if to == p.0 => Some(TransitionID(from)),
                _ => None,
            })
            .collect()
    }

    /// Get the preset of [`PetriNet`] transition
    pub fn preset_of_transition(&self, t: TransitionID) -> Vec<PlaceID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match x.from_to {
                ArcType::PlaceTransition(from, to) if to == t.0 => Some(PlaceID(from)),
                _ => None,
            })
            .collect()
    }

    /// Get postset of [`PetriNet`] place
    pub fn postset_of_place(&self, p: PlaceID) -> Vec<TransitionID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match x.from_to {
                ArcType::PlaceTransition(from, to) if from == p.0 => Some(TransitionID(to)),
                _ => None,
            })
            .collect()
    }

    /// Get postset of [`PetriNet`] transition
    pub fn postset_of_transition(&self, t: TransitionID) -> Vec<PlaceID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match x.from_to {
                ArcType::TransitionPlace(from, to) if from == t.0 => Some(PlaceID(to)),
                _ => None,
            })
            .collect()
    }

    /// Check if place is in initial marking
    pub fn is_in_initial_marking(&self, p: &PlaceID) -> bool {
        self.initial_marking
            .as_ref()
            .is_some_and(|m| m.contains_key(p))
    }

    /// Check if place is in _any_ final marking
    pub fn is_in_a_final_marking(&self, p: &PlaceID) -> bool {
        self.final_markings
            .as_ref()
            .is_some_and(|ms| ms.iter().any(|m| m.contains_key(p)))
    }

    /// Labels of the transitions in the given list (sorted, invisible transitions skipped)
    pub fn transition_labels(&self, ts: &[TransitionID]) -> Vec<String> {
        let mut labels: Vec<String> = ts
            .iter()
            .filter_map(|t| self.transitions.get(&t.0).and_then(|t| t.label.clone()))
            .collect();
        labels.sort();
        labels
    }

    #[cfg(feature = "graphviz-export")]
    /// Render the Petri net as Graphviz DOT text
    ///
    /// Only available with the `graphviz-export` feature.
    pub fn to_dot(&self) -> String {
        super::image_export::export_petri_net_to_dot(self)
    }

    #[cfg(feature = "graphviz-export")]
    /// Export Petri net as a SVG image
    ///
    /// _Note_: This is an export method for __visualizing__ the Petri net.
    /// Requires an active graphviz installation in the PATH.
    ///
    /// Only available with the `graphviz-export` feature.
    pub fn export_svg<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), std::io::Error> {
        super::image_export::export_petri_net_image_svg(self, path)
    }

    /// Export Petri net to a PNML file
    ///
    /// The PNML file is written to the specified filepath
    pub fn export_pnml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), quick_xml::Error> {
        super::export_pnml::export_petri_net_to_pnml_path(self, path)
    }
}
