//! Tag-driven capability table
//!
//! Which lazy accessors a term exposes depends on the tags of the document it
//! was built from. The table below maps tags to [`Capability`] groups and each
//! [`Accessor`] to the group it belongs to plus an optional guard tag that must
//! also be present before the accessor runs a query.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const CLASS_TAG: &str = "Class";
pub const INDIVIDUAL_TAG: &str = "Individual";
pub const TEMPLATE_TAG: &str = "Template";
pub const NEURON_TAG: &str = "Neuron";

pub const NBLAST_TAG: &str = "NBLAST";
pub const NBLAST_EXP_TAG: &str = "NBLASTexp";
pub const NEURONBRIDGE_TAG: &str = "neuronbridge";
pub const CONNECTIVITY_TAG: &str = "has_neuron_connectivity";

/// Anatomy tags whose members can contain neurons.
pub const NEURON_CONTAINING_ANATOMY_TAGS: &[&str] = &[
    "Synaptic_neuropil",
    "Synaptic_neuropil_domain",
    "Synaptic_neuropil_subdomain",
    "Synaptic_neuropil_block",
    "Neuron_projection_bundle",
    "Tract_or_nerve",
    "Ganglion",
    "Glomerulus",
];

/// A group of accessors installed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Class,
    Individual,
    Template,
    Neuron,
    NeuronContainingAnatomy,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Class,
        Capability::Individual,
        Capability::Template,
        Capability::Neuron,
        Capability::NeuronContainingAnatomy,
    ];

    /// Whether a term carrying `tags` has this capability.
    pub fn applies_to<S: AsRef<str>>(self, tags: &[S]) -> bool {
        let has = |tag: &str| tags.iter().any(|t| t.as_ref() == tag);
        match self {
            Capability::Class => has(CLASS_TAG),
            Capability::Individual => has(INDIVIDUAL_TAG),
            Capability::Template => has(TEMPLATE_TAG),
            Capability::Neuron => has(NEURON_TAG),
            Capability::NeuronContainingAnatomy => {
                NEURON_CONTAINING_ANATOMY_TAGS.iter().any(|t| has(*t))
            }
        }
    }
}

/// What an accessor yields once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Yield {
    Terms,
    Scores,
    Partners,
}

/// Every lazy accessor a term can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessor {
    Subtypes,
    Subparts,
    Children,
    Instances,
    Datasets,
    Regions,
    SimilarNeuronsNblast,
    SimilarNeuronsNeuronbridge,
    PotentialDriversNblast,
    PotentialDriversNeuronbridge,
    DownstreamPartners,
    UpstreamPartners,
    NeuronsThatOverlap,
    NeuronTypesThatOverlap,
    NeuronsWithSynapticTerminalsHere,
    NeuronTypesWithSynapticTerminalsHere,
    DownstreamNeurons,
    DownstreamNeuronTypes,
    UpstreamNeurons,
    UpstreamNeuronTypes,
}

impl Accessor {
    pub const ALL: [Accessor; 20] = [
        Accessor::Subtypes,
        Accessor::Subparts,
        Accessor::Children,
        Accessor::Instances,
        Accessor::Datasets,
        Accessor::Regions,
        Accessor::SimilarNeuronsNblast,
        Accessor::SimilarNeuronsNeuronbridge,
        Accessor::PotentialDriversNblast,
        Accessor::PotentialDriversNeuronbridge,
        Accessor::DownstreamPartners,
        Accessor::UpstreamPartners,
        Accessor::NeuronsThatOverlap,
        Accessor::NeuronTypesThatOverlap,
        Accessor::NeuronsWithSynapticTerminalsHere,
        Accessor::NeuronTypesWithSynapticTerminalsHere,
        Accessor::DownstreamNeurons,
        Accessor::DownstreamNeuronTypes,
        Accessor::UpstreamNeurons,
        Accessor::UpstreamNeuronTypes,
    ];

    pub fn capability(self) -> Capability {
        use Accessor::*;
        match self {
            Subtypes | Subparts | Children | Instances => Capability::Class,
            Datasets => Capability::Individual,
            Regions => Capability::Template,
            SimilarNeuronsNblast
            | SimilarNeuronsNeuronbridge
            | PotentialDriversNblast
            | PotentialDriversNeuronbridge
            | DownstreamPartners
            | UpstreamPartners => Capability::Neuron,
            NeuronsThatOverlap
            | NeuronTypesThatOverlap
            | NeuronsWithSynapticTerminalsHere
            | NeuronTypesWithSynapticTerminalsHere
            | DownstreamNeurons
            | DownstreamNeuronTypes
            | UpstreamNeurons
            | UpstreamNeuronTypes => Capability::NeuronContainingAnatomy,
        }
    }

    /// Secondary tag required before the accessor issues a query.
    pub fn guard_tag(self) -> Option<&'static str> {
        match self {
            Accessor::SimilarNeuronsNblast => Some(NBLAST_TAG),
            Accessor::SimilarNeuronsNeuronbridge | Accessor::PotentialDriversNeuronbridge => {
                Some(NEURONBRIDGE_TAG)
            }
            Accessor::PotentialDriversNblast => Some(NBLAST_EXP_TAG),
            Accessor::DownstreamPartners | Accessor::UpstreamPartners => Some(CONNECTIVITY_TAG),
            _ => None,
        }
    }

    pub fn yields(self) -> Yield {
        use Accessor::*;
        match self {
            SimilarNeuronsNblast
            | SimilarNeuronsNeuronbridge
            | PotentialDriversNblast
            | PotentialDriversNeuronbridge => Yield::Scores,
            DownstreamPartners | UpstreamPartners => Yield::Partners,
            _ => Yield::Terms,
        }
    }

    pub fn name(self) -> &'static str {
        use Accessor::*;
        match self {
            Subtypes => "subtypes",
            Subparts => "subparts",
            Children => "children",
            Instances => "instances",
            Datasets => "datasets",
            Regions => "regions",
            SimilarNeuronsNblast => "similar_neurons_nblast",
            SimilarNeuronsNeuronbridge => "similar_neurons_neuronbridge",
            PotentialDriversNblast => "potential_drivers_nblast",
            PotentialDriversNeuronbridge => "potential_drivers_neuronbridge",
            DownstreamPartners => "downstream_partners",
            UpstreamPartners => "upstream_partners",
            NeuronsThatOverlap => "neurons_that_overlap",
            NeuronTypesThatOverlap => "neuron_types_that_overlap",
            NeuronsWithSynapticTerminalsHere => "neurons_with_synaptic_terminals_here",
            NeuronTypesWithSynapticTerminalsHere => "neuron_types_with_synaptic_terminals_here",
            DownstreamNeurons => "downstream_neurons",
            DownstreamNeuronTypes => "downstream_neuron_types",
            UpstreamNeurons => "upstream_neurons",
            UpstreamNeuronTypes => "upstream_neuron_types",
        }
    }
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capabilities selected for one term, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet(Vec<Capability>);

impl CapabilitySet {
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        Self(
            Capability::ALL
                .into_iter()
                .filter(|c| c.applies_to(tags))
                .collect(),
        )
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Accessors to install: those of a selected capability whose guard tag,
    /// if any, is present in `tags`.
    pub fn accessors<S: AsRef<str>>(&self, tags: &[S]) -> Vec<Accessor> {
        Accessor::ALL
            .into_iter()
            .filter(|a| self.contains(a.capability()))
            .filter(|a| match a.guard_tag() {
                Some(guard) => tags.iter().any(|t| t.as_ref() == guard),
                None => true,
            })
            .collect()
    }
}
