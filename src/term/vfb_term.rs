//! The composite term: assembled document plus tag-selected lazy accessors

use super::capability::{Accessor, Capability, CapabilitySet, Yield, CLASS_TAG};
use super::collection::VfbTerms;
use super::lazy::Lazy;
use super::score::{score_columns, Partner, Score};
use crate::backend::{queries, Direction, DlQueryKind, SimilarityMethod};
use crate::client::{ErrorKind, SessionHandle, VfbConnect, VfbResult};
use crate::resolve::ids::{
    HAS_POSTSYNAPTIC_TERMINAL_IN, HAS_PRESYNAPTIC_TERMINAL_IN, HAS_SYNAPTIC_TERMINALS_IN, NEURON,
    OVERLAPS, PART_OF,
};
use crate::schema::{Relations, Summary, TermData};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage for one installed accessor.
enum Slot {
    Terms(Lazy<VfbTerms>),
    Scores(Lazy<Vec<Score>>),
    Partners(Lazy<Vec<Partner>>),
}

impl Slot {
    fn for_accessor(accessor: Accessor) -> Self {
        match accessor.yields() {
            Yield::Terms => Slot::Terms(Lazy::new()),
            Yield::Scores => Slot::Scores(Lazy::new()),
            Yield::Partners => Slot::Partners(Lazy::new()),
        }
    }

    fn is_loaded(&self) -> bool {
        match self {
            Slot::Terms(cell) => cell.is_loaded(),
            Slot::Scores(cell) => cell.is_loaded(),
            Slot::Partners(cell) => cell.is_loaded(),
        }
    }

    fn reset(&self) {
        match self {
            Slot::Terms(cell) => cell.reset(),
            Slot::Scores(cell) => cell.reset(),
            Slot::Partners(cell) => cell.reset(),
        }
    }
}

/// A loaded term: its tree and the accessors its tags selected.
///
/// The slot map is fixed at construction. An accessor missing from it is not
/// applicable to this term.
struct Materialized {
    data: Arc<TermData>,
    capabilities: CapabilitySet,
    slots: HashMap<Accessor, Slot>,
}

impl Materialized {
    fn new(data: TermData) -> Self {
        let capabilities = CapabilitySet::from_tags(data.tags());
        let slots = capabilities
            .accessors(data.tags())
            .into_iter()
            .map(|a| (a, Slot::for_accessor(a)))
            .collect();
        Self {
            data: Arc::new(data),
            capabilities,
            slots,
        }
    }
}

struct TermInner {
    id: String,
    session: SessionHandle,
    state: Lazy<Arc<Materialized>>,
}

/// A knowledge-base entity.
///
/// Cloning is cheap and clones share state: loading a clone loads them all.
/// A term is either built from a fetched document or deferred, in which case
/// only the id is known until something reads the term.
#[derive(Clone)]
pub struct VfbTerm {
    inner: Arc<TermInner>,
}

/// DL relation and query kind for each overlap/connectivity accessor.
fn overlap_query(accessor: Accessor) -> Option<(&'static str, DlQueryKind)> {
    use Accessor::*;
    Some(match accessor {
        NeuronsThatOverlap => (OVERLAPS, DlQueryKind::Instances),
        NeuronTypesThatOverlap => (OVERLAPS, DlQueryKind::Subclasses),
        NeuronsWithSynapticTerminalsHere => (HAS_SYNAPTIC_TERMINALS_IN, DlQueryKind::Instances),
        NeuronTypesWithSynapticTerminalsHere => (HAS_SYNAPTIC_TERMINALS_IN, DlQueryKind::Subclasses),
        DownstreamNeurons => (HAS_PRESYNAPTIC_TERMINAL_IN, DlQueryKind::Instances),
        DownstreamNeuronTypes => (HAS_PRESYNAPTIC_TERMINAL_IN, DlQueryKind::Subclasses),
        UpstreamNeurons => (HAS_POSTSYNAPTIC_TERMINAL_IN, DlQueryKind::Instances),
        UpstreamNeuronTypes => (HAS_POSTSYNAPTIC_TERMINAL_IN, DlQueryKind::Subclasses),
        _ => return None,
    })
}

fn dedup_ids(ids: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

impl VfbTerm {
    pub(crate) fn deferred(id: impl Into<String>, session: SessionHandle) -> Self {
        Self {
            inner: Arc::new(TermInner {
                id: id.into(),
                session,
                state: Lazy::new(),
            }),
        }
    }

    pub(crate) fn hydrated(data: TermData, session: SessionHandle) -> Self {
        Self {
            inner: Arc::new(TermInner {
                id: data.id().to_string(),
                session,
                state: Lazy::loaded(Arc::new(Materialized::new(data))),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Whether the document has been fetched.
    pub fn is_loaded(&self) -> bool {
        self.inner.state.is_loaded()
    }

    /// Install an already-fetched document; no-op when loaded.
    pub(crate) fn fill(&self, data: TermData) {
        let _ = self
            .inner
            .state
            .get_or_try_load(|| Ok::<_, Infallible>(Arc::new(Materialized::new(data))));
    }

    pub(crate) fn session(&self) -> VfbResult<VfbConnect> {
        self.inner.session.upgrade()
    }

    fn materialized(&self) -> VfbResult<Arc<Materialized>> {
        self.inner.state.get_or_try_load(|| {
            debug!(id = %self.inner.id, "loading deferred term");
            let session = self.session()?;
            let data = session.fetch_one(&self.inner.id)?;
            Ok(Arc::new(Materialized::new(data)))
        })
    }

    /// The assembled document, fetching it on first use.
    pub fn data(&self) -> VfbResult<Arc<TermData>> {
        Ok(self.materialized()?.data.clone())
    }

    pub fn name(&self) -> VfbResult<String> {
        Ok(self.data()?.name().to_string())
    }

    pub fn tags(&self) -> VfbResult<Vec<String>> {
        Ok(self.data()?.tags().to_vec())
    }

    pub fn has_tag(&self, tag: &str) -> VfbResult<bool> {
        Ok(self.data()?.has_tag(tag))
    }

    pub fn relations(&self) -> VfbResult<Relations> {
        Ok(self.data()?.relations.clone())
    }

    pub fn summary(&self) -> VfbResult<Summary> {
        Ok(self.data()?.summary())
    }

    pub fn capabilities(&self) -> VfbResult<CapabilitySet> {
        Ok(self.materialized()?.capabilities.clone())
    }

    pub fn has_capability(&self, capability: Capability) -> VfbResult<bool> {
        Ok(self.materialized()?.capabilities.contains(capability))
    }

    /// Accessors installed on this term, in table order.
    pub fn accessors(&self) -> VfbResult<Vec<Accessor>> {
        let m = self.materialized()?;
        Ok(Accessor::ALL
            .into_iter()
            .filter(|a| m.slots.contains_key(a))
            .collect())
    }

    pub fn has_accessor(&self, accessor: Accessor) -> VfbResult<bool> {
        Ok(self.materialized()?.slots.contains_key(&accessor))
    }

    /// `Some(loaded)` for an installed accessor, `None` otherwise.
    pub fn is_accessor_loaded(&self, accessor: Accessor) -> VfbResult<Option<bool>> {
        Ok(self.materialized()?.slots.get(&accessor).map(Slot::is_loaded))
    }

    /// Parent types as deferred terms.
    pub fn parents(&self) -> VfbResult<VfbTerms> {
        let data = self.data()?;
        Ok(self.session()?.terms_for_ids(&data.parent_ids()))
    }

    /// Relationship targets, optionally limited to one relation label.
    pub fn related_terms(&self, relation: Option<&str>) -> VfbResult<VfbTerms> {
        let data = self.data()?;
        let ids = match relation {
            Some(label) => data.relations.by_label(label).target_ids(),
            None => data.relations.target_ids(),
        };
        Ok(self.session()?.terms_for_ids(&dedup_ids(ids)))
    }

    /// Drop the document and every computed accessor; the next read refetches.
    pub fn force_reload(&self) {
        debug!(id = %self.inner.id, "force reload");
        self.inner.state.reset();
    }

    /// Forget one accessor's result so the next read recomputes it.
    pub fn reload_accessor(&self, accessor: Accessor) -> VfbResult<()> {
        if let Some(slot) = self.materialized()?.slots.get(&accessor) {
            slot.reset();
        }
        Ok(())
    }

    fn load_soft<T: Clone + Default>(
        &self,
        cell: &Lazy<T>,
        accessor: Accessor,
        load: impl FnOnce() -> VfbResult<T>,
    ) -> VfbResult<T> {
        match cell.get_or_try_load(load) {
            Err(err) if err.kind() == ErrorKind::Transport => {
                warn!(
                    kind = %ErrorKind::Transport,
                    id = %self.inner.id,
                    accessor = %accessor,
                    error = %err,
                    "accessor query failed, returning empty result"
                );
                Ok(T::default())
            }
            other => other,
        }
    }

    /// Term-valued accessor; `None` when not installed on this term.
    pub fn terms(&self, accessor: Accessor) -> VfbResult<Option<VfbTerms>> {
        let m = self.materialized()?;
        let Some(Slot::Terms(cell)) = m.slots.get(&accessor) else {
            return Ok(None);
        };
        self.load_soft(cell, accessor, || self.compute_terms(accessor, &m))
            .map(Some)
    }

    /// Load a term-valued accessor without softening failures, so a caller
    /// building on it fails (and stays unloaded) too.
    fn load_strict(&self, m: &Materialized, accessor: Accessor) -> VfbResult<VfbTerms> {
        match m.slots.get(&accessor) {
            Some(Slot::Terms(cell)) => cell.get_or_try_load(|| self.compute_terms(accessor, m)),
            _ => Ok(VfbTerms::default()),
        }
    }

    /// Score-valued accessor; `None` when not installed on this term.
    pub fn scores(&self, accessor: Accessor) -> VfbResult<Option<Vec<Score>>> {
        let m = self.materialized()?;
        let Some(Slot::Scores(cell)) = m.slots.get(&accessor) else {
            return Ok(None);
        };
        self.load_soft(cell, accessor, || self.compute_scores(accessor))
            .map(Some)
    }

    /// Partner-valued accessor; `None` when not installed on this term.
    pub fn partners(&self, accessor: Accessor) -> VfbResult<Option<Vec<Partner>>> {
        let m = self.materialized()?;
        let Some(Slot::Partners(cell)) = m.slots.get(&accessor) else {
            return Ok(None);
        };
        self.load_soft(cell, accessor, || self.compute_partners(accessor))
            .map(Some)
    }

    fn compute_terms(&self, accessor: Accessor, m: &Materialized) -> VfbResult<VfbTerms> {
        let data = &m.data;
        let session = self.session()?;
        let own = session.dl_term(self.id());
        match accessor {
            Accessor::Subtypes => session.dl_terms(DlQueryKind::Subclasses, &own),
            Accessor::Subparts => {
                let expression = format!("{} some {}", session.dl_term(PART_OF), own);
                session.dl_terms(DlQueryKind::Subclasses, &expression)
            }
            Accessor::Children => {
                let subtypes = self.load_strict(m, Accessor::Subtypes)?;
                let subparts = self.load_strict(m, Accessor::Subparts)?;
                Ok(subtypes.union(&subparts))
            }
            Accessor::Instances => session.dl_terms(DlQueryKind::Instances, &own),
            Accessor::Datasets => Ok(session.terms_for_ids(&data.dataset_ids())),
            Accessor::Regions => Ok(session.terms_for_ids(&data.region_ids())),
            other => match overlap_query(other) {
                Some((relation, kind)) => self.overlap_terms(&session, data, relation, kind),
                None => Ok(VfbTerms::default()),
            },
        }
    }

    /// Id the anatomy queries run against: the term itself when it is a
    /// class, otherwise its first parent type.
    fn anatomy_anchor(&self, data: &TermData) -> Option<String> {
        if data.has_tag(CLASS_TAG) {
            return Some(self.id().to_string());
        }
        data.parents.first().map(|p| p.short_form.clone())
    }

    fn overlap_terms(
        &self,
        session: &VfbConnect,
        data: &TermData,
        relation: &str,
        kind: DlQueryKind,
    ) -> VfbResult<VfbTerms> {
        let Some(anchor) = self.anatomy_anchor(data) else {
            warn!(
                kind = %ErrorKind::EmptyResult,
                id = %self.inner.id,
                "individual has no parent type to query anatomy on"
            );
            return Ok(VfbTerms::default());
        };
        let expression = format!(
            "{} and {} some {}",
            session.dl_term(NEURON),
            session.dl_term(relation),
            session.dl_term(&anchor)
        );
        session.dl_terms(kind, &expression)
    }

    fn compute_scores(&self, accessor: Accessor) -> VfbResult<Vec<Score>> {
        let session = self.session()?;
        let (statement, method) = match accessor {
            Accessor::SimilarNeuronsNblast => (
                queries::similar_neurons(self.id(), SimilarityMethod::Nblast),
                SimilarityMethod::Nblast,
            ),
            Accessor::SimilarNeuronsNeuronbridge => (
                queries::similar_neurons(self.id(), SimilarityMethod::Neuronbridge),
                SimilarityMethod::Neuronbridge,
            ),
            Accessor::PotentialDriversNblast => (
                queries::potential_drivers(self.id(), SimilarityMethod::Nblast),
                SimilarityMethod::Nblast,
            ),
            Accessor::PotentialDriversNeuronbridge => (
                queries::potential_drivers(self.id(), SimilarityMethod::Neuronbridge),
                SimilarityMethod::Neuronbridge,
            ),
            _ => return Ok(Vec::new()),
        };
        let rows = session.run_query(&statement)?;
        Ok(score_columns(&rows, "score")
            .into_iter()
            .map(|(id, score)| Score::new(session.term_for_id(&id), score, method))
            .collect())
    }

    fn compute_partners(&self, accessor: Accessor) -> VfbResult<Vec<Partner>> {
        let direction = match accessor {
            Accessor::DownstreamPartners => Direction::Downstream,
            Accessor::UpstreamPartners => Direction::Upstream,
            _ => return Ok(Vec::new()),
        };
        let session = self.session()?;
        let rows = session.run_query(&queries::partners(self.id(), direction))?;
        Ok(rows
            .iter()
            .filter_map(|row| Some((row.get_str("id")?, row.get_i64("weight")?)))
            .map(|(id, weight)| Partner::new(session.term_for_id(id), weight, direction))
            .collect())
    }

    pub fn subtypes(&self) -> VfbResult<Option<VfbTerms>> {
        self.terms(Accessor::Subtypes)
    }

    pub fn subparts(&self) -> VfbResult<Option<VfbTerms>> {
        self.terms(Accessor::Subparts)
    }

    /// Subtypes and subparts together.
    pub fn children(&self) -> VfbResult<Option<VfbTerms>> {
        self.terms(Accessor::Children)
    }

    pub fn instances(&self) -> VfbResult<Option<VfbTerms>> {
        self.terms(Accessor::Instances)
    }

    pub fn datasets(&self) -> VfbResult<Option<VfbTerms>> {
        self.terms(Accessor::Datasets)
    }

    pub fn regions(&self) -> VfbResult<Option<VfbTerms>> {
        self.terms(Accessor::Regions)
    }

    pub fn similar_neurons_nblast(&self) -> VfbResult<Option<Vec<Score>>> {
        self.scores(Accessor::SimilarNeuronsNblast)
    }

    pub fn similar_neurons_neuronbridge(&self) -> VfbResult<Option<Vec<Score>>> {
        self.scores(Accessor::SimilarNeuronsNeuronbridge)
    }

    pub fn potential_drivers_nblast(&self) -> VfbResult<Option<Vec<Score>>> {
        self.scores(Accessor::PotentialDriversNblast)
    }

    pub fn potential_drivers_neuronbridge(&self) -> VfbResult<Option<Vec<Score>>> {
        self.scores(Accessor::PotentialDriversNeuronbridge)
    }

    pub fn downstream_partners(&self) -> VfbResult<Option<Vec<Partner>>> {
        self.partners(Accessor::DownstreamPartners)
    }

    pub fn upstream_partners(&self) -> VfbResult<Option<Vec<Partner>>> {
        self.partners(Accessor::UpstreamPartners)
    }

    pub fn neurons_that_overlap(&self) -> VfbResult<Option<VfbTerms>> {
        self.terms(Accessor::NeuronsThatOverlap)
    }

    pub fn neuron_types_that_overlap(&self) -> VfbResult<Option<VfbTerms>> {
        self.terms(Accessor::NeuronTypesThatOverlap)
    }

    pub fn neurons_with_synaptic_terminals_here(&self) -> VfbResult<Option<VfbTerms>> {
        self.terms(Accessor::NeuronsWithSynapticTerminalsHere)
    }

    pub fn neuron_types_with_synaptic_terminals_here(&self) -> VfbResult<Option<VfbTerms>> {
        self.terms(Accessor::NeuronTypesWithSynapticTerminalsHere)
    }

    pub fn downstream_neurons(&self) -> VfbResult<Option<VfbTerms>> {
        self.terms(Accessor::DownstreamNeurons)
    }

    pub fn downstream_neuron_types(&self) -> VfbResult<Option<VfbTerms>> {
        self.terms(Accessor::DownstreamNeuronTypes)
    }

    pub fn upstream_neurons(&self) -> VfbResult<Option<VfbTerms>> {
        self.terms(Accessor::UpstreamNeurons)
    }

    pub fn upstream_neuron_types(&self) -> VfbResult<Option<VfbTerms>> {
        self.terms(Accessor::UpstreamNeuronTypes)
    }
}

impl PartialEq for VfbTerm {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for VfbTerm {}

impl Hash for VfbTerm {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for VfbTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VfbTerm")
            .field("id", &self.inner.id)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// The display name when loaded, the id otherwise. Never fetches.
impl fmt::Display for VfbTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.state.peek() {
            Some(m) => f.write_str(m.data.name()),
            None => f.write_str(&self.inner.id),
        }
    }
}
