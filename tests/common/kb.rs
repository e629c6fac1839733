//! Fixture knowledge base

use serde_json::{json, Value};
use std::sync::Arc;
use vfb_connect::backend::queries;
use vfb_connect::backend::{Direction, SimilarityMethod};
use vfb_connect::resolve::{EntryKind, LookupEntry};
use vfb_connect::{ClientConfig, DlQueryKind, InMemoryBackend, Row, VfbConnect};

pub const FB: &str = "FBbt_00003679";
pub const FB_LAYER_1: &str = "FBbt_00003680";
pub const FB_LAYER_2: &str = "FBbt_00003681";
pub const LC12: &str = "FBbt_00100484";
pub const NEURON: &str = "FBbt_00005106";
pub const CELL: &str = "FBbt_00007002";
pub const LC12_R: &str = "VFB_jrcv0jvf";
pub const LC12_R_2: &str = "VFB_jrchjtdq";
/// Similarity hit with no document in the fixture
pub const LC12_R_3: &str = "VFB_jrchk8e0";
pub const TEMPLATE: &str = "VFB_00101567";
pub const FB_PAINTED: &str = "VFB_00102107";
pub const DATASET: &str = "Xu2020NeuronsV1point1";
pub const NEUPRINT: &str = "neuprint_JRC_Hemibrain_1point1";

fn iri(id: &str) -> String {
    if id.starts_with("VFB") {
        format!("http://virtualflybrain.org/reports/{id}")
    } else {
        format!("http://purl.obolibrary.org/obo/{id}")
    }
}

pub fn core(id: &str, label: &str, types: &[&str]) -> Value {
    json!({"short_form": id, "iri": iri(id), "label": label, "types": types})
}

pub fn class_doc(id: &str, label: &str, tags: &[&str], parents: &[(&str, &str)]) -> Value {
    let mut types = vec!["Entity", "Class"];
    types.extend_from_slice(tags);
    json!({
        "term": {"core": core(id, label, &types), "description": [], "comment": []},
        "parents": parents
            .iter()
            .map(|(id, label)| core(id, label, &["Class"]))
            .collect::<Vec<_>>()
    })
}

pub fn individual_doc(id: &str, label: &str, tags: &[&str], parents: &[(&str, &str)]) -> Value {
    let mut types = vec!["Entity", "Individual"];
    types.extend_from_slice(tags);
    json!({
        "term": {"core": core(id, label, &types), "description": [], "comment": []},
        "parents": parents
            .iter()
            .map(|(id, label)| core(id, label, &["Class"]))
            .collect::<Vec<_>>()
    })
}

fn with_symbol(mut doc: Value, symbol: &str) -> Value {
    doc["term"]["core"]["symbol"] = json!(symbol);
    doc
}

fn lc12_r() -> Value {
    let mut doc = individual_doc(
        LC12_R,
        "LC12_R (FlyEM-HB:1750316098)",
        &["Anatomy", "Neuron", "NBLAST", "has_neuron_connectivity"],
        &[(LC12, "lobula columnar neuron LC12")],
    );
    doc["xrefs"] = json!([{
        "site": core(NEUPRINT, "neuprint JRC Hemibrain 1.1", &["Individual", "Site"]),
        "is_data_source": true,
        "accession": "1750316098",
        "link_base": "https://neuprint.janelia.org/view?bodyid="
    }]);
    doc["dataset_license"] = json!([{
        "dataset": {"core": core(DATASET, "Xu2020 neurons", &["Individual", "DataSet"])},
        "license": {"core": core("VFBlicense_CC_BY_4_0", "CC-BY_4.0", &["Individual", "License"])}
    }]);
    doc
}

fn template() -> Value {
    let mut doc = individual_doc(TEMPLATE, "JRC2018Unisex", &["Anatomy", "Template"], &[]);
    doc["template_domains"] = json!([{
        "anatomical_individual": core(FB_PAINTED, "fan-shaped body on JRC2018Unisex", &["Individual"]),
        "anatomical_type": core(FB, "fan-shaped body", &["Class"]),
        "folder": "http://www.virtualflybrain.org/data/VFB/i/0010/2107/",
        "index": [7]
    }]);
    doc
}

fn dataset() -> Value {
    let mut doc = individual_doc(DATASET, "Xu2020 neurons", &["DataSet"], &[]);
    doc["dataset_counts"] = json!({"images": 2, "types": 1});
    doc
}

/// The fixture backend: documents, lookup entries and canned answers.
pub fn knowledge_base() -> InMemoryBackend {
    let overlaps_fb = "RO:0002131 some FBbt:00003679";
    let neurons_overlapping_fb = "FBbt:00005106 and RO:0002131 some FBbt:00003679";

    InMemoryBackend::new()
        .with_document(with_symbol(
            class_doc(FB, "fan-shaped body", &["Anatomy", "Synaptic_neuropil"], &[]),
            "FB",
        ))
        .with_document(class_doc(
            FB_LAYER_1,
            "fan-shaped body layer 1",
            &["Anatomy", "Synaptic_neuropil_subdomain"],
            &[(FB, "fan-shaped body")],
        ))
        .with_document(class_doc(
            FB_LAYER_2,
            "fan-shaped body layer 2",
            &["Anatomy", "Synaptic_neuropil_subdomain"],
            &[],
        ))
        .with_document(with_symbol(
            class_doc(
                LC12,
                "lobula columnar neuron LC12",
                &["Anatomy", "Cell", "Neuron"],
                &[(NEURON, "neuron")],
            ),
            "LC12",
        ))
        .with_document(class_doc(NEURON, "neuron", &["Anatomy", "Cell", "Neuron"], &[]))
        .with_document(class_doc(CELL, "cell", &["Anatomy", "Cell"], &[]))
        .with_document(lc12_r())
        .with_document(individual_doc(
            LC12_R_2,
            "LC12_R 2 (FlyEM-HB:1781393214)",
            &["Anatomy", "Neuron"],
            &[(LC12, "lobula columnar neuron LC12")],
        ))
        .with_document(template())
        .with_document(individual_doc(
            FB_PAINTED,
            "fan-shaped body on JRC2018Unisex",
            &["Anatomy", "Synaptic_neuropil"],
            &[(FB, "fan-shaped body")],
        ))
        .with_document(dataset())
        .with_lookup_entry(LookupEntry::new("BFO_0000050", "part of", EntryKind::Relation))
        .with_lookup_entry(LookupEntry::new("RO_0002131", "overlaps", EntryKind::Relation))
        .with_lookup_entry(LookupEntry::new(
            "RO_0002130",
            "has synaptic terminals in",
            EntryKind::Relation,
        ))
        .with_lookup_entry(
            LookupEntry::new(NEUPRINT, "neuprint JRC Hemibrain 1.1", EntryKind::Site)
                .with_symbol("FlyEM-HB"),
        )
        .with_dl_answer(
            DlQueryKind::Subclasses,
            "FBbt:00003679",
            vec![iri(FB_LAYER_1)],
        )
        .with_dl_answer(
            DlQueryKind::Subclasses,
            "BFO:0000050 some FBbt:00003679",
            vec![FB_LAYER_1, FB_LAYER_2],
        )
        .with_dl_answer(DlQueryKind::Instances, "FBbt:00003679", vec![FB_PAINTED])
        .with_dl_answer(DlQueryKind::Subclasses, neurons_overlapping_fb, vec![LC12])
        .with_dl_answer(DlQueryKind::Instances, neurons_overlapping_fb, vec![LC12_R, LC12_R_2])
        .with_dl_answer(DlQueryKind::Subclasses, overlaps_fb, vec![LC12, FB_LAYER_1])
        .with_dl_answer(
            DlQueryKind::Subclasses,
            "FBbt:00007002 that RO:0002131 some FBbt:00003679",
            vec![LC12],
        )
        .with_dl_answer(DlQueryKind::Instances, "FBbt:00100484", vec![LC12_R, LC12_R_2])
        .with_dl_answer(DlQueryKind::Superclasses, "FBbt:00100484", vec![NEURON, CELL])
        .with_rows(
            queries::similar_neurons(LC12_R, SimilarityMethod::Nblast),
            vec![
                Row::new().with("id", LC12_R_2).with("score", 0.62),
                Row::new().with("id", LC12_R_3).with("score", 0.41),
            ],
        )
        .with_rows(
            queries::partners(LC12_R, Direction::Downstream),
            vec![Row::new().with("id", LC12_R_2).with("weight", 42)],
        )
        .with_rows(
            queries::xref_to_ids(NEUPRINT, &["1750316098"]),
            vec![Row::new()
                .with("accession", "1750316098")
                .with("db", NEUPRINT)
                .with("id", LC12_R)],
        )
        .with_rows(
            queries::xref_to_ids(NEUPRINT, &["0000", "1750316098"]),
            vec![Row::new()
                .with("accession", "1750316098")
                .with("db", NEUPRINT)
                .with("id", LC12_R)],
        )
        .with_rows(queries::datasets(), vec![Row::new().with("id", DATASET)])
        .with_rows(queries::templates(), vec![Row::new().with("id", TEMPLATE)])
        .with_rows(
            queries::ids_to_xrefs(&[LC12_R, LC12_R_2], None),
            vec![Row::new()
                .with("id", LC12_R)
                .with("db", NEUPRINT)
                .with("accession", "1750316098")],
        )
}

/// A session over the fixture knowledge base with default settings.
pub fn connect() -> (Arc<InMemoryBackend>, VfbConnect) {
    connect_with(ClientConfig::default())
}

pub fn connect_with(config: ClientConfig) -> (Arc<InMemoryBackend>, VfbConnect) {
    let backend = Arc::new(knowledge_base());
    let vfb = VfbConnect::connect(backend.clone(), config).expect("fixture session");
    (backend, vfb)
}
