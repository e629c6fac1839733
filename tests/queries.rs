//! Class queries, region reports and cross-reference mapping

mod common;

use common::{
    connect, CELL, DATASET, FB, FB_LAYER_1, FB_LAYER_2, LC12, LC12_R, LC12_R_2, NEUPRINT, NEURON,
    TEMPLATE,
};
use vfb_connect::{ErrorKind, XrefMatch};

#[test]
fn subclasses_of_a_single_key() {
    let (_, vfb) = connect();
    assert_eq!(vfb.get_subclasses("fan-shaped body").unwrap(), vec![FB_LAYER_1]);
}

#[test]
fn subclasses_of_a_labelled_expression() {
    let (_, vfb) = connect();
    assert_eq!(
        vfb.get_subclasses("'part of' some 'fan-shaped body'").unwrap(),
        vec![FB_LAYER_1, FB_LAYER_2]
    );
}

#[test]
fn superclasses_are_ancestors() {
    let (_, vfb) = connect();
    assert_eq!(vfb.get_superclasses("LC12").unwrap(), vec![NEURON, CELL]);
    assert!(vfb.get_subclasses("LC12").unwrap().is_empty());
}

#[test]
fn instances_of_a_class() {
    let (_, vfb) = connect();
    assert_eq!(vfb.get_instances("LC12").unwrap(), vec![LC12_R, LC12_R_2]);
}

#[test]
fn unknown_label_in_query_fails() {
    let (backend, vfb) = connect();
    let err = vfb.get_instances("'part of' some 'nodulus'").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnresolvedKey);
    assert_eq!(backend.dl_calls(), 0);
}

#[test]
fn region_report_for_cells_only() {
    let (_, vfb) = connect();
    let summaries = vfb.get_terms_by_region("fan-shaped body", true).unwrap();
    let ids: Vec<&str> = summaries.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec![LC12]);
    assert_eq!(summaries[0].symbol, "LC12");
}

#[test]
fn region_report_for_all_overlapping_classes() {
    let (_, vfb) = connect();
    let summaries = vfb.get_terms_by_region("FB", false).unwrap();
    let ids: Vec<&str> = summaries.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec![LC12, FB_LAYER_1]);
}

#[test]
fn summaries_follow_request_order() {
    let (_, vfb) = connect();
    let summaries = vfb.get_summaries(&[LC12, FB]).unwrap();
    assert_eq!(summaries[0].label, "lobula columnar neuron LC12");
    assert_eq!(summaries[1].label, "fan-shaped body");
}

#[test]
fn accessions_map_to_entities() {
    let (_, vfb) = connect();
    let matches = vfb.xref_to_ids("FlyEM-HB", &["1750316098"]).unwrap();
    assert_eq!(
        matches,
        vec![XrefMatch {
            id: LC12_R.to_string(),
            db: NEUPRINT.to_string(),
            accession: "1750316098".to_string(),
        }]
    );
    assert!(vfb.xref_to_ids(NEUPRINT, &["0000"]).unwrap().is_empty());
}

#[test]
fn entities_map_to_their_cross_references() {
    let (_, vfb) = connect();
    let xrefs = vfb.ids_to_xrefs(&[LC12_R, LC12_R_2], None).unwrap();
    assert_eq!(xrefs.len(), 1);
    assert_eq!(xrefs[0].id, LC12_R);
    assert_eq!(xrefs[0].accession, "1750316098");
}

#[test]
fn dataset_and_template_listings_are_summarized() {
    let (_, vfb) = connect();
    let datasets = vfb.get_datasets().unwrap();
    assert_eq!(datasets.len(), 1);
    assert_eq!(datasets[0].id, DATASET);
    assert_eq!(datasets[0].label, "Xu2020 neurons");

    let templates = vfb.get_templates().unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].id, TEMPLATE);
    assert_eq!(templates[0].label, "JRC2018Unisex");
}

#[test]
fn terms_by_xref_skip_unmatched_accessions() {
    let (_, vfb) = connect();
    let summaries = vfb.get_terms_by_xref("FlyEM-HB", &["0000", "1750316098"]).unwrap();
    let ids: Vec<&str> = summaries.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec![LC12_R]);
    assert_eq!(summaries[0].accession.as_deref(), Some("1750316098"));

    assert!(vfb.get_terms_by_xref(NEUPRINT, &["0000"]).unwrap().is_empty());
}

#[test]
fn queries_against_an_offline_backend_are_transport_errors() {
    let (backend, vfb) = connect();
    backend.set_offline(true);
    let err = vfb.get_subclasses("fan-shaped body").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
