//! Assembly and summary tests over realistic TermInfo fixtures

use super::*;
use serde_json::{json, Value};

fn core(short_form: &str, label: &str, types: &[&str]) -> Value {
    json!({
        "short_form": short_form,
        "iri": format!("http://virtualflybrain.org/reports/{short_form}"),
        "label": label,
        "types": types,
        "symbol": ""
    })
}

fn edge(label: &str, short_form: &str) -> Value {
    json!({
        "iri": format!("http://purl.obolibrary.org/obo/{short_form}"),
        "label": label,
        "type": label.replace(' ', "_"),
        "short_form": short_form
    })
}

/// Individual neuron with images, xrefs and dataset provenance.
fn individual_fixture() -> Value {
    json!({
        "term": {
            "core": core("VFB_jrcv0jvf", "LC12_R (FlyEM-HB:1750316098)",
                         &["Entity", "Individual", "Anatomy", "Neuron", "has_image", "NBLAST"]),
            "description": [],
            "comment": ["Cell traced by FlyEM"],
            "link": "https://v2.virtualflybrain.org/?id=VFB_jrcv0jvf",
            "icon": ""
        },
        "relationships": [
            {"relation": edge("overlaps", "RO_0002131"), "object": core("FBbt_00003885", "lobula", &["Class"])},
            {"relation": edge("has presynaptic terminal in", "RO_0002113"), "object": core("FBbt_00045043", "AOTU", &["Class"])}
        ],
        "related_individuals": [
            {"relation": edge("synapsed to", "RO_0002120"), "object": core("VFB_jrchjtdq", "LC12_R 2", &["Individual"])}
        ],
        "channel_image": [
            {
                "image": {
                    "image_folder": "http://www.virtualflybrain.org/data/VFB/i/jrcv/0jvf/VFB_00101567/",
                    "template_channel": core("VFBc_00101567", "JRC2018Unisex_c", &["Individual"]),
                    "template_anatomy": core("VFB_00101567", "JRC2018Unisex", &["Individual", "Template"]),
                    "image_swc": "http://www.virtualflybrain.org/data/VFB/i/jrcv/0jvf/VFB_00101567/volume.swc",
                    "image_nrrd": "http://www.virtualflybrain.org/data/VFB/i/jrcv/0jvf/VFB_00101567/volume.nrrd"
                },
                "channel": core("VFBc_jrcv0jvf", "LC12_R_c", &["Individual"]),
                "imaging_technique": core("FBbi_00000578", "FIB-SEM", &["Class"])
            }
        ],
        "parents": [
            core("FBbt_00100484", "lobula columnar neuron LC12", &["Class", "Neuron"]),
            core("FBbt_00005106", "neuron", &["Class"])
        ],
        "xrefs": [
            {
                "site": {"short_form": "neuprint_JRC_Hemibrain_1point1", "label": "neuprint", "symbol": "FlyEM-HB", "iri": "", "types": ["Site"]},
                "is_data_source": true,
                "accession": "1750316098",
                "link_base": "https://neuprint.janelia.org/view?bodyid=",
                "link_postfix": ""
            },
            {
                "site": {"short_form": "FlyWire", "label": "FlyWire", "iri": "", "types": ["Site"]},
                "is_data_source": false,
                "accession": "720575940621"
            }
        ],
        "dataset_license": [
            {
                "dataset": {"core": core("Xu2020NeuronsV1point1", "Xu2020 neurons", &["DataSet"]), "link": "", "icon": ""},
                "license": {"core": core("VFBlicense_CC_BY_4_0", "CC-BY_4.0", &["License"]),
                            "link": "https://creativecommons.org/licenses/by/4.0/legalcode"}
            }
        ],
        "pub_syn": [
            {"synonym": {"label": "LC12 neuron", "scope": "has_exact_synonym", "type": ""},
             "pub": {"core": core("Unattributed", "", &["pub"])}}
        ],
        "pubs": null
    })
}

fn dataset_fixture() -> Value {
    json!({
        "term": {
            "core": core("Ito2013", "Ito lineage clone dataset", &["Entity", "DataSet", "has_image"]),
            "description": ["Lineage clones", "registered to JFRC2."]
        },
        "pubs": [
            {"core": core("FBrf0221438", "Ito et al., 2013, Curr. Biol. 23(8): 644--655", &["pub"]),
             "FlyBase": "FBrf0221438", "PubMed": "23541729", "DOI": "10.1016/j.cub.2013.03.015"},
            {"core": core("FBrf0000001", "Anon., 2013", &["pub"])}
        ],
        "dataset_counts": {"images": 86, "types": 45}
    })
}

#[test]
fn assembles_core_identity_and_text() {
    let data = assemble(&individual_fixture()).unwrap().unwrap();
    assert_eq!(data.id(), "VFB_jrcv0jvf");
    assert_eq!(data.name(), "LC12_R (FlyEM-HB:1750316098)");
    assert!(data.has_tag("Neuron"));
    assert!(data.term.description.is_empty());
    assert_eq!(data.term.comment, vec!["Cell traced by FlyEM"]);
}

#[test]
fn relationship_sections_merge_in_source_order() {
    let data = assemble(&individual_fixture()).unwrap().unwrap();
    assert_eq!(
        data.relations.target_ids(),
        vec!["FBbt_00003885", "FBbt_00045043", "VFB_jrchjtdq"]
    );
    assert_eq!(data.relations.by_label("synapsed to").len(), 1);
}

#[test]
fn optional_sections_default_to_empty() {
    let data = assemble(&dataset_fixture()).unwrap().unwrap();
    assert!(data.relations.is_empty());
    assert!(data.channel_images.is_empty());
    assert!(data.xrefs.is_empty());
    assert_eq!(data.dataset_counts, Some(DatasetCounts { images: 86, types: 45 }));

    let individual = assemble(&individual_fixture()).unwrap().unwrap();
    assert!(individual.publications.is_empty(), "null section reads as empty");
}

#[test]
fn unattributed_synonym_drops_publication() {
    let data = assemble(&individual_fixture()).unwrap().unwrap();
    assert_eq!(data.synonyms.len(), 1);
    assert!(data.synonyms[0].publication.is_none());
}

#[test]
fn channel_images_expose_derivable_formats() {
    let data = assemble(&individual_fixture()).unwrap().unwrap();
    let groups = data.channel_images_by_template();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].0, "VFB_00101567");
    let image = &groups[0].1[0].image;
    assert!(image.can_derive(ImageFormat::Mesh));
    assert!(image.can_derive(ImageFormat::Volume));
}

#[test]
fn empty_input_yields_no_entity() {
    assert!(assemble(&Value::Null).unwrap().is_none());
    assert!(assemble(&json!({})).unwrap().is_none());
    assert!(assemble_str("  ").unwrap().is_none());
}

#[test]
fn malformed_core_is_an_error_naming_the_id() {
    let doc = json!({"term": {"core": {"short_form": "FBbt_00003679", "label": "fan-shaped body"}}});
    let err = assemble(&doc).unwrap_err();
    let SchemaError::Malformed { id, .. } = &err;
    assert_eq!(id.as_deref(), Some("FBbt_00003679"));
    assert!(err.to_string().contains("FBbt_00003679"));
}

#[test]
fn instance_summary_columns() {
    let summary = assemble(&individual_fixture()).unwrap().unwrap().summary();
    assert_eq!(summary.id, "VFB_jrcv0jvf");
    assert_eq!(summary.tags, "Entity|Individual|Anatomy|Neuron|has_image|NBLAST");
    assert_eq!(summary.parents_label, "lobula columnar neuron LC12|neuron");
    assert_eq!(summary.parents_id, "FBbt_00100484|FBbt_00005106");
    assert_eq!(summary.data_source.as_deref(), Some("FlyEM-HB"));
    assert_eq!(summary.accession.as_deref(), Some("1750316098"));
    assert_eq!(summary.xrefs.as_deref(), Some("FlyEM-HB:1750316098|FlyWire:720575940621"));
    assert_eq!(summary.templates.as_deref(), Some("JRC2018Unisex"));
    assert_eq!(summary.dataset.as_deref(), Some("Xu2020NeuronsV1point1"));
    assert_eq!(
        summary.license.as_deref(),
        Some("https://creativecommons.org/licenses/by/4.0/legalcode")
    );
    assert!(summary.miniref.is_none());
}

#[test]
fn dataset_summary_columns() {
    let summary = assemble(&dataset_fixture()).unwrap().unwrap().summary();
    assert_eq!(summary.description.as_deref(), Some("Lineage clones registered to JFRC2."));
    assert_eq!(
        summary.miniref.as_deref(),
        Some("Ito et al., 2013, Curr. Biol. 23(8): 644--655|Anon., 2013")
    );
    assert_eq!(summary.flybase.as_deref(), Some("FBrf0221438"));
    assert_eq!(summary.pmid.as_deref(), Some("23541729"));
    assert_eq!(summary.doi.as_deref(), Some("10.1016/j.cub.2013.03.015"));
    assert!(summary.templates.is_none());

    let json = summary.to_json().unwrap();
    assert!(json.contains("\"PMID\":\"23541729\""));
    assert!(!json.contains("templates"));
}

#[test]
fn summary_is_deterministic() {
    let doc = individual_fixture();
    let first = assemble(&doc).unwrap().unwrap().summary().to_json().unwrap();
    let second = assemble(&doc).unwrap().unwrap().summary().to_json().unwrap();
    assert_eq!(first, second);
}

#[test]
fn summary_fields_follow_column_order() {
    let summary = assemble(&dataset_fixture()).unwrap().unwrap().summary();
    let names: Vec<&str> = summary.fields().into_iter().map(|(n, _)| n).collect();
    assert_eq!(
        names,
        vec!["label", "symbol", "id", "tags", "parents_label", "parents_id",
             "description", "miniref", "FlyBase", "PMID", "DOI"]
    );
}
