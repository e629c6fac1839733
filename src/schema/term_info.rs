//! TermInfo documents and their assembly into a term tree
//!
//! A TermInfo document is the nested record the server returns for one
//! entity. Every section other than `term` is optional; missing and `null`
//! sections read as empty.

use super::entity::{one_or_many, MinimalEntityInfo, Term};
use super::image::{group_by_template, AnatomyChannelImage, ChannelImage};
use super::relations::{Rel, Relations};
use super::satellite::{
    DatasetCounts, DatasetLicense, License, PubSyn, Publication, Synonym, TemplateDomain, Xref,
};
use super::summary::Summary;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while turning a document into a term tree
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed TermInfo document {}: {source}", .id.as_deref().unwrap_or("<unknown id>"))]
    Malformed {
        id: Option<String>,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `term.core` with the fields a document must carry.
#[derive(Debug, Deserialize)]
struct RequiredCore {
    short_form: String,
    iri: String,
    label: String,
    types: Vec<String>,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    unique_facets: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawTerm {
    core: RequiredCore,
    #[serde(default, deserialize_with = "one_or_many")]
    description: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    comment: Vec<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    icon: Option<String>,
}

impl From<RawTerm> for Term {
    fn from(raw: RawTerm) -> Self {
        let RequiredCore { short_form, iri, label, types, symbol, unique_facets } = raw.core;
        Term {
            core: MinimalEntityInfo { short_form, iri, label, types, symbol, unique_facets },
            description: raw.description,
            comment: raw.comment,
            link: raw.link,
            icon: raw.icon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TermInfoDocument {
    term: RawTerm,
    #[serde(default, deserialize_with = "nullable")]
    relationships: Vec<Rel>,
    #[serde(default, deserialize_with = "nullable")]
    related_individuals: Vec<Rel>,
    #[serde(default, deserialize_with = "nullable")]
    channel_image: Vec<ChannelImage>,
    #[serde(default, deserialize_with = "nullable")]
    anatomy_channel_image: Vec<AnatomyChannelImage>,
    #[serde(default, deserialize_with = "nullable")]
    parents: Vec<MinimalEntityInfo>,
    #[serde(default)]
    dataset_counts: Option<DatasetCounts>,
    #[serde(default, deserialize_with = "nullable")]
    pubs: Vec<Publication>,
    #[serde(default, deserialize_with = "nullable")]
    license: Vec<License>,
    #[serde(default, deserialize_with = "nullable")]
    dataset_license: Vec<DatasetLicense>,
    #[serde(default, deserialize_with = "nullable")]
    xrefs: Vec<Xref>,
    #[serde(default, deserialize_with = "nullable")]
    pub_syn: Vec<PubSyn>,
    #[serde(default, deserialize_with = "nullable")]
    template_domains: Vec<TemplateDomain>,
}

/// The populated tree for one entity document.
#[derive(Debug, Clone, PartialEq)]
pub struct TermData {
    pub term: Term,
    /// `relationships` followed by `related_individuals`, source order kept
    pub relations: Relations,
    pub channel_images: Vec<ChannelImage>,
    pub anatomy_channel_images: Vec<AnatomyChannelImage>,
    pub parents: Vec<MinimalEntityInfo>,
    pub publications: Vec<Publication>,
    pub licenses: Vec<License>,
    pub dataset_licenses: Vec<DatasetLicense>,
    pub xrefs: Vec<Xref>,
    pub synonyms: Vec<Synonym>,
    pub dataset_counts: Option<DatasetCounts>,
    pub template_domains: Vec<TemplateDomain>,
}

impl TermData {
    pub fn id(&self) -> &str {
        &self.term.core.short_form
    }

    pub fn name(&self) -> &str {
        self.term.core.name()
    }

    /// Tags in document order
    pub fn tags(&self) -> &[String] {
        &self.term.core.types
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.term.core.has_type(tag)
    }

    pub fn parent_ids(&self) -> Vec<String> {
        self.parents.iter().map(|p| p.short_form.clone()).collect()
    }

    /// Datasets this individual was recorded in, first-seen order.
    pub fn dataset_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for dl in &self.dataset_licenses {
            let id = &dl.dataset.core.short_form;
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }

    /// Painted regions recorded on a template.
    pub fn region_ids(&self) -> Vec<String> {
        self.template_domains
            .iter()
            .map(|d| d.anatomical_individual.short_form.clone())
            .collect()
    }

    pub fn channel_images_by_template(&self) -> Vec<(String, Vec<&ChannelImage>)> {
        group_by_template(&self.channel_images)
    }

    pub fn summary(&self) -> Summary {
        Summary::from_term_data(self)
    }
}

fn is_empty_document(doc: &Value) -> bool {
    match doc {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Build the term tree for one document.
///
/// Returns `Ok(None)` for an absent or empty document and an error when the
/// document is present but cannot be read.
pub fn assemble(doc: &Value) -> SchemaResult<Option<TermData>> {
    if is_empty_document(doc) {
        return Ok(None);
    }
    let parsed: TermInfoDocument =
        TermInfoDocument::deserialize(doc).map_err(|source| SchemaError::Malformed {
            id: doc
                .pointer("/term/core/short_form")
                .and_then(Value::as_str)
                .map(String::from),
            source,
        })?;

    let mut relations = Relations::from(parsed.relationships);
    relations.extend(parsed.related_individuals);

    Ok(Some(TermData {
        term: parsed.term.into(),
        relations,
        channel_images: parsed.channel_image,
        anatomy_channel_images: parsed.anatomy_channel_image,
        parents: parsed.parents,
        publications: parsed.pubs,
        licenses: parsed.license,
        dataset_licenses: parsed.dataset_license,
        xrefs: parsed.xrefs,
        synonyms: parsed.pub_syn.into_iter().map(Synonym::from).collect(),
        dataset_counts: parsed.dataset_counts,
        template_domains: parsed.template_domains,
    }))
}

/// [`assemble`] over a JSON string.
pub fn assemble_str(json: &str) -> SchemaResult<Option<TermData>> {
    if json.trim().is_empty() {
        return Ok(None);
    }
    let doc: Value =
        serde_json::from_str(json).map_err(|source| SchemaError::Malformed { id: None, source })?;
    assemble(&doc)
}
