//! Flat one-record-per-entity projection used for tabular reporting
//!
//! Multi-valued columns are pipe-joined. The projection is a pure function
//! of the term tree: field order is fixed by the struct and every list is
//! taken in document order, so the same document always renders the same
//! bytes.

use super::term_info::TermData;
use serde::Serialize;

/// Tag marking individuals; adds the instance columns.
const INDIVIDUAL_TAG: &str = "Individual";
/// Tag marking datasets; adds the publication columns.
const DATASET_TAG: &str = "DataSet";

fn join_pipe<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("|")
}

/// Summary record for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub label: String,
    pub symbol: String,
    pub id: String,
    pub tags: String,
    pub parents_label: String,
    pub parents_id: String,

    // --- instances ---
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xrefs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    // --- datasets ---
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miniref: Option<String>,
    #[serde(rename = "FlyBase", skip_serializing_if = "Option::is_none")]
    pub flybase: Option<String>,
    #[serde(rename = "PMID", skip_serializing_if = "Option::is_none")]
    pub pmid: Option<String>,
    #[serde(rename = "DOI", skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

impl Summary {
    pub fn from_term_data(data: &TermData) -> Self {
        let core = &data.term.core;
        let mut summary = Self {
            label: core.label.clone(),
            symbol: core.symbol.clone().unwrap_or_default(),
            id: core.short_form.clone(),
            tags: join_pipe(&core.types),
            parents_label: join_pipe(data.parents.iter().map(|p| &p.label)),
            parents_id: join_pipe(data.parents.iter().map(|p| &p.short_form)),
            data_source: None,
            accession: None,
            xrefs: None,
            templates: None,
            dataset: None,
            license: None,
            description: None,
            miniref: None,
            flybase: None,
            pmid: None,
            doi: None,
        };

        if data.has_tag(INDIVIDUAL_TAG) {
            let sources: Vec<_> = data.xrefs.iter().filter(|x| x.is_data_source).collect();
            summary.data_source = Some(join_pipe(sources.iter().map(|x| x.site_name())));
            summary.accession = Some(join_pipe(sources.iter().filter_map(|x| x.accession.as_deref())));
            summary.xrefs = Some(join_pipe(data.xrefs.iter().filter_map(|x| x.curie())));
            summary.templates = Some(join_pipe(
                data.channel_images.iter().map(|ci| &ci.image.template_anatomy.label),
            ));
            summary.dataset = Some(join_pipe(
                data.dataset_licenses.iter().map(|dl| &dl.dataset.core.short_form),
            ));
            summary.license = Some(join_pipe(
                data.dataset_licenses.iter().filter_map(|dl| dl.license.link.as_deref()),
            ));
        }

        if data.has_tag(DATASET_TAG) {
            let pubs = &data.publications;
            summary.description = Some(data.term.description.join(" "));
            summary.miniref = Some(join_pipe(pubs.iter().map(|p| &p.core.label)));
            summary.flybase = Some(join_pipe(pubs.iter().filter_map(|p| p.flybase.as_deref())));
            summary.pmid = Some(join_pipe(pubs.iter().filter_map(|p| p.pubmed.as_deref())));
            summary.doi = Some(join_pipe(pubs.iter().filter_map(|p| p.doi.as_deref())));
        }

        summary
    }

    /// Column name / value pairs in rendering order, present columns only.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut out = vec![
            ("label", self.label.as_str()),
            ("symbol", self.symbol.as_str()),
            ("id", self.id.as_str()),
            ("tags", self.tags.as_str()),
            ("parents_label", self.parents_label.as_str()),
            ("parents_id", self.parents_id.as_str()),
        ];
        let optional = [
            ("data_source", &self.data_source),
            ("accession", &self.accession),
            ("xrefs", &self.xrefs),
            ("templates", &self.templates),
            ("dataset", &self.dataset),
            ("license", &self.license),
            ("description", &self.description),
            ("miniref", &self.miniref),
            ("FlyBase", &self.flybase),
            ("PMID", &self.pmid),
            ("DOI", &self.doi),
        ];
        out.extend(
            optional
                .into_iter()
                .filter_map(|(name, value)| value.as_deref().map(|v| (name, v))),
        );
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
