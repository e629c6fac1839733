//! Descriptive records hanging off a term: publications, synonyms,
//! cross-references, licenses and dataset provenance

use super::entity::MinimalEntityInfo;
use serde::{Deserialize, Serialize};

/// Short form of the placeholder publication attached to unattributed synonyms.
pub const UNATTRIBUTED_PUB: &str = "Unattributed";

/// A publication record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub core: MinimalEntityInfo,
    #[serde(rename = "FlyBase", default, skip_serializing_if = "Option::is_none")]
    pub flybase: Option<String>,
    #[serde(rename = "PubMed", default, skip_serializing_if = "Option::is_none")]
    pub pubmed: Option<String>,
    #[serde(rename = "DOI", default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub microref: Option<String>,
}

impl Publication {
    pub fn is_unattributed(&self) -> bool {
        self.core.short_form == UNATTRIBUTED_PUB
    }
}

/// A bare synonym: label plus scope (`has_exact_synonym`, ...) and type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syn {
    pub label: String,
    #[serde(default)]
    pub scope: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub syn_type: Option<String>,
}

/// A synonym with the publication that attests it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Synonym {
    pub synonym: Syn,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication: Option<Publication>,
}

/// The `pub_syn` section entry as it appears in a document.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PubSyn {
    pub synonym: Syn,
    #[serde(rename = "pub", default)]
    pub publication: Option<Publication>,
}

impl From<PubSyn> for Synonym {
    fn from(raw: PubSyn) -> Self {
        Self {
            synonym: raw.synonym,
            publication: raw.publication.filter(|p| !p.is_unattributed()),
        }
    }
}

/// A cross-reference from a local entity to an accession in an external site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Xref {
    pub site: MinimalEntityInfo,
    #[serde(default)]
    pub is_data_source: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_postfix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Xref {
    /// Site symbol when set, else the site short form.
    pub fn site_name(&self) -> &str {
        match self.site.symbol.as_deref() {
            Some(symbol) if !symbol.is_empty() => symbol,
            _ => &self.site.short_form,
        }
    }

    /// `<site>:<accession>`, or `None` for site-level references.
    pub fn curie(&self) -> Option<String> {
        self.accession
            .as_deref()
            .map(|acc| format!("{}:{}", self.site_name(), acc))
    }

    /// Link to the external record: `link_base + accession + link_postfix`.
    pub fn link(&self) -> Option<String> {
        let base = self.link_base.as_deref()?;
        let accession = self.accession.as_deref().unwrap_or_default();
        let postfix = self.link_postfix.as_deref().unwrap_or_default();
        Some(format!("{base}{accession}{postfix}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub core: MinimalEntityInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub core: MinimalEntityInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Which dataset an individual came from and the license it is released under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetLicense {
    pub dataset: Dataset,
    pub license: License,
}

/// Image and type counts recorded on dataset documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetCounts {
    #[serde(default)]
    pub images: u64,
    #[serde(default)]
    pub types: u64,
}

/// A painted region of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDomain {
    pub anatomical_individual: MinimalEntityInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anatomical_type: Option<MinimalEntityInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default)]
    pub index: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn site(short_form: &str, symbol: Option<&str>) -> MinimalEntityInfo {
        let mut s = MinimalEntityInfo::new(short_form, short_form);
        s.symbol = symbol.map(String::from);
        s
    }

    #[test]
    fn unattributed_publication_is_dropped() {
        let raw: PubSyn = serde_json::from_value(json!({
            "synonym": {"label": "LC12 neuron", "scope": "has_exact_synonym", "type": ""},
            "pub": {"core": {"short_form": "Unattributed", "label": ""}}
        }))
        .unwrap();
        let syn = Synonym::from(raw);
        assert_eq!(syn.synonym.label, "LC12 neuron");
        assert!(syn.publication.is_none());
    }

    #[test]
    fn attributed_publication_is_kept() {
        let raw: PubSyn = serde_json::from_value(json!({
            "synonym": {"label": "LC12", "scope": "has_exact_synonym"},
            "pub": {"core": {"short_form": "FBrf0232433", "label": "Wu et al., 2016"}, "PubMed": "27743452"}
        }))
        .unwrap();
        let syn = Synonym::from(raw);
        let publication = syn.publication.unwrap();
        assert_eq!(publication.pubmed.as_deref(), Some("27743452"));
    }

    #[test]
    fn xref_curie_uses_symbol_then_short_form() {
        let mut x = Xref {
            site: site("FlyCircuit", Some("")),
            is_data_source: true,
            accession: Some("Trh-F-500041".into()),
            link_base: Some("http://flycircuit.tw/modules.php?name=clearpage&op=detail_table&neuron=".into()),
            link_postfix: None,
            link_text: None,
            icon: None,
        };
        assert_eq!(x.curie().as_deref(), Some("FlyCircuit:Trh-F-500041"));
        x.site.symbol = Some("FC".into());
        assert_eq!(x.curie().as_deref(), Some("FC:Trh-F-500041"));
        assert!(x.link().unwrap().ends_with("neuron=Trh-F-500041"));
    }

    #[test]
    fn site_level_xref_has_no_curie() {
        let x = Xref {
            site: site("neuprint_JRC_Hemibrain_1point1", None),
            is_data_source: false,
            accession: None,
            link_base: None,
            link_postfix: None,
            link_text: None,
            icon: None,
        };
        assert!(x.curie().is_none());
        assert!(x.link().is_none());
    }
}
