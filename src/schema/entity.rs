//! Core identity records shared by every TermInfo section

use serde::{Deserialize, Deserializer, Serialize};

/// Minimal description of a graph entity.
///
/// Appears as the core of every term and as the target of every reference
/// (relationship objects, parents, channels, templates, sites).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalEntityInfo {
    /// Canonical compact identifier, e.g. `FBbt_00100484`
    pub short_form: String,
    #[serde(default)]
    pub iri: String,
    #[serde(default)]
    pub label: String,
    /// Tags copied from the node labels in the graph (`Class`, `Neuron`, ...)
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_facets: Option<Vec<String>>,
}

impl MinimalEntityInfo {
    pub fn new(short_form: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            short_form: short_form.into(),
            iri: String::new(),
            label: label.into(),
            types: Vec::new(),
            symbol: None,
            unique_facets: None,
        }
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Display name: the symbol when one is set, otherwise the label.
    pub fn name(&self) -> &str {
        match self.symbol.as_deref() {
            Some(symbol) if !symbol.is_empty() => symbol,
            _ => &self.label,
        }
    }

    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }
}

impl std::fmt::Display for MinimalEntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Description of a relationship type (the edge half of a [`Rel`](super::Rel)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalEdgeInfo {
    #[serde(default)]
    pub iri: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub edge_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_cross_reference: Option<Vec<String>>,
}

impl MinimalEdgeInfo {
    pub fn new(label: impl Into<String>, edge_type: impl Into<String>) -> Self {
        Self {
            iri: String::new(),
            label: label.into(),
            edge_type: edge_type.into(),
            short_form: None,
            confidence_value: None,
            database_cross_reference: None,
        }
    }
}

/// The descriptive record for one entity document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub core: MinimalEntityInfo,
    #[serde(default, deserialize_with = "one_or_many")]
    pub description: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub comment: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Term {
    pub fn new(core: MinimalEntityInfo) -> Self {
        Self {
            core,
            description: Vec::new(),
            comment: Vec::new(),
            link: None,
            icon: None,
        }
    }
}

/// Accept either a bare string or a list of strings.
///
/// The server emits free-text fields as lists, but older cached documents
/// hold plain strings. `null` reads as empty.
pub(crate) fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Null(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) if s.is_empty() => Vec::new(),
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Null(()) => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn name_prefers_symbol() {
        let e = MinimalEntityInfo::new("FBbt_00100484", "lobula columnar neuron LC12").with_symbol("LC12");
        assert_eq!(e.name(), "LC12");
        assert_eq!(e.to_string(), "LC12");
    }

    #[test]
    fn empty_symbol_falls_back_to_label() {
        let e = MinimalEntityInfo::new("FBbt_00003679", "fan-shaped body").with_symbol("");
        assert_eq!(e.name(), "fan-shaped body");
    }

    #[test]
    fn edge_type_field_is_renamed() {
        let edge: MinimalEdgeInfo = serde_json::from_value(json!({
            "iri": "http://purl.obolibrary.org/obo/RO_0002131",
            "label": "overlaps",
            "type": "overlaps"
        }))
        .unwrap();
        assert_eq!(edge.edge_type, "overlaps");
        assert!(edge.short_form.is_none());
    }

    #[test]
    fn description_accepts_string_or_list() {
        let a: Term = serde_json::from_value(json!({
            "core": {"short_form": "X_1"},
            "description": "single"
        }))
        .unwrap();
        let b: Term = serde_json::from_value(json!({
            "core": {"short_form": "X_1"},
            "description": ["first", "second"],
            "comment": null
        }))
        .unwrap();
        assert_eq!(a.description, vec!["single"]);
        assert_eq!(b.description, vec!["first", "second"]);
        assert!(b.comment.is_empty());
    }
}
