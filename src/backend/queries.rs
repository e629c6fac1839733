//! Cypher statements issued by the object model
//!
//! Every statement returns flat rows with fixed column aliases so callers can
//! read them through [`Row`](super::Row) accessors.

use serde::{Deserialize, Serialize};

/// Morphological similarity method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMethod {
    Nblast,
    Neuronbridge,
}

impl SimilarityMethod {
    /// Edge property holding the score.
    fn score_property(self) -> &'static str {
        match self {
            SimilarityMethod::Nblast => "NBLAST_score",
            SimilarityMethod::Neuronbridge => "neuronbridge_score",
        }
    }
}

/// Direction of a synaptic connection relative to the queried neuron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Downstream,
    Upstream,
}

/// Escape backslashes and quotes for a single-quoted Cypher literal.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}

fn quoted(s: &str) -> String {
    format!("'{}'", escape_string(s))
}

/// `['a', 'b']`
pub fn string_list<S: AsRef<str>>(items: &[S]) -> String {
    let inner: Vec<String> = items.iter().map(|s| quoted(s.as_ref())).collect();
    format!("[{}]", inner.join(", "))
}

/// Registered external databases and APIs.
pub fn dbs() -> String {
    "MATCH (i:Individual) WHERE i:Site OR i:API RETURN i.short_form AS id".to_string()
}

/// Every dataset. Columns: `id`.
pub fn datasets() -> String {
    "MATCH (ds:DataSet) RETURN ds.short_form AS id".to_string()
}

/// Every template. Columns: `id`.
pub fn templates() -> String {
    "MATCH (i:Individual:Template:Anatomy) RETURN i.short_form AS id".to_string()
}

/// Entities cross-referenced to `accessions` in database `db`.
///
/// Columns: `accession`, `db`, `id`.
pub fn xref_to_ids<S: AsRef<str>>(db: &str, accessions: &[S]) -> String {
    format!(
        "MATCH (s:Individual)<-[r:database_cross_reference]-(i:Entity) \
         WHERE r.accession[0] IN {} AND s.short_form = {} \
         RETURN r.accession[0] AS accession, s.short_form AS db, i.short_form AS id",
        string_list(accessions),
        quoted(db)
    )
}

/// Cross-references of `ids`, optionally limited to one database.
///
/// Columns: `id`, `db`, `accession`.
pub fn ids_to_xrefs<S: AsRef<str>>(ids: &[S], db: Option<&str>) -> String {
    let db_clause = db
        .map(|d| format!(" AND s.short_form = {}", quoted(d)))
        .unwrap_or_default();
    format!(
        "MATCH (s:Individual)<-[r:database_cross_reference]-(i:Entity) \
         WHERE i.short_form IN {}{} \
         RETURN i.short_form AS id, s.short_form AS db, r.accession[0] AS accession",
        string_list(ids),
        db_clause
    )
}

/// Neurons morphologically similar to `id`. Columns: `id`, `score`.
pub fn similar_neurons(id: &str, method: SimilarityMethod) -> String {
    let edge = match method {
        SimilarityMethod::Nblast => "has_similar_morphology_to",
        SimilarityMethod::Neuronbridge => "has_similar_morphology_to_part_of",
    };
    let score = method.score_property();
    format!(
        "MATCH (n:Individual {{short_form: {}}})-[s:{edge}]-(m:Individual:Neuron) \
         WHERE exists(s.{score}) \
         RETURN m.short_form AS id, s.{score}[0] AS score ORDER BY score DESC",
        quoted(id)
    )
}

/// Expression patterns whose morphology matches `id`. Columns: `id`, `score`.
pub fn potential_drivers(id: &str, method: SimilarityMethod) -> String {
    let score = method.score_property();
    format!(
        "MATCH (n:Individual {{short_form: {}}})-[s:has_similar_morphology_to_part_of]-\
         (m:Individual:Expression_pattern_fragment) \
         WHERE exists(s.{score}) \
         RETURN m.short_form AS id, s.{score}[0] AS score ORDER BY score DESC",
        quoted(id)
    )
}

/// Synaptic partners of `id`. Columns: `id`, `weight`.
pub fn partners(id: &str, direction: Direction) -> String {
    let pattern = match direction {
        Direction::Downstream => "-[r:synapsed_to]->",
        Direction::Upstream => "<-[r:synapsed_to]-",
    };
    format!(
        "MATCH (n:Individual:Neuron {{short_form: {}}}){pattern}(m:Individual:Neuron) \
         RETURN m.short_form AS id, r.weight[0] AS weight ORDER BY weight DESC",
        quoted(id)
    )
}
