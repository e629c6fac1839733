//! Typed relationships to other entities

use super::entity::{MinimalEdgeInfo, MinimalEntityInfo};
use serde::{Deserialize, Serialize};

/// A labeled edge from the owning term to a target entity.
///
/// The target is only indexed here; resolving it to a full term is the
/// caller's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rel {
    pub relation: MinimalEdgeInfo,
    pub object: MinimalEntityInfo,
}

impl Rel {
    pub fn new(relation: MinimalEdgeInfo, object: MinimalEntityInfo) -> Self {
        Self { relation, object }
    }

    pub fn target_id(&self) -> &str {
        &self.object.short_form
    }
}

impl std::fmt::Display for Rel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.relation.label, self.object.name())
    }
}

/// Ordered list of relationships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Relations(Vec<Rel>);

impl Relations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rel: Rel) {
        self.0.push(rel);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rel> {
        self.0.iter()
    }

    /// Relationships whose relation label equals `label`, in order.
    pub fn by_label(&self, label: &str) -> Relations {
        Relations(
            self.0
                .iter()
                .filter(|r| r.relation.label == label)
                .cloned()
                .collect(),
        )
    }

    /// Distinct relation labels in first-seen order.
    pub fn labels(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for r in &self.0 {
            if !out.contains(&r.relation.label.as_str()) {
                out.push(&r.relation.label);
            }
        }
        out
    }

    /// Target ids in relationship order. Duplicates are kept.
    pub fn target_ids(&self) -> Vec<String> {
        self.0.iter().map(|r| r.target_id().to_string()).collect()
    }
}

impl From<Vec<Rel>> for Relations {
    fn from(rels: Vec<Rel>) -> Self {
        Self(rels)
    }
}

impl Extend<Rel> for Relations {
    fn extend<T: IntoIterator<Item = Rel>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Relations {
    type Item = &'a Rel;
    type IntoIter = std::slice::Iter<'a, Rel>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(label: &str, target: &str) -> Rel {
        Rel::new(
            MinimalEdgeInfo::new(label, label.replace(' ', "_")),
            MinimalEntityInfo::new(target, target),
        )
    }

    #[test]
    fn by_label_filters_in_order() {
        let rels = Relations::from(vec![
            rel("overlaps", "FBbt_1"),
            rel("part of", "FBbt_2"),
            rel("overlaps", "FBbt_3"),
        ]);
        let overlaps = rels.by_label("overlaps");
        assert_eq!(overlaps.target_ids(), vec!["FBbt_1", "FBbt_3"]);
        assert_eq!(rels.labels(), vec!["overlaps", "part of"]);
    }

    #[test]
    fn unknown_label_gives_empty_relations() {
        let rels = Relations::from(vec![rel("overlaps", "FBbt_1")]);
        assert!(rels.by_label("develops from").is_empty());
    }
}
