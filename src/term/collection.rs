//! Ordered term collections and their set algebra
//!
//! Every operator compares members by id only and keeps first-seen order.
//! Results of the combining operators never hold two members with the same
//! id; `==` compares id sets, ignoring order and duplicates.

use super::vfb_term::VfbTerm;
use crate::client::{ErrorKind, VfbResult};
use crate::schema::Summary;
use std::collections::HashSet;
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Bound, Index, RangeBounds, Sub};
use tracing::{debug, warn};

#[derive(Clone, Default)]
pub struct VfbTerms {
    terms: Vec<VfbTerm>,
}

impl VfbTerms {
    pub fn new(terms: Vec<VfbTerm>) -> Self {
        Self { terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VfbTerm> {
        self.terms.iter()
    }

    pub fn get(&self, index: usize) -> Option<&VfbTerm> {
        self.terms.get(index)
    }

    pub fn push(&mut self, term: VfbTerm) {
        self.terms.push(term);
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.terms.iter().any(|t| t.id() == id)
    }

    /// Member ids in order. Never fetches.
    pub fn get_ids(&self) -> Vec<String> {
        self.terms.iter().map(|t| t.id().to_string()).collect()
    }

    fn id_set(&self) -> HashSet<&str> {
        self.terms.iter().map(VfbTerm::id).collect()
    }

    /// Display names in order, loading unloaded members in one batch first.
    pub fn get_names(&self) -> VfbResult<Vec<String>> {
        self.load()?;
        self.terms.iter().map(VfbTerm::name).collect()
    }

    pub fn summaries(&self) -> VfbResult<Vec<Summary>> {
        self.load()?;
        self.terms.iter().map(VfbTerm::summary).collect()
    }

    /// Fetch the documents of every unloaded member in one batched call.
    ///
    /// Returns the number of members filled. Members whose document did not
    /// come back stay unloaded.
    pub fn load(&self) -> VfbResult<usize> {
        let pending: Vec<&VfbTerm> = self.terms.iter().filter(|t| !t.is_loaded()).collect();
        let Some(first) = pending.first() else {
            return Ok(0);
        };
        let session = first.session()?;
        let mut ids: Vec<String> = Vec::with_capacity(pending.len());
        for term in &pending {
            if !ids.iter().any(|id| id == term.id()) {
                ids.push(term.id().to_string());
            }
        }
        debug!(count = ids.len(), "bulk loading terms");

        let mut filled = 0;
        for data in session.fetch_documents(&ids)? {
            for term in pending.iter().filter(|t| t.id() == data.id()) {
                if !term.is_loaded() {
                    term.fill(data.clone());
                    filled += 1;
                }
            }
        }
        let missing: Vec<&str> = pending
            .iter()
            .filter(|t| !t.is_loaded())
            .map(|t| t.id())
            .collect();
        if !missing.is_empty() {
            warn!(kind = %ErrorKind::EmptyResult, ?missing, "no document returned for some terms");
        }
        Ok(filled)
    }

    /// Members in first-seen order with later duplicates dropped.
    fn distinct<'a>(terms: impl IntoIterator<Item = &'a VfbTerm>) -> Self {
        let mut seen = HashSet::new();
        Self::new(
            terms
                .into_iter()
                .filter(|t| seen.insert(t.id().to_string()))
                .cloned()
                .collect(),
        )
    }

    /// A ∪ B
    pub fn union(&self, other: &VfbTerms) -> VfbTerms {
        Self::distinct(self.terms.iter().chain(other.terms.iter()))
    }

    /// A \ B
    pub fn difference(&self, other: &VfbTerms) -> VfbTerms {
        let exclude = other.id_set();
        Self::distinct(self.terms.iter().filter(|t| !exclude.contains(t.id())))
    }

    /// A ∩ B
    pub fn intersection(&self, other: &VfbTerms) -> VfbTerms {
        let keep = other.id_set();
        Self::distinct(self.terms.iter().filter(|t| keep.contains(t.id())))
    }

    /// (A \ B) ∪ (B \ A)
    pub fn symmetric_difference(&self, other: &VfbTerms) -> VfbTerms {
        self.difference(other).union(&other.difference(self))
    }

    pub fn and(&self, other: &VfbTerms) -> VfbTerms {
        self.intersection(other)
    }

    pub fn or(&self, other: &VfbTerms) -> VfbTerms {
        self.union(other)
    }

    pub fn xor(&self, other: &VfbTerms) -> VfbTerms {
        self.symmetric_difference(other)
    }

    /// Members of `self` absent from `other` (same as `-`).
    pub fn not(&self, other: &VfbTerms) -> VfbTerms {
        self.difference(other)
    }

    /// A new collection over `range`, clamped to the collection bounds.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> VfbTerms {
        let len = self.terms.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .min(len);
        if start >= end {
            return VfbTerms::default();
        }
        Self::new(self.terms[start..end].to_vec())
    }
}

impl PartialEq for VfbTerms {
    fn eq(&self, other: &Self) -> bool {
        self.id_set() == other.id_set()
    }
}

impl Eq for VfbTerms {}

impl fmt::Debug for VfbTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.terms.iter().map(VfbTerm::id)).finish()
    }
}

impl Index<usize> for VfbTerms {
    type Output = VfbTerm;

    fn index(&self, index: usize) -> &VfbTerm {
        &self.terms[index]
    }
}

impl FromIterator<VfbTerm> for VfbTerms {
    fn from_iter<I: IntoIterator<Item = VfbTerm>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for VfbTerms {
    type Item = VfbTerm;
    type IntoIter = std::vec::IntoIter<VfbTerm>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.into_iter()
    }
}

impl<'a> IntoIterator for &'a VfbTerms {
    type Item = &'a VfbTerm;
    type IntoIter = std::slice::Iter<'a, VfbTerm>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

macro_rules! set_operator {
    ($trait:ident, $method:ident, $op:ident) => {
        impl $trait<&VfbTerms> for &VfbTerms {
            type Output = VfbTerms;

            fn $method(self, rhs: &VfbTerms) -> VfbTerms {
                self.$op(rhs)
            }
        }

        impl $trait for VfbTerms {
            type Output = VfbTerms;

            fn $method(self, rhs: VfbTerms) -> VfbTerms {
                (&self).$op(&rhs)
            }
        }
    };
}

set_operator!(Add, add, union);
set_operator!(BitOr, bitor, union);
set_operator!(Sub, sub, difference);
set_operator!(BitAnd, bitand, intersection);
set_operator!(BitXor, bitxor, symmetric_difference);
