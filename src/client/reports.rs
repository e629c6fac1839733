//! Query-level operations: DL class queries, cross-references and reports

use super::{ErrorKind, VfbConnect, VfbError, VfbResult};
use crate::backend::{queries, DlQueryKind, Row};
use crate::batch;
use crate::resolve::ids::{CELL, OVERLAPS};
use crate::resolve::{labels_to_ids, EntryKind};
use crate::schema::Summary;
use serde::Serialize;
use tracing::warn;

/// One entity/cross-reference pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XrefMatch {
    pub id: String,
    /// Short form of the external database
    pub db: String,
    pub accession: String,
}

impl XrefMatch {
    fn from_row(row: &Row) -> Option<Self> {
        Some(Self {
            id: row.get_str("id")?.to_string(),
            db: row.get_str("db")?.to_string(),
            accession: row.get_str("accession")?.to_string(),
        })
    }
}

fn owned<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|s| s.as_ref().to_string()).collect()
}

impl VfbConnect {
    /// Ids of the registered external databases and APIs.
    pub fn get_dbs(&self) -> Vec<String> {
        self.inner.lookup.ids_of_kind(EntryKind::Site)
    }

    /// Entities cross-referenced to `accessions` in `db`.
    ///
    /// `db` may be given by id or label. Accessions are sent in batches.
    pub fn xref_to_ids<S: AsRef<str>>(&self, db: &str, accessions: &[S]) -> VfbResult<Vec<XrefMatch>> {
        let db = self.lookup_id(db)?;
        let accessions = owned(accessions);
        let rows = batch::batched(&accessions, self.chunk_size(), |chunk| {
            self.inner.backend.run_query(&queries::xref_to_ids(&db, chunk))
        })?;
        Ok(rows.iter().filter_map(XrefMatch::from_row).collect())
    }

    /// Cross-references carried by `ids`, optionally limited to one database.
    pub fn ids_to_xrefs<S: AsRef<str>>(&self, ids: &[S], db: Option<&str>) -> VfbResult<Vec<XrefMatch>> {
        let db = db.map(|d| self.lookup_id(d)).transpose()?;
        let ids = owned(ids);
        let rows = batch::batched(&ids, self.chunk_size(), |chunk| {
            self.inner.backend.run_query(&queries::ids_to_xrefs(chunk, db.as_deref()))
        })?;
        let matches: Vec<XrefMatch> = rows.iter().filter_map(XrefMatch::from_row).collect();
        let unmatched: Vec<&String> = ids
            .iter()
            .filter(|id| !matches.iter().any(|m| &m.id == *id))
            .collect();
        if !unmatched.is_empty() {
            warn!(kind = %ErrorKind::EmptyResult, ?unmatched, "no cross-references found");
        }
        Ok(matches)
    }

    /// Resolve one `<db>:<accession>` pair to an entity id.
    pub(crate) fn resolve_xref(&self, db: &str, accession: &str) -> VfbResult<String> {
        let key = format!("{db}:{accession}");
        let db_id = self
            .lookup_id(db)
            .map_err(|_| VfbError::UnresolvedKey(key.clone()))?;
        if self.inner.lookup.kind(&db_id) != Some(EntryKind::Site) {
            return Err(VfbError::UnresolvedKey(key));
        }
        let mut ids: Vec<String> = Vec::new();
        for m in self.xref_to_ids(&db_id, &[accession])? {
            if !ids.contains(&m.id) {
                ids.push(m.id);
            }
        }
        match ids.len() {
            0 => {
                warn!(kind = %ErrorKind::EmptyResult, db, accession, "no entity carries this cross-reference");
                Err(VfbError::UnresolvedKey(key))
            }
            1 => Ok(ids.remove(0)),
            _ => {
                warn!(
                    kind = %ErrorKind::AmbiguousMatch,
                    db,
                    accession,
                    candidates = ?ids,
                    "several entities carry this cross-reference, using the first"
                );
                Ok(ids.remove(0))
            }
        }
    }

    /// Substitute ids for the quoted labels in a DL class expression.
    pub fn labels_to_ids(&self, expression: &str) -> VfbResult<String> {
        labels_to_ids(expression, &self.inner.lookup, &self.inner.config.curie_prefixes)
    }

    /// A quoted-label expression is rewritten label by label; anything else
    /// is taken as a single key.
    fn class_expression(&self, query: &str) -> VfbResult<String> {
        if query.contains('\'') {
            self.labels_to_ids(query)
        } else {
            Ok(self.dl_term(&self.resolve_key(query)?))
        }
    }

    pub fn get_subclasses(&self, query: &str) -> VfbResult<Vec<String>> {
        self.dl_ids(DlQueryKind::Subclasses, &self.class_expression(query)?)
    }

    /// Ancestors of the class expression.
    pub fn get_superclasses(&self, query: &str) -> VfbResult<Vec<String>> {
        self.dl_ids(DlQueryKind::Superclasses, &self.class_expression(query)?)
    }

    pub fn get_instances(&self, query: &str) -> VfbResult<Vec<String>> {
        self.dl_ids(DlQueryKind::Instances, &self.class_expression(query)?)
    }

    /// Summaries of the documents for `ids`.
    pub fn get_summaries<S: AsRef<str>>(&self, ids: &[S]) -> VfbResult<Vec<Summary>> {
        Ok(self.get_term_info(ids)?.iter().map(|d| d.summary()).collect())
    }

    /// Distinct `id` column of a listing query, in row order.
    fn listed_ids(&self, statement: &str) -> VfbResult<Vec<String>> {
        let mut ids: Vec<String> = Vec::new();
        for row in self.run_query(statement)? {
            if let Some(id) = row.get_str("id") {
                if !ids.iter().any(|known| known == id) {
                    ids.push(id.to_string());
                }
            }
        }
        Ok(ids)
    }

    fn listing_summaries(&self, statement: &str, what: &str) -> VfbResult<Vec<Summary>> {
        let ids = self.listed_ids(statement)?;
        if ids.is_empty() {
            warn!(kind = %ErrorKind::EmptyResult, what, "listing returned nothing");
            return Ok(Vec::new());
        }
        self.get_summaries(&ids)
    }

    /// Summaries of every dataset.
    pub fn get_datasets(&self) -> VfbResult<Vec<Summary>> {
        self.listing_summaries(&queries::datasets(), "datasets")
    }

    /// Summaries of every template.
    pub fn get_templates(&self) -> VfbResult<Vec<Summary>> {
        self.listing_summaries(&queries::templates(), "templates")
    }

    /// Summaries of the entities cross-referenced to `accessions` in `db`.
    ///
    /// Accessions keep their input order; one with no entity is skipped with
    /// a warning, and one shared by several entities takes the first.
    pub fn get_terms_by_xref<S: AsRef<str>>(&self, db: &str, accessions: &[S]) -> VfbResult<Vec<Summary>> {
        let matches = self.xref_to_ids(db, accessions)?;
        let mut ids: Vec<String> = Vec::new();
        for accession in accessions {
            let accession = accession.as_ref();
            match matches.iter().find(|m| m.accession == accession) {
                Some(m) if !ids.contains(&m.id) => ids.push(m.id.clone()),
                Some(_) => {}
                None => warn!(
                    kind = %ErrorKind::EmptyResult,
                    db,
                    accession,
                    "no entity carries this cross-reference, skipping"
                ),
            }
        }
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.get_summaries(&ids)
    }

    /// Classes overlapping `region`, restricted to cell types when
    /// `cells_only` is set.
    pub fn get_terms_by_region(&self, region: &str, cells_only: bool) -> VfbResult<Vec<Summary>> {
        let region = self.dl_term(&self.resolve_key(region)?);
        let overlaps = format!("{} some {}", self.dl_term(OVERLAPS), region);
        let expression = if cells_only {
            format!("{} that {}", self.dl_term(CELL), overlaps)
        } else {
            overlaps
        };
        let ids = self.dl_ids(DlQueryKind::Subclasses, &expression)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.get_summaries(&ids)
    }
}
