//! Backend decorator serving documents from a local store first

use super::traits::TermStore;
use crate::backend::{Backend, BackendResult, DlQueryKind, Row};
use crate::resolve::LookupEntry;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Serves TermInfo documents from a [`TermStore`] and falls back to the
/// wrapped backend for ids the store does not hold. Fetched documents are
/// written back. Store failures degrade to a plain fallback rather than
/// failing the request.
pub struct CachedBackend<B, S> {
    inner: B,
    store: S,
}

impl<B: Backend, S: TermStore> CachedBackend<B, S> {
    pub fn new(inner: B, store: S) -> Self {
        Self { inner, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

fn document_id(doc: &Value) -> Option<&str> {
    doc.pointer("/term/core/short_form").and_then(Value::as_str)
}

impl<B: Backend, S: TermStore> Backend for CachedBackend<B, S> {
    fn term_info(&self, ids: &[String]) -> BackendResult<Vec<Value>> {
        let mut found: HashMap<String, Vec<Value>> = HashMap::new();
        match self.store.get_many(ids) {
            Ok(docs) => {
                for doc in docs {
                    if let Some(id) = document_id(&doc).map(String::from) {
                        found.entry(id).or_default().push(doc);
                    }
                }
            }
            Err(err) => warn!(error = %err, "document store read failed, using backend"),
        }

        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !found.contains_key(*id))
            .cloned()
            .collect();
        if !missing.is_empty() {
            debug!(
                cached = ids.len() - missing.len(),
                missing = missing.len(),
                "store did not return all documents, falling back"
            );
            for doc in self.inner.term_info(&missing)? {
                match self.store.put_document(&doc) {
                    Ok(id) => found.entry(id).or_default().push(doc),
                    Err(err) => {
                        warn!(error = %err, "could not store fetched document");
                        if let Some(id) = document_id(&doc).map(String::from) {
                            found.entry(id).or_default().push(doc);
                        }
                    }
                }
            }
        }

        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(docs) = found.remove(id) {
                out.extend(docs);
            }
        }
        Ok(out)
    }

    fn lookup_entries(&self) -> BackendResult<Vec<LookupEntry>> {
        self.inner.lookup_entries()
    }

    fn dl_query(&self, kind: DlQueryKind, expression: &str) -> BackendResult<Vec<String>> {
        self.inner.dl_query(kind, expression)
    }

    fn run_query(&self, statement: &str) -> BackendResult<Vec<Row>> {
        self.inner.run_query(statement)
    }
}
