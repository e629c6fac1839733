//! In-memory backend over canned documents and query answers
//!
//! Used for offline work (the `vfb` binary loads one from a JSON bundle) and
//! as the test double. Every trait call is counted so callers can check how
//! often the object model went to the backend.

use super::{Backend, BackendError, BackendResult, DlQueryKind, Row};
use crate::resolve::{EntryKind, LookupEntry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Canned reasoner answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DlAnswer {
    pub kind: DlQueryKind,
    pub expression: String,
    pub ids: Vec<String>,
}

/// Canned graph query answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub statement: String,
    pub rows: Vec<Row>,
}

/// Serialized form of an [`InMemoryBackend`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureBundle {
    pub documents: Vec<Value>,
    pub lookup: Vec<LookupEntry>,
    pub dl: Vec<DlAnswer>,
    pub queries: Vec<QueryAnswer>,
}

impl FixtureBundle {
    pub fn load(path: impl AsRef<Path>) -> BackendResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[derive(Debug, Default)]
struct CallCounts {
    term_info: AtomicUsize,
    fetched_ids: AtomicUsize,
    lookup: AtomicUsize,
    dl: AtomicUsize,
    query: AtomicUsize,
}

fn document_id(doc: &Value) -> Option<&str> {
    doc.pointer("/term/core/short_form").and_then(Value::as_str)
}

/// Lookup entry implied by a document's core, if its tags say what it is.
fn entry_for_document(doc: &Value) -> Option<LookupEntry> {
    let core = doc.pointer("/term/core")?;
    let id = core.get("short_form")?.as_str()?;
    let label = core.get("label").and_then(Value::as_str).unwrap_or_default();
    let tags: Vec<&str> = core
        .get("types")
        .and_then(Value::as_array)
        .map(|types| types.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let kind = if tags.iter().any(|t| *t == "Site" || *t == "API") {
        EntryKind::Site
    } else if tags.contains(&"Class") {
        EntryKind::Class
    } else if tags.contains(&"Individual") {
        EntryKind::Individual
    } else {
        return None;
    };
    let mut entry = LookupEntry::new(id, label, kind);
    if let Some(symbol) = core.get("symbol").and_then(Value::as_str) {
        if !symbol.is_empty() {
            entry = entry.with_symbol(symbol);
        }
    }
    Some(entry)
}

/// A [`Backend`] answering from memory.
///
/// Documents are keyed by `term.core.short_form`; several documents may share
/// an id and are all returned. Lookup entries are the explicit ones plus one
/// per document whose tags mark it as a class, individual or site. Unknown DL
/// expressions and statements answer with no rows.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    documents: HashMap<String, Vec<Value>>,
    lookup: Vec<LookupEntry>,
    dl: HashMap<(DlQueryKind, String), Vec<String>>,
    rows: HashMap<String, Vec<Row>>,
    offline: AtomicBool,
    calls: CallCounts,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bundle(bundle: FixtureBundle) -> Self {
        let mut backend = Self::new();
        for doc in bundle.documents {
            backend.insert_document(doc);
        }
        backend.lookup = bundle.lookup;
        for answer in bundle.dl {
            backend.dl.insert((answer.kind, answer.expression), answer.ids);
        }
        for answer in bundle.queries {
            backend.rows.insert(answer.statement, answer.rows);
        }
        backend
    }

    pub fn from_json_str(json: &str) -> BackendResult<Self> {
        Ok(Self::from_bundle(serde_json::from_str(json)?))
    }

    pub fn load(path: impl AsRef<Path>) -> BackendResult<Self> {
        Ok(Self::from_bundle(FixtureBundle::load(path)?))
    }

    /// Add a document; returns `false` (and drops it) when it has no id.
    pub fn insert_document(&mut self, doc: Value) -> bool {
        let Some(id) = document_id(&doc).map(String::from) else {
            return false;
        };
        self.documents.entry(id).or_default().push(doc);
        true
    }

    pub fn with_document(mut self, doc: Value) -> Self {
        self.insert_document(doc);
        self
    }

    pub fn with_lookup_entry(mut self, entry: LookupEntry) -> Self {
        self.lookup.push(entry);
        self
    }

    pub fn with_dl_answer<S: Into<String>>(
        mut self,
        kind: DlQueryKind,
        expression: impl Into<String>,
        ids: impl IntoIterator<Item = S>,
    ) -> Self {
        self.dl.insert(
            (kind, expression.into()),
            ids.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn with_rows(mut self, statement: impl Into<String>, rows: Vec<Row>) -> Self {
        self.rows.insert(statement.into(), rows);
        self
    }

    /// While offline every call fails with [`BackendError::Offline`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn document_count(&self) -> usize {
        self.documents.values().map(Vec::len).sum()
    }

    /// Number of `term_info` calls so far
    pub fn term_info_calls(&self) -> usize {
        self.calls.term_info.load(Ordering::SeqCst)
    }

    /// Total ids requested through `term_info` so far
    pub fn fetched_ids(&self) -> usize {
        self.calls.fetched_ids.load(Ordering::SeqCst)
    }

    pub fn lookup_calls(&self) -> usize {
        self.calls.lookup.load(Ordering::SeqCst)
    }

    pub fn dl_calls(&self) -> usize {
        self.calls.dl.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.calls.query.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> BackendResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BackendError::Offline);
        }
        Ok(())
    }
}

impl Backend for InMemoryBackend {
    fn term_info(&self, ids: &[String]) -> BackendResult<Vec<Value>> {
        self.calls.term_info.fetch_add(1, Ordering::SeqCst);
        self.calls.fetched_ids.fetch_add(ids.len(), Ordering::SeqCst);
        self.check_online()?;
        Ok(ids
            .iter()
            .filter_map(|id| self.documents.get(id))
            .flatten()
            .cloned()
            .collect())
    }

    fn lookup_entries(&self) -> BackendResult<Vec<LookupEntry>> {
        self.calls.lookup.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        let mut entries = self.lookup.clone();
        let mut derived: Vec<LookupEntry> = self
            .documents
            .values()
            .flatten()
            .filter_map(entry_for_document)
            .filter(|e| !self.lookup.iter().any(|l| l.id == e.id))
            .collect();
        derived.sort_by(|a, b| a.id.cmp(&b.id));
        derived.dedup_by(|a, b| a.id == b.id);
        entries.extend(derived);
        Ok(entries)
    }

    fn dl_query(&self, kind: DlQueryKind, expression: &str) -> BackendResult<Vec<String>> {
        self.calls.dl.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self
            .dl
            .get(&(kind, expression.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn run_query(&self, statement: &str) -> BackendResult<Vec<Row>> {
        self.calls.query.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self.rows.get(statement).cloned().unwrap_or_default())
    }
}
