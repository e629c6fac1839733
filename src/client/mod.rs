//! The session: key resolution, term construction and the term cache
//!
//! [`VfbConnect`] owns the backend, the lookup table built at connect time
//! and the term cache. Terms keep a weak handle back to it so their lazy
//! accessors can issue further queries without keeping the session alive.

mod error;
mod reports;

pub use error::{ErrorKind, VfbError, VfbResult};
pub use reports::XrefMatch;

use crate::backend::{Backend, DlQueryKind, Row};
use crate::batch;
use crate::cache::{CacheStats, TermCache};
use crate::config::ClientConfig;
use crate::resolve::ids::{dl_term, to_short_form};
use crate::resolve::{EntryKind, LookupTable, XrefKey};
use crate::schema::{assemble, TermData};
use crate::store::{CachedBackend, OpenStore, SqliteTermStore};
use crate::term::{VfbTerm, VfbTerms};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

pub(crate) struct Inner {
    backend: Box<dyn Backend>,
    config: ClientConfig,
    lookup: LookupTable,
    cache: TermCache<VfbTerm>,
}

/// Non-owning reference from a term back to its session.
#[derive(Clone, Debug)]
pub(crate) struct SessionHandle(Weak<Inner>);

impl SessionHandle {
    pub(crate) fn upgrade(&self) -> VfbResult<VfbConnect> {
        self.0
            .upgrade()
            .map(|inner| VfbConnect { inner })
            .ok_or(VfbError::SessionClosed)
    }

    /// A handle that never upgrades.
    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        Self(Weak::new())
    }
}

/// A connection to the knowledge base.
///
/// Cloning is cheap; clones share the lookup table and the term cache.
#[derive(Clone)]
pub struct VfbConnect {
    inner: Arc<Inner>,
}

impl fmt::Debug for VfbConnect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VfbConnect")
            .field("lookup_entries", &self.inner.lookup.len())
            .field("cache", &self.inner.cache.stats())
            .finish()
    }
}

impl VfbConnect {
    /// Open a session with the default configuration.
    pub fn new(backend: impl Backend + 'static) -> VfbResult<Self> {
        Self::connect(backend, ClientConfig::default())
    }

    /// Open a session, building the lookup table from the backend's feed.
    ///
    /// When `config.term_store` is set, documents are read through a SQLite
    /// store at that path before the backend is asked.
    pub fn connect(backend: impl Backend + 'static, config: ClientConfig) -> VfbResult<Self> {
        config.validate()?;
        let backend: Box<dyn Backend> = match &config.term_store {
            Some(path) => {
                debug!(path = %path.display(), "opening term store");
                Box::new(CachedBackend::new(backend, SqliteTermStore::open(path)?))
            }
            None => Box::new(backend),
        };

        let lookup = LookupTable::build(backend.lookup_entries()?, &config.lookup);
        info!(entries = lookup.len(), "lookup table built");
        let cache = TermCache::new(config.cache.clone());

        Ok(Self {
            inner: Arc::new(Inner {
                backend,
                config,
                lookup,
                cache,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn lookup_table(&self) -> &LookupTable {
        &self.inner.lookup
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    pub(crate) fn handle(&self) -> SessionHandle {
        SessionHandle(Arc::downgrade(&self.inner))
    }

    // --- Key resolution ---

    pub fn lookup_id(&self, key: &str) -> VfbResult<String> {
        self.inner.lookup.lookup_id(key)
    }

    pub fn lookup_curie(&self, key: &str) -> VfbResult<String> {
        self.inner.lookup.lookup_curie(key)
    }

    pub fn lookup_name(&self, id: &str) -> VfbResult<String> {
        self.inner.lookup.lookup_name(id)
    }

    pub fn lookup_names<S: AsRef<str>>(&self, ids: &[S]) -> VfbResult<Vec<String>> {
        self.inner.lookup.lookup_names(ids)
    }

    /// Resolve a label, symbol, id or `<db>:<accession>` cross-reference.
    ///
    /// The lookup table is tried first. A key it cannot place is read as a
    /// cross-reference when its prefix names a registered database, and
    /// otherwise taken as an unindexed id when it is shaped like one.
    pub fn resolve_key(&self, key: &str) -> VfbResult<String> {
        let err = match self.lookup_id(key) {
            Ok(id) => return Ok(id),
            Err(err) => err,
        };
        if let Some(xref) = XrefKey::parse(key) {
            if self.is_site(xref.db) {
                return match self.resolve_xref(xref.db, xref.accession) {
                    Err(VfbError::UnresolvedKey(_)) => Err(err),
                    other => other,
                };
            }
        }
        self.inner.lookup.unindexed_id(key).ok_or(err)
    }

    fn is_site(&self, db: &str) -> bool {
        self.lookup_id(db)
            .is_ok_and(|id| self.inner.lookup.kind(&id) == Some(EntryKind::Site))
    }

    // --- Terms ---

    /// Resolve `key` and fetch its document now.
    ///
    /// A cached term is returned as is, after loading it if it was deferred.
    pub fn term(&self, key: &str) -> VfbResult<VfbTerm> {
        if let Some(term) = self.inner.cache.get(key) {
            return Self::loaded(term);
        }
        let id = self.resolve_key(key)?;
        if id != key {
            if let Some(term) = self.inner.cache.get(&id) {
                self.inner.cache.insert(&[key], term.clone());
                return Self::loaded(term);
            }
        }
        let term = VfbTerm::hydrated(self.fetch_one(&id)?, self.handle());
        self.inner.cache.insert(&[key, id.as_str()], term.clone());
        Ok(term)
    }

    fn loaded(term: VfbTerm) -> VfbResult<VfbTerm> {
        if !term.is_loaded() {
            term.data()?;
        }
        Ok(term)
    }

    /// Resolve `key` without fetching; the document loads on first read.
    pub fn deferred_term(&self, key: &str) -> VfbResult<VfbTerm> {
        if let Some(term) = self.inner.cache.get(key) {
            return Ok(term);
        }
        let id = self.resolve_key(key)?;
        let term = self.term_for_id(&id);
        self.inner.cache.insert(&[key], term.clone());
        Ok(term)
    }

    /// Resolve every key and fetch the uncached documents in batches.
    ///
    /// Unresolvable keys, keys whose resolution hits a transport failure and
    /// keys whose document does not come back are skipped with a warning. A
    /// transport failure during the document fetch yields an empty
    /// collection.
    pub fn terms<S: AsRef<str>>(&self, keys: &[S]) -> VfbResult<VfbTerms> {
        let mut resolved: Vec<(String, String, Option<VfbTerm>)> = Vec::with_capacity(keys.len());
        for key in keys {
            let key = key.as_ref();
            if let Some(term) = self.inner.cache.get(key) {
                resolved.push((key.to_string(), term.id().to_string(), Some(term)));
                continue;
            }
            match self.resolve_key(key) {
                Ok(id) => {
                    let cached = if id != key { self.inner.cache.get(&id) } else { None };
                    resolved.push((key.to_string(), id, cached));
                }
                Err(err) if err.kind() == ErrorKind::UnresolvedKey => {
                    warn!(kind = %ErrorKind::UnresolvedKey, key, "skipping unresolvable key");
                }
                Err(err) if err.kind() == ErrorKind::Transport => {
                    warn!(kind = %ErrorKind::Transport, key, error = %err, "key resolution failed, skipping");
                }
                Err(err) => return Err(err),
            }
        }

        let mut missing: Vec<String> = Vec::new();
        for (_, id, cached) in &resolved {
            let loaded = cached.as_ref().is_some_and(VfbTerm::is_loaded);
            if !loaded && !missing.contains(id) {
                missing.push(id.clone());
            }
        }

        let mut documents: HashMap<String, TermData> = HashMap::new();
        if !missing.is_empty() {
            let fetched = match self.fetch_documents(&missing) {
                Ok(fetched) => fetched,
                Err(err) if err.kind() == ErrorKind::Transport => {
                    warn!(kind = %ErrorKind::Transport, error = %err, "term fetch failed");
                    return Ok(VfbTerms::default());
                }
                Err(err) => return Err(err),
            };
            for data in fetched {
                if documents.contains_key(data.id()) {
                    warn!(
                        kind = %ErrorKind::AmbiguousMatch,
                        id = data.id(),
                        "several documents share this id, using the first"
                    );
                    continue;
                }
                documents.insert(data.id().to_string(), data);
            }
        }

        let mut built: HashMap<String, VfbTerm> = HashMap::new();
        let mut out = VfbTerms::default();
        for (key, id, cached) in resolved {
            if let Some(term) = cached {
                if let Some(data) = documents.get(&id) {
                    term.fill(data.clone());
                }
                out.push(term);
                continue;
            }
            let term = match built.get(&id) {
                Some(term) => term.clone(),
                None => match documents.get(&id) {
                    Some(data) => {
                        let term = VfbTerm::hydrated(data.clone(), self.handle());
                        built.insert(id.clone(), term.clone());
                        term
                    }
                    None => {
                        warn!(kind = %ErrorKind::EmptyResult, key, id, "no document for key, skipping");
                        continue;
                    }
                },
            };
            self.inner.cache.insert(&[key.as_str(), id.as_str()], term.clone());
            out.push(term);
        }
        Ok(out)
    }

    /// Assembled documents for `ids`, fetched in batches.
    pub fn get_term_info<S: AsRef<str>>(&self, ids: &[S]) -> VfbResult<Vec<TermData>> {
        let ids: Vec<String> = ids.iter().map(|id| to_short_form(id.as_ref())).collect();
        self.fetch_documents(&ids)
    }

    // --- Crate-internal plumbing for terms ---

    pub(crate) fn fetch_documents(&self, ids: &[String]) -> VfbResult<Vec<TermData>> {
        let documents = batch::batched(ids, self.inner.config.chunk_size, |chunk| {
            self.inner.backend.term_info(chunk)
        })?;
        let mut out = Vec::with_capacity(documents.len());
        for document in &documents {
            match assemble(document)? {
                Some(data) => out.push(data),
                None => debug!("skipping empty document"),
            }
        }
        Ok(out)
    }

    /// The single document for `id`; the first one when several come back.
    pub(crate) fn fetch_one(&self, id: &str) -> VfbResult<TermData> {
        let mut documents = self.fetch_documents(&[id.to_string()])?.into_iter();
        let Some(first) = documents.next() else {
            return Err(VfbError::UnresolvedKey(id.to_string()));
        };
        let extra = documents.count();
        if extra > 0 {
            warn!(
                kind = %ErrorKind::AmbiguousMatch,
                id,
                documents = extra + 1,
                "several documents share this id, using the first"
            );
        }
        Ok(first)
    }

    /// The cached term for `id`, or a new deferred one.
    pub(crate) fn term_for_id(&self, id: &str) -> VfbTerm {
        if let Some(term) = self.inner.cache.peek(id) {
            return term;
        }
        let term = VfbTerm::deferred(id, self.handle());
        self.inner.cache.insert(&[id], term.clone());
        term
    }

    pub(crate) fn terms_for_ids(&self, ids: &[String]) -> VfbTerms {
        ids.iter().map(|id| self.term_for_id(id)).collect()
    }

    pub(crate) fn dl_term(&self, id: &str) -> String {
        dl_term(id, &self.inner.config.curie_prefixes)
    }

    /// Short forms answering a DL query, in backend order.
    pub(crate) fn dl_ids(&self, kind: DlQueryKind, expression: &str) -> VfbResult<Vec<String>> {
        debug!(%kind, expression, "dl query");
        let ids: Vec<String> = self
            .inner
            .backend
            .dl_query(kind, expression)?
            .iter()
            .map(|id| to_short_form(id))
            .collect();
        if ids.is_empty() {
            warn!(kind = %ErrorKind::EmptyResult, query = %kind, expression, "dl query returned nothing");
        }
        Ok(ids)
    }

    pub(crate) fn dl_terms(&self, kind: DlQueryKind, expression: &str) -> VfbResult<VfbTerms> {
        Ok(self.terms_for_ids(&self.dl_ids(kind, expression)?))
    }

    pub(crate) fn run_query(&self, statement: &str) -> VfbResult<Vec<Row>> {
        Ok(self.inner.backend.run_query(statement)?)
    }

    pub(crate) fn chunk_size(&self) -> usize {
        self.inner.config.chunk_size
    }
}
