//! Collaborator boundary
//!
//! Everything the object model needs from the outside world goes through the
//! [`Backend`] trait: TermInfo documents by id, the lookup feed, DL class
//! expression queries and raw graph queries. Transport, authentication and
//! query execution live behind it.

mod memory;
pub mod queries;

pub use memory::{DlAnswer, FixtureBundle, InMemoryBackend, QueryAnswer};
pub use queries::{Direction, SimilarityMethod};

use crate::resolve::LookupEntry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors reported by a backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend is offline")]
    Offline,

    #[error("query failed: {message} (statement: {statement})")]
    Query { statement: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Reasoner query kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DlQueryKind {
    Subclasses,
    Superclasses,
    Instances,
}

impl DlQueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DlQueryKind::Subclasses => "subclasses",
            DlQueryKind::Superclasses => "superclasses",
            DlQueryKind::Instances => "instances",
        }
    }
}

impl fmt::Display for DlQueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One result row: column names with their values, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub columns: Vec<String>,
    pub values: Vec<Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns.push(column.into());
        self.values.push(value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        let i = self.columns.iter().position(|c| c == column)?;
        self.values.get(i)
    }

    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column)?.as_str()
    }

    pub fn get_f64(&self, column: &str) -> Option<f64> {
        self.get(column)?.as_f64()
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.get(column)?.as_i64()
    }
}

/// The external collaborators the object model consumes.
pub trait Backend: Send + Sync {
    /// TermInfo documents for `ids`. Unknown ids are omitted; order follows
    /// the server.
    fn term_info(&self, ids: &[String]) -> BackendResult<Vec<Value>>;

    /// Every label and symbol the session should be able to resolve.
    fn lookup_entries(&self) -> BackendResult<Vec<LookupEntry>>;

    /// Ids matching a DL class expression, in server order.
    fn dl_query(&self, kind: DlQueryKind, expression: &str) -> BackendResult<Vec<String>>;

    /// Rows of an arbitrary graph query.
    fn run_query(&self, statement: &str) -> BackendResult<Vec<Row>>;
}

impl<B: Backend + ?Sized> Backend for Arc<B> {
    fn term_info(&self, ids: &[String]) -> BackendResult<Vec<Value>> {
        (**self).term_info(ids)
    }

    fn lookup_entries(&self) -> BackendResult<Vec<LookupEntry>> {
        (**self).lookup_entries()
    }

    fn dl_query(&self, kind: DlQueryKind, expression: &str) -> BackendResult<Vec<String>> {
        (**self).dl_query(kind, expression)
    }

    fn run_query(&self, statement: &str) -> BackendResult<Vec<Row>> {
        (**self).run_query(statement)
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn term_info(&self, ids: &[String]) -> BackendResult<Vec<Value>> {
        (**self).term_info(ids)
    }

    fn lookup_entries(&self) -> BackendResult<Vec<LookupEntry>> {
        (**self).lookup_entries()
    }

    fn dl_query(&self, kind: DlQueryKind, expression: &str) -> BackendResult<Vec<String>> {
        (**self).dl_query(kind, expression)
    }

    fn run_query(&self, statement: &str) -> BackendResult<Vec<Row>> {
        (**self).run_query(statement)
    }
}
