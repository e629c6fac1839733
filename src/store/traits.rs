//! Document store trait definitions

use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur in the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document has no term.core.short_form")]
    MissingId,
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent cache of serialized TermInfo documents keyed by short form.
pub trait TermStore: Send + Sync {
    fn get(&self, id: &str) -> StoreResult<Option<Value>>;

    /// Documents for the ids present in the store, in `ids` order.
    fn get_many(&self, ids: &[String]) -> StoreResult<Vec<Value>> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(doc) = self.get(id)? {
                out.push(doc);
            }
        }
        Ok(out)
    }

    /// Insert or replace the document for `id`.
    fn put(&self, id: &str, doc: &Value) -> StoreResult<()>;

    /// Store a document under its own `term.core.short_form`.
    fn put_document(&self, doc: &Value) -> StoreResult<String> {
        let id = doc
            .pointer("/term/core/short_form")
            .and_then(Value::as_str)
            .ok_or(StoreError::MissingId)?
            .to_string();
        self.put(&id, doc)?;
        Ok(id)
    }

    fn remove(&self, id: &str) -> StoreResult<bool>;

    fn len(&self) -> StoreResult<usize>;

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Stored ids in ascending order.
    fn ids(&self) -> StoreResult<Vec<String>>;
}

/// Trait for opening a store at a location
pub trait OpenStore: TermStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StoreResult<Self>;

    /// Open an in-memory store (for testing)
    fn open_in_memory() -> StoreResult<Self>;
}
