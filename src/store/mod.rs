//! Local persistence of TermInfo documents

mod cached;
mod sqlite;
mod traits;

pub use cached::CachedBackend;
pub use sqlite::SqliteTermStore;
pub use traits::{OpenStore, StoreError, StoreResult, TermStore};
