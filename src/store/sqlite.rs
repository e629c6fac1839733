//! SQLite document store

use super::traits::{OpenStore, StoreResult, TermStore};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// SQLite-backed TermInfo document store
///
/// One table of `(id, document_json)` rows. Thread-safe via an internal mutex
/// on the connection.
pub struct SqliteTermStore {
    conn: Mutex<Connection>,
}

impl SqliteTermStore {
    fn init_schema(conn: &Connection) -> StoreResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS term_info (
                id TEXT PRIMARY KEY,
                document_json TEXT NOT NULL,
                stored_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OpenStore for SqliteTermStore {
    fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl TermStore for SqliteTermStore {
    fn get(&self, id: &str) -> StoreResult<Option<Value>> {
        let conn = self.conn();
        let json: Option<String> = conn
            .query_row(
                "SELECT document_json FROM term_info WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn put(&self, id: &str, doc: &Value) -> StoreResult<()> {
        let json = serde_json::to_string(doc)?;
        let conn = self.conn();
        conn.execute(
            "INSERT OR REPLACE INTO term_info (id, document_json) VALUES (?1, ?2)",
            params![id, json],
        )?;
        Ok(())
    }

    fn remove(&self, id: &str) -> StoreResult<bool> {
        let conn = self.conn();
        let n = conn.execute("DELETE FROM term_info WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    fn len(&self) -> StoreResult<usize> {
        let conn = self.conn();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM term_info", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn ids(&self) -> StoreResult<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT id FROM term_info ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use serde_json::json;
    use tempfile::tempdir;

    fn doc(id: &str) -> Value {
        json!({"term": {"core": {"short_form": id, "iri": "", "label": id, "types": ["Class"]}}})
    }

    #[test]
    fn put_get_remove() {
        let store = SqliteTermStore::open_in_memory().unwrap();
        assert!(store.is_empty().unwrap());
        store.put("FBbt_1", &doc("FBbt_1")).unwrap();
        assert_eq!(store.get("FBbt_1").unwrap(), Some(doc("FBbt_1")));
        assert_eq!(store.get("FBbt_2").unwrap(), None);
        assert!(store.remove("FBbt_1").unwrap());
        assert!(!store.remove("FBbt_1").unwrap());
    }

    #[test]
    fn put_replaces_existing_document() {
        let store = SqliteTermStore::open_in_memory().unwrap();
        store.put("FBbt_1", &doc("FBbt_1")).unwrap();
        let mut newer = doc("FBbt_1");
        newer["term"]["core"]["label"] = json!("renamed");
        store.put("FBbt_1", &newer).unwrap();
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get("FBbt_1").unwrap(), Some(newer));
    }

    #[test]
    fn get_many_keeps_request_order() {
        let store = SqliteTermStore::open_in_memory().unwrap();
        for id in ["FBbt_1", "FBbt_2", "FBbt_3"] {
            store.put_document(&doc(id)).unwrap();
        }
        let docs = store
            .get_many(&["FBbt_3".into(), "FBbt_9".into(), "FBbt_1".into()])
            .unwrap();
        assert_eq!(docs, vec![doc("FBbt_3"), doc("FBbt_1")]);
        assert_eq!(store.ids().unwrap(), vec!["FBbt_1", "FBbt_2", "FBbt_3"]);
    }

    #[test]
    fn document_without_id_is_rejected() {
        let store = SqliteTermStore::open_in_memory().unwrap();
        let err = store.put_document(&json!({"term": {}})).unwrap_err();
        assert!(matches!(err, StoreError::MissingId));
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("terms.db");
        {
            let store = SqliteTermStore::open(&path).unwrap();
            store.put_document(&doc("FBbt_1")).unwrap();
        }
        let store = SqliteTermStore::open(&path).unwrap();
        assert_eq!(store.get("FBbt_1").unwrap(), Some(doc("FBbt_1")));
    }
}
