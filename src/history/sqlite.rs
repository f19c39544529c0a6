//! SQLite history backend
//!
//! Emulates a browser's key/value local storage: one row per key, the
//! history list stored as a JSON array under `HISTORY_KEY`.

use super::traits::{
    HistoryEntry, HistoryResult, HistoryStore, OpenStore, HISTORY_CAP, HISTORY_KEY,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

/// SQLite-backed history store
///
/// Thread-safe via internal mutex on the connection.
pub struct SqliteHistoryStore {
    conn: Mutex<Connection>,
    key: String,
}

impl SqliteHistoryStore {
    fn init_schema(conn: &Connection) -> HistoryResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    fn from_connection(conn: Connection) -> HistoryResult<Self> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            key: HISTORY_KEY.to_string(),
        })
    }

    /// Store the list under a different key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw stored value, if any.
    pub fn raw_value(&self) -> HistoryResult<Option<String>> {
        let conn = self.conn.lock().unwrap();
        Self::read_raw(&conn, &self.key)
    }

    /// Overwrite the stored value verbatim.
    pub fn set_raw_value(&self, value: &str) -> HistoryResult<()> {
        let conn = self.conn.lock().unwrap();
        Self::write_raw(&conn, &self.key, value)
    }

    fn read_raw(conn: &Connection, key: &str) -> HistoryResult<Option<String>> {
        let value = conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_raw(conn: &Connection, key: &str, value: &str) -> HistoryResult<()> {
        conn.execute(
            "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(conn: &Connection, key: &str) -> HistoryResult<()> {
        conn.execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Decode the stored list; corrupt content is deleted.
    fn read_entries(conn: &Connection, key: &str) -> HistoryResult<Vec<HistoryEntry>> {
        let Some(raw) = Self::read_raw(conn, key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable history");
                Self::remove(conn, key)?;
                Ok(Vec::new())
            }
        }
    }
}

impl OpenStore for SqliteHistoryStore {
    fn open(path: impl AsRef<Path>) -> HistoryResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::from_connection(Connection::open(path)?)
    }

    fn open_in_memory() -> HistoryResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }
}

impl HistoryStore for SqliteHistoryStore {
    fn load_all(&self) -> HistoryResult<Vec<HistoryEntry>> {
        let conn = self.conn.lock().unwrap();
        Self::read_entries(&conn, &self.key)
    }

    fn append(&self, entry: HistoryEntry) -> HistoryResult<Vec<HistoryEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut entries = Self::read_entries(&conn, &self.key)?;
        entries.insert(0, entry);
        entries.truncate(HISTORY_CAP);

        Self::write_raw(&conn, &self.key, &serde_json::to_string(&entries)?)?;
        tracing::debug!(count = entries.len(), "history updated");
        Ok(entries)
    }

    fn clear(&self) -> HistoryResult<()> {
        let conn = self.conn.lock().unwrap();
        Self::remove(&conn, &self.key)
    }

    fn get(&self, id: &Uuid) -> HistoryResult<Option<HistoryEntry>> {
        let conn = self.conn.lock().unwrap();
        Ok(Self::read_entries(&conn, &self.key)?
            .into_iter()
            .find(|e| &e.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::normalize;
    use serde_json::json;

    fn create_test_store() -> SqliteHistoryStore {
        SqliteHistoryStore::open_in_memory().unwrap()
    }

    fn entry(summary: &str) -> HistoryEntry {
        let result = normalize(&json!({
            "summary": summary,
            "events": [],
            "named_entities": {},
            "original_text": format!("text for {summary}")
        }));
        HistoryEntry::from_result(&result)
    }

    #[test]
    fn empty_store_loads_nothing() {
        let store = create_test_store();
        assert!(store.load_all().unwrap().is_empty());
        assert!(store.raw_value().unwrap().is_none());
    }

    #[test]
    fn append_keeps_newest_first_and_caps() {
        let store = create_test_store();
        for i in 0..7 {
            store.append(entry(&format!("entry {i}"))).unwrap();
        }
        let entries = store.load_all().unwrap();
        assert_eq!(entries.len(), HISTORY_CAP);
        let summaries: Vec<_> = entries.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(
            summaries,
            vec!["entry 6", "entry 5", "entry 4", "entry 3", "entry 2"]
        );
    }

    #[test]
    fn append_returns_stored_list() {
        let store = create_test_store();
        let first = entry("one");
        let returned = store.append(first.clone()).unwrap();
        assert_eq!(returned, vec![first.clone()]);
        assert_eq!(store.load_all().unwrap(), returned);
        assert_eq!(store.get(&first.id).unwrap(), Some(first));
        assert_eq!(store.get(&Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn corrupt_value_is_discarded_and_removed() {
        let store = create_test_store();
        store.set_raw_value("{not json").unwrap();

        assert!(store.load_all().unwrap().is_empty());
        assert!(store.raw_value().unwrap().is_none());

        // A later append starts from a clean list
        let entries = store.append(entry("fresh")).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn clear_removes_everything() {
        let store = create_test_store();
        store.append(entry("one")).unwrap();
        store.clear().unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn keys_are_independent() {
        let store = create_test_store();
        store.append(entry("default key")).unwrap();
        let store = store.with_key("other.history");
        assert_eq!(store.key(), "other.history");
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn history_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.db");

        let stored = {
            let store = SqliteHistoryStore::open(&path).unwrap();
            store.append(entry("first")).unwrap();
            store.append(entry("second")).unwrap()
        };

        let reopened = SqliteHistoryStore::open(&path).unwrap();
        assert_eq!(reopened.load_all().unwrap(), stored);
    }
}
