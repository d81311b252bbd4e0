//! SQLite-backed append-only entry store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, params};

use crate::{
    entry::MoodEntry,
    types::{EntryId, Mood, TimestampMs},
};

use super::{EntryStore, PersistResult, StorageError};

/// SQLite implementation of [`crate::persist::EntryStore`].
pub struct SqliteEntryStore {
    conn: Mutex<Connection>,
}

impl SqliteEntryStore {
    /// Opens or creates a SQLite-backed store at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory SQLite store.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of stored entries.
    pub fn count(&self) -> PersistResult<usize> {
        let conn = self.conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM mood_entries", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn conn(&self) -> PersistResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Unavailable("connection lock poisoned".to_string()))
    }
}

impl EntryStore for SqliteEntryStore {
    fn insert(&self, mood: Mood, timestamp_ms: TimestampMs) -> PersistResult<EntryId> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO mood_entries(mood, timestamp_ms) VALUES (?1, ?2)",
            params![i64::from(mood.value()), timestamp_ms],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(id, mood = mood.value(), timestamp_ms, "entry inserted");
        Ok(id)
    }

    fn list_all(&self) -> PersistResult<Vec<MoodEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, mood, timestamp_ms FROM mood_entries ORDER BY timestamp_ms DESC, id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            let id: EntryId = row.get(0)?;
            let mood: i64 = row.get(1)?;
            let timestamp_ms: TimestampMs = row.get(2)?;
            Ok((id, mood, timestamp_ms))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, raw, timestamp_ms) = row?;
            let mood = i32::try_from(raw)
                .ok()
                .and_then(|v| Mood::new(v).ok())
                .ok_or(StorageError::Corrupt { id, mood: raw })?;
            out.push(MoodEntry {
                id,
                mood,
                timestamp_ms,
            });
        }
        Ok(out)
    }
}
