/// Volatile in-memory store.
pub mod memory;
/// Durable SQLite store.
pub mod sqlite;

use crate::{
    entry::MoodEntry,
    types::{EntryId, Mood, TimestampMs},
};

/// Failures of the persistence medium.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// SQLite reported a failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored row holds a mood outside 1..=5.
    #[error("entry {id} holds invalid mood {mood}")]
    Corrupt {
        /// Offending row.
        id: EntryId,
        /// Raw stored value.
        mood: i64,
    },

    /// The medium could not be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type PersistResult<T> = Result<T, StorageError>;

/// Durable append-only record of mood entries.
///
/// Implementations must tolerate concurrent `list_all` calls and reads
/// interleaved with `insert`.
pub trait EntryStore: Send + Sync {
    /// Appends one entry and returns its newly assigned id.
    fn insert(&self, mood: Mood, timestamp_ms: TimestampMs) -> PersistResult<EntryId>;

    /// Every entry, newest timestamp first; ties go to the later insert.
    fn list_all(&self) -> PersistResult<Vec<MoodEntry>>;
}
