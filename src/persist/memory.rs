//! Volatile store with the same ordering contract as the SQLite one.

use std::sync::{Mutex, PoisonError};

use crate::{
    entry::{MoodEntry, sort_newest_first},
    types::{EntryId, Mood, TimestampMs},
};

use super::{EntryStore, PersistResult};

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<MoodEntry>,
    last_id: EntryId,
}

/// In-memory [`EntryStore`]; ids start at 1.
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    inner: Mutex<Inner>,
}

impl MemoryEntryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// True when nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EntryStore for MemoryEntryStore {
    fn insert(&self, mood: Mood, timestamp_ms: TimestampMs) -> PersistResult<EntryId> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.last_id += 1;
        let id = inner.last_id;
        inner.entries.push(MoodEntry {
            id,
            mood,
            timestamp_ms,
        });
        Ok(id)
    }

    fn list_all(&self) -> PersistResult<Vec<MoodEntry>> {
        let mut out = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .clone();
        sort_newest_first(&mut out);
        Ok(out)
    }
}
