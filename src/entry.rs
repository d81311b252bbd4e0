//! Persisted mood observation record.

use serde::{Deserialize, Serialize};

use crate::types::{EntryId, Mood, TimestampMs};

/// One stored mood observation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    /// Store-assigned identifier, never reused.
    pub id: EntryId,
    /// Observed mood.
    pub mood: Mood,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp_ms: TimestampMs,
}

/// Orders entries newest first, breaking timestamp ties by higher id.
///
/// Ids grow with insertion order in both stores, so the tie-break keeps
/// the most recently inserted entry first.
pub fn sort_newest_first(entries: &mut [MoodEntry]) {
    entries.sort_by(|a, b| {
        b.timestamp_ms
            .cmp(&a.timestamp_ms)
            .then_with(|| b.id.cmp(&a.id))
    });
}
