//! Immutable render state and its pure transitions.

use serde::Serialize;

use crate::entry::MoodEntry;

/// Controller-level state derived from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    /// The last snapshot is current and stable.
    Idle,
    /// A fetch is outstanding.
    Refreshing,
}

/// Everything a renderer needs to draw the history.
///
/// Snapshots are replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    /// Entries, newest first.
    pub entries: Vec<MoodEntry>,
    /// True while a fetch is outstanding.
    pub is_loading: bool,
}

impl StateSnapshot {
    /// State before the first fetch completes.
    pub fn initial() -> Self {
        Self {
            entries: Vec::new(),
            is_loading: true,
        }
    }

    /// Same entries with the loading flag raised.
    pub fn loading(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            is_loading: true,
        }
    }

    /// Fresh entries from a completed fetch.
    pub fn settled(entries: Vec<MoodEntry>, still_loading: bool) -> Self {
        Self {
            entries,
            is_loading: still_loading,
        }
    }

    /// Keeps the last known-good entries after a failed fetch.
    pub fn recovered(&self, still_loading: bool) -> Self {
        Self {
            entries: self.entries.clone(),
            is_loading: still_loading,
        }
    }

    /// Current controller phase.
    pub fn phase(&self) -> ControllerPhase {
        if self.is_loading {
            ControllerPhase::Refreshing
        } else {
            ControllerPhase::Idle
        }
    }
}
