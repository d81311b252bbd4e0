//! Side-channel payloads emitted alongside snapshots.

use std::sync::Arc;

use crate::{
    persist::StorageError,
    types::{EntryId, InvalidMoodValue, Mood, RefreshSeq},
};

/// Store operation that produced a [`TrackerError::Storage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    /// `EntryStore::insert`.
    Insert,
    /// `EntryStore::list_all`.
    ListAll,
}

/// Errors surfaced by the tracker. Never fatal to the controller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TrackerError {
    /// The store could not complete an operation.
    #[error("storage failure during {op:?}: {source}")]
    Storage {
        /// Failed operation.
        op: StoreOp,
        /// Underlying store error.
        #[source]
        source: Arc<StorageError>,
    },
    /// A `SaveMood` intent carried an out-of-range value and was discarded.
    #[error(transparent)]
    InvalidMood(#[from] InvalidMoodValue),
    /// The controller task has stopped.
    #[error("tracker is not running")]
    ChannelClosed,
}

impl TrackerError {
    pub(crate) fn storage(op: StoreOp, err: StorageError) -> Self {
        Self::Storage {
            op,
            source: Arc::new(err),
        }
    }
}

/// Events emitted from the single-writer controller loop.
#[derive(Debug, Clone)]
pub enum TrackerEvent {
    /// A new entry was persisted.
    EntrySaved {
        /// Store-assigned id.
        id: EntryId,
        /// Saved mood.
        mood: Mood,
    },
    /// A refresh completed after a newer one had already been applied.
    RefreshDiscarded {
        /// Sequence of the discarded refresh.
        seq: RefreshSeq,
    },
    /// An intent or store call failed; state kept its last known-good value.
    Failed(TrackerError),
}
