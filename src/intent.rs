//! User-triggered requests accepted by the tracker.

/// Closed set of actions a renderer can dispatch.
///
/// Intents are consumed once and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Persist a new observation. The raw value is validated by the tracker.
    SaveMood(i32),
    /// Re-fetch the full history.
    LoadEntries,
}
