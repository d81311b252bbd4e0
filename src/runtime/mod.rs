//! Single-writer tracker task, snapshot observation and event stream APIs.

/// Event and error payloads emitted by the tracker.
pub mod events;
/// Handle and controller loop implementation.
pub mod handle;
/// Snapshot hub and observers.
pub mod snapshot;
